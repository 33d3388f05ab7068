//! Team selection by integer programming.
//!
//! A scored CSV dataset is validated into a metric catalog, user criteria and
//! constraint strings are parsed against it, and the resulting model is handed
//! to a [`selection::SolverEngine`]. The solved assignment is ranked into a
//! deterministic [`selection::SelectionReport`].

pub mod config;
pub mod error;
pub mod selection;
pub mod telemetry;
