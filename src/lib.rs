//! Tableau: a retained-mode 2D scene graph with incremental snapshots and
//! segment-based timelines.
//!
//! This crate re-exports `tableau-core`; see its documentation for the
//! scene graph, snapshot and timeline APIs.

pub use tableau_core::*;
