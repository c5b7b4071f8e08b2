//! Workflow modules grouped by product area.

pub mod assessment;
