//! Invoice drafting, rendering and paginated PDF export.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
