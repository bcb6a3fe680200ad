//! Application layer
//!
//! Use cases driving the single invoice draft: editing, generation, rendering
//! and export.

pub mod invoice;
