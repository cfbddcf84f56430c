//! Tests for the cluster module.

mod core;
