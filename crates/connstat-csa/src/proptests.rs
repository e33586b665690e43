//! Property-based tests for masks and value sets.
