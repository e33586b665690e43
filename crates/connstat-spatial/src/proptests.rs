//! Property-based tests for expected distributions.
