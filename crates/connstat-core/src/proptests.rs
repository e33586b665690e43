//! Property-based tests for kernels, geometry and statistics.
