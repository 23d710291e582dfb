//! # Test Suite for the MAX6675 Monitor
//!
//! Cross-module tests: the protocol driver and the sampler wired together
//! the way the monitor uses them, plus the monitor's report output. Unit
//! tests for each library module live next to the code.
