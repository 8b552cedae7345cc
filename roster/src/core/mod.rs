//! Deterministic, pure logic over technician rosters.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! records and return deterministic outputs suitable for tests.

pub mod invariants;
pub mod ranking;
pub mod sample;
pub mod summary;
pub mod validation;
