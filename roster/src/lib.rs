//! Technician ranking and persistence engine.
//!
//! Tracks a roster of service technicians and their latest performance
//! metrics, derives a ranked view, and keeps the roster in sync with a
//! durable key-value store. The crate is split the same way throughout:
//!
//! - **[`core`]**: Pure, deterministic logic (ranking, validation, invariants,
//!   summaries). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (durable storage, export/import
//!   files, configuration, clock).
//!
//! [`store::RosterStore`] coordinates the two: it owns the in-memory roster
//! and flushes through an injected [`io::storage::RosterStorage`].

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod store;
pub mod technician;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
