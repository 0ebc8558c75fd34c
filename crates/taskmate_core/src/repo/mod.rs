//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Writes enforce `Task::validate()` before touching storage.
//! - Repository APIs return semantic errors (`NotFound`) next to DB errors.

pub mod task_repo;
