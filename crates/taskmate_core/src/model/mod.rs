//! Task domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Separate the parser's partial record (`TaskDraft`) from persisted tasks.
//!
//! # Invariants
//! - Every persisted task is identified by a stable `TaskId`.
//! - `id` and `created_at` are assigned by the owning service, never by the parser.

pub mod task;
