//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parsing, repository calls, and analytics into use-cases.
//! - Keep CLI callers decoupled from storage details.

pub mod task_service;
