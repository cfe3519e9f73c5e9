//! Domain model for people, courses and their enrollment link.
//!
//! # Responsibility
//! - Define the records shared by repositories, services and the CLI.
//! - Own input validation for write drafts.
//!
//! # Invariants
//! - Identities are SQLite row ids, assigned on insert and never changed.
//! - A person's `courses` is a set: no duplicates, order is not meaningful.

pub mod course;
pub mod person;
