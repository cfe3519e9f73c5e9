//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input and orchestrate repository calls.
//! - Keep the CLI decoupled from storage details.

pub mod course_service;
pub mod person_service;
