//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Seed records with per-record transactional semantics.
//! - Read records back and render report lines.

pub mod report_service;
pub mod seed_service;
