//! # matrec-core
//!
//! Core types shared by every matrec crate:
//! - Entity structs for the tutoring-center records the auditor reads
//!   (centers, teachers, student profiles, classes, materials, storage objects)
//! - Enums with their SQL/JSON string forms
//! - The name normalizer and matcher used for attribution
//! - Recoverable warning records collected during a run
//! - Exponential-backoff retry for transient remote faults
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod names;
pub mod retry;
pub mod warnings;
