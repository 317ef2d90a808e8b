//! # matrec-audit
//!
//! The reconciliation engine. Every lesson material is attributed to its real
//! owner and every class with several materials has its ordering checked.
//! Storage the relational store does not explain is reported alongside.
//!
//! [`run_audit`] does the I/O (bucket check, snapshot load, storage walk) and
//! hands off to [`reconcile`], which is pure and deterministic.

pub mod attribution;
mod error;
pub mod ordering;
pub mod report;
mod run;
pub mod scope;
pub mod storage_findings;

pub use error::AuditError;
pub use report::{ReconciliationReport, Summary, reconcile};
pub use run::run_audit;
pub use scope::AuditScope;
