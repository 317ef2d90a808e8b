use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile lesson materials against a storage bucket and report findings
    Audit(AuditArgs),
    /// Print the JSON Schema of the audit report
    Schema,
}

#[derive(Debug, Clone, Args)]
pub struct AuditArgs {
    /// Bucket to audit (defaults to storage.bucket_name)
    pub bucket: Option<String>,

    /// Shared directory holding one folder per teacher (defaults to storage.teacher_root)
    #[arg(long)]
    pub teacher_root: Option<String>,

    /// Only audit records whose name matches this (whitespace and case are ignored)
    #[arg(long)]
    pub filter: Option<String>,

    /// Directory to start walking from (defaults to the bucket root)
    #[arg(long, default_value = "")]
    pub root: String,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
