use anyhow::Context;
use matrec_audit::{AuditError, AuditScope, run_audit};
use matrec_config::MatrecConfig;
use matrec_db::MatDb;
use matrec_storage::{Lister, StorageWalker};
use tokio_util::sync::CancellationToken;

use crate::cli::{AuditArgs, GlobalFlags};
use crate::output::write_report;
use crate::progress::Progress;

/// Handle `matrec audit`.
pub async fn handle(
    args: &AuditArgs,
    config: &MatrecConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let scope = build_scope(args, config)?;
    tracing::info!(bucket = %scope.bucket, teacher_root = %scope.teacher_root, "starting audit");

    let retry = config.retry.policy();
    let db = MatDb::open(&config.turso, retry.clone())
        .await
        .context("failed to open portal database")?;
    let lister = Lister::from_config(&config.storage, &scope.bucket, retry)
        .context("failed to set up storage lister")?;
    let walker = StorageWalker::new(
        lister,
        config.storage.page_size,
        config.storage.max_concurrent_listings,
    );

    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let progress = Progress::spinner(&format!("auditing {}", scope.bucket));
    let result = run_audit(&db, &walker, &scope, cancel).await;
    watcher.abort();

    let report = match result {
        Ok(report) => {
            progress.finish_clear();
            report
        }
        Err(error) => {
            progress.finish_err(&format!("audit failed: {error}"));
            return Err(error.into());
        }
    };

    write_report(&report, flags.format, args.output.as_deref())
}

/// Resolve bucket and teacher root from flags, falling back to config.
fn build_scope(args: &AuditArgs, config: &MatrecConfig) -> anyhow::Result<AuditScope> {
    let bucket = args
        .bucket
        .clone()
        .filter(|bucket| !bucket.trim().is_empty())
        .unwrap_or_else(|| config.storage.bucket_name.clone());
    if bucket.trim().is_empty() {
        anyhow::bail!("no bucket given: pass BUCKET or set storage.bucket_name");
    }
    let teacher_root = args
        .teacher_root
        .clone()
        .unwrap_or_else(|| config.storage.teacher_root.clone());

    Ok(AuditScope::new(bucket, teacher_root)
        .with_walk_root(args.root.clone())
        .with_name_filter(args.filter.clone()))
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("interrupt received, cancelling audit");
        cancel.cancel();
    }
}

/// True when `error` is a cancelled audit, which exits with the interrupt code.
pub fn is_cancelled(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<AuditError>(),
        Some(AuditError::Cancelled)
    )
}
