//! Run orchestration: check the bucket, load the snapshot and walk storage
//! concurrently, then reconcile.

use matrec_db::MatDb;
use matrec_storage::{StorageLister, StorageWalker};
use tokio_util::sync::CancellationToken;

use crate::error::AuditError;
use crate::report::{ReconciliationReport, reconcile};
use crate::scope::AuditScope;

/// Produce one complete report, or nothing.
///
/// The bucket check runs first so a missing bucket fails before any data is
/// loaded. Cancelling `cancel` abandons in-flight listings and queries and
/// discards whatever was collected.
///
/// # Errors
///
/// Returns [`AuditError::Storage`] when the bucket or walk root is
/// unreachable, [`AuditError::Snapshot`] when the relational snapshot cannot
/// be loaded, and [`AuditError::Cancelled`] on cancellation.
pub async fn run_audit<L: StorageLister>(
    db: &MatDb,
    walker: &StorageWalker<L>,
    scope: &AuditScope,
    cancel: CancellationToken,
) -> Result<ReconciliationReport, AuditError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(AuditError::Cancelled),
        result = gather(db, walker, scope, cancel.clone()) => result,
    }
}

async fn gather<L: StorageLister>(
    db: &MatDb,
    walker: &StorageWalker<L>,
    scope: &AuditScope,
    cancel: CancellationToken,
) -> Result<ReconciliationReport, AuditError> {
    tracing::debug!(bucket = %scope.bucket, "checking bucket");
    walker.lister().check_bucket().await?;

    let (snapshot, listing) = tokio::try_join!(
        async { db.load_snapshot().await.map_err(AuditError::from) },
        async {
            walker
                .collect(&scope.walk_root, cancel)
                .await
                .map_err(AuditError::from)
        },
    )?;

    Ok(reconcile(&snapshot, &listing, scope))
}
