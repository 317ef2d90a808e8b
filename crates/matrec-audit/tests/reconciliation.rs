//! Full runs against an in-memory database and an in-memory bucket.

use std::sync::Arc;

use matrec_audit::{AuditError, AuditScope, ReconciliationReport, run_audit};
use matrec_core::enums::{Confidence, OwnerKind};
use matrec_core::warnings::WarningKind;
use matrec_db::MatDb;
use matrec_storage::{ListEntry, ObjectStoreLister, StorageError, StorageLister, StorageWalker};
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

const SCHEMA: &str = "
    CREATE TABLE centers (id TEXT PRIMARY KEY, name TEXT NOT NULL, kind TEXT NOT NULL);
    CREATE TABLE teachers (id TEXT PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE profiles (id TEXT PRIMARY KEY, full_name TEXT);
    CREATE TABLE classes (id TEXT PRIMARY KEY, title TEXT, class_date TEXT, student_id TEXT NOT NULL);
    CREATE TABLE materials (id TEXT PRIMARY KEY, class_id TEXT NOT NULL, title TEXT, type TEXT, order_index INTEGER);
";

const PORTAL: &str = "
    INSERT INTO teachers (id, name) VALUES ('t1', '세현');
    INSERT INTO profiles (id, full_name) VALUES ('s1', '민준'), ('s2', '지우');
    INSERT INTO classes (id, title, class_date, student_id) VALUES
        ('C1', '수학', '2024-03-05', 's1'),
        ('C2', '영어', '2024-03-06', 's2');
    INSERT INTO materials (id, class_id, title, type, order_index) VALUES
        ('m1', 'C1', '민준 칠판', 'student_blackboard_image', 0),
        ('m2', 'C2', '세현 판서', 'student_blackboard_image', 0),
        ('m3', 'C2', '지우 칠판', 'student_blackboard_image', 0);
";

async fn portal_db() -> MatDb {
    let db = MatDb::open_local(":memory:").await.unwrap();
    db.conn().execute_batch(SCHEMA).await.unwrap();
    db.conn().execute_batch(PORTAL).await.unwrap();
    db
}

async fn bucket(paths: &[&str]) -> Arc<dyn ObjectStore> {
    let store = InMemory::new();
    for path in paths {
        store
            .put(&Path::parse(*path).unwrap(), PutPayload::from_static(b"png"))
            .await
            .unwrap();
    }
    Arc::new(store)
}

/// Object-store lister that fails every listing of one directory.
struct FlakyLister {
    inner: ObjectStoreLister,
    broken_dir: &'static str,
}

impl StorageLister for FlakyLister {
    async fn list_page(
        &self,
        dir: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<ListEntry>, StorageError> {
        if dir == self.broken_dir {
            return Err(StorageError::Api {
                status: 503,
                message: "upstream timeout".into(),
            });
        }
        self.inner.list_page(dir, offset, limit).await
    }

    async fn check_bucket(&self) -> Result<(), StorageError> {
        self.inner.check_bucket().await
    }
}

fn scope() -> AuditScope {
    AuditScope::new("materials", "teachers")
}

const OBJECTS: &[&str] = &[
    "teachers/세현/note1.png",
    "teachers/조현철/board1.png",
    "teachers/박지훈/board2.png",
];

async fn audit(lister: impl StorageLister) -> Result<ReconciliationReport, AuditError> {
    let db = portal_db().await;
    let walker = StorageWalker::new(lister, 2, 3);
    run_audit(&db, &walker, &scope(), CancellationToken::new()).await
}

#[tokio::test]
async fn full_run_reports_every_category() {
    let lister = ObjectStoreLister::new(bucket(OBJECTS).await, "materials");
    let report = audit(lister).await.unwrap();

    let m1 = report
        .attributions
        .iter()
        .find(|a| a.material_id == "m1")
        .unwrap();
    assert_eq!(m1.confidence, Confidence::Matched);
    assert_eq!(m1.inferred_owner_kind, OwnerKind::Student);

    let mismatched: Vec<&str> = report
        .mismatched_materials
        .iter()
        .map(|a| a.material_id.as_str())
        .collect();
    assert_eq!(mismatched, ["m2"]);

    let orphans: Vec<&str> = report
        .orphaned_teacher_folders
        .iter()
        .map(|o| o.path.as_str())
        .collect();
    assert_eq!(orphans, ["teachers/박지훈", "teachers/조현철"]);

    assert_eq!(report.complex_classes.len(), 1);
    assert_eq!(report.complex_classes[0].class_id, "C2");
    assert_eq!(report.corrupt_ordering.len(), 1);
    assert_eq!(report.corrupt_ordering[0].duplicate_indices, vec![0]);

    assert_eq!(report.unregistered_artifacts.len(), 1);
    assert_eq!(report.unregistered_artifacts[0].path, "teachers/세현/note1.png");

    // The fixture has no centers rows but the table exists.
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let store = bucket(OBJECTS).await;
    let db = portal_db().await;
    let walker = StorageWalker::new(ObjectStoreLister::new(store, "materials"), 1, 4);

    let first = run_audit(&db, &walker, &scope(), CancellationToken::new())
        .await
        .unwrap()
        .to_json(true)
        .unwrap();
    let second = run_audit(&db, &walker, &scope(), CancellationToken::new())
        .await
        .unwrap()
        .to_json(true)
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn failed_subtree_keeps_sibling_findings() {
    let lister = FlakyLister {
        inner: ObjectStoreLister::new(bucket(OBJECTS).await, "materials"),
        broken_dir: "teachers/박지훈",
    };
    let report = audit(lister).await.unwrap();

    let skipped: Vec<&str> = report
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::SkippedSubtree)
        .map(|w| w.subject.as_str())
        .collect();
    assert_eq!(skipped, ["teachers/박지훈"]);
    assert_eq!(report.warnings.len(), 1);

    let orphans: Vec<&str> = report
        .orphaned_teacher_folders
        .iter()
        .map(|o| o.folder_name.as_str())
        .collect();
    assert_eq!(orphans, ["박지훈", "조현철"]);
    assert_eq!(report.unregistered_artifacts.len(), 1);
}

#[tokio::test]
async fn unreachable_walk_root_is_fatal() {
    let lister = FlakyLister {
        inner: ObjectStoreLister::new(bucket(OBJECTS).await, "materials"),
        broken_dir: "",
    };
    let result = audit(lister).await;
    assert!(matches!(result, Err(AuditError::Storage(_))));
}

#[tokio::test]
async fn missing_snapshot_tables_are_fatal() {
    let db = MatDb::open_local(":memory:").await.unwrap();
    let walker = StorageWalker::new(
        ObjectStoreLister::new(bucket(OBJECTS).await, "materials"),
        10,
        2,
    );
    let result = run_audit(&db, &walker, &scope(), CancellationToken::new()).await;
    assert!(matches!(result, Err(AuditError::Snapshot(_))));
}

#[tokio::test]
async fn cancelled_run_emits_no_report() {
    let db = portal_db().await;
    let walker = StorageWalker::new(
        ObjectStoreLister::new(bucket(OBJECTS).await, "materials"),
        10,
        2,
    );
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = run_audit(&db, &walker, &scope(), cancel).await;
    assert!(matches!(result, Err(AuditError::Cancelled)));
}

#[tokio::test]
async fn report_validates_against_its_schema() {
    let lister = ObjectStoreLister::new(bucket(OBJECTS).await, "materials");
    let report = audit(lister).await.unwrap();

    let schema = serde_json::to_value(ReconciliationReport::json_schema()).unwrap();
    let validator = jsonschema::validator_for(&schema).unwrap();
    let instance = serde_json::to_value(&report).unwrap();
    assert!(validator.is_valid(&instance));
}
