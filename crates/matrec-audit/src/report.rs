//! Reconciliation reporter.
//!
//! [`reconcile`] is the pure core of a run. It turns the loaded snapshot and
//! the flattened storage listing into a report whose every list is sorted by
//! identifier. Equal inputs give byte-equal JSON; nothing time- or
//! order-dependent goes into the document.

use std::collections::BTreeSet;

use matrec_core::enums::Confidence;
use matrec_core::warnings::Warning;
use matrec_db::Snapshot;
use matrec_storage::StorageListing;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::attribution::{AttributionResult, Attributor, Roster};
use crate::ordering::{self, ComplexClass, CorruptOrdering};
use crate::scope::AuditScope;
use crate::storage_findings::{
    OrphanedFolder, UnregisteredArtifact, orphaned_teacher_folders, unregistered_artifacts,
};

/// Counts over the audited scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub materials: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub ambiguous: usize,
    pub unattributed: usize,
    pub storage_objects: usize,
    pub orphaned_teacher_folders: usize,
    pub unregistered_artifacts: usize,
    pub complex_classes: usize,
    pub corrupt_ordering: usize,
    pub warnings: usize,
}

/// The complete output of one reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub scope: AuditScope,
    pub summary: Summary,
    pub mismatched_materials: Vec<AttributionResult>,
    pub ambiguous_materials: Vec<AttributionResult>,
    pub unattributed_materials: Vec<AttributionResult>,
    pub orphaned_teacher_folders: Vec<OrphanedFolder>,
    pub unregistered_artifacts: Vec<UnregisteredArtifact>,
    pub complex_classes: Vec<ComplexClass>,
    pub corrupt_ordering: Vec<CorruptOrdering>,
    /// Skipped subtrees and unresolved relations; coverage was incomplete
    /// wherever one appears.
    pub warnings: Vec<Warning>,
    /// Every audited material, matched ones included.
    pub attributions: Vec<AttributionResult>,
}

impl ReconciliationReport {
    /// Serialize as pretty (indented) or single-line JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; the report holds only plain data, so
    /// this does not happen in practice.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// JSON Schema of the report document.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Self)
    }
}

/// Run every analysis over one snapshot and listing.
#[must_use]
pub fn reconcile(
    snapshot: &Snapshot,
    listing: &StorageListing,
    scope: &AuditScope,
) -> ReconciliationReport {
    let filter = scope.filter();
    let attributor = Attributor::new(&snapshot.classes, &snapshot.teachers);
    let mut warnings: Vec<Warning> = snapshot
        .warnings
        .iter()
        .chain(&listing.warnings)
        .cloned()
        .collect();

    let mut attributions = Vec::new();
    let mut class_ids: BTreeSet<&str> = BTreeSet::new();
    for material in &snapshot.materials {
        let student_name = attributor
            .class(&material.class_id)
            .and_then(|c| c.student_name.as_deref());
        if !filter.admits_material(material, student_name) {
            continue;
        }
        class_ids.insert(material.class_id.as_str());
        attributions.push(attributor.attribute(material, &mut warnings));
    }
    if filter.is_active() {
        class_ids.extend(
            snapshot
                .classes
                .iter()
                .filter(|c| c.student_name.as_deref().is_some_and(|n| filter.admits(n)))
                .map(|c| c.id.as_str()),
        );
    }
    attributions.sort_by(|a, b| a.material_id.cmp(&b.material_id));

    let ordering = ordering::analyze(&snapshot.materials, &snapshot.classes, &class_ids);

    let objects: Vec<_> = listing
        .objects
        .iter()
        .filter(|o| filter.admits_object(o))
        .cloned()
        .collect();
    let roster = Roster::new(&snapshot.teachers);
    let orphaned = orphaned_teacher_folders(&objects, &scope.teacher_root, &roster);
    let unregistered = unregistered_artifacts(
        &objects,
        &snapshot.students,
        &snapshot.teachers,
        &snapshot.materials,
    );

    warnings.sort();
    warnings.dedup();

    let with = |confidence: Confidence| -> Vec<AttributionResult> {
        attributions
            .iter()
            .filter(|a| a.confidence == confidence)
            .cloned()
            .collect()
    };
    let mismatched = with(Confidence::Mismatched);
    let ambiguous = with(Confidence::Ambiguous);
    let unattributed = with(Confidence::Unattributed);

    let summary = Summary {
        materials: attributions.len(),
        matched: attributions.len() - mismatched.len() - ambiguous.len() - unattributed.len(),
        mismatched: mismatched.len(),
        ambiguous: ambiguous.len(),
        unattributed: unattributed.len(),
        storage_objects: objects.len(),
        orphaned_teacher_folders: orphaned.len(),
        unregistered_artifacts: unregistered.len(),
        complex_classes: ordering.complex_classes.len(),
        corrupt_ordering: ordering.corrupt_ordering.len(),
        warnings: warnings.len(),
    };
    tracing::info!(
        materials = summary.materials,
        mismatched = summary.mismatched,
        ambiguous = summary.ambiguous,
        unattributed = summary.unattributed,
        orphaned = summary.orphaned_teacher_folders,
        unregistered = summary.unregistered_artifacts,
        complex = summary.complex_classes,
        corrupt = summary.corrupt_ordering,
        warnings = summary.warnings,
        "reconciliation complete"
    );

    ReconciliationReport {
        scope: scope.clone(),
        summary,
        mismatched_materials: mismatched,
        ambiguous_materials: ambiguous,
        unattributed_materials: unattributed,
        orphaned_teacher_folders: orphaned,
        unregistered_artifacts: unregistered,
        complex_classes: ordering.complex_classes,
        corrupt_ordering: ordering.corrupt_ordering,
        warnings,
        attributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrec_core::entities::{ClassRecord, Material, StorageObject, StudentProfile, Teacher};
    use matrec_core::enums::{MaterialType, OwnerKind};
    use matrec_core::warnings::WarningKind;
    use pretty_assertions::assert_eq;

    fn material(id: &str, class_id: &str, title: &str, kind: &str, order_index: i64) -> Material {
        Material {
            id: id.into(),
            class_id: class_id.into(),
            title: title.into(),
            material_type: MaterialType::from(kind),
            order_index,
        }
    }

    fn class(id: &str, student_id: &str, student_name: &str) -> ClassRecord {
        ClassRecord {
            id: id.into(),
            title: format!("class {id}"),
            class_date: None,
            student_id: student_id.into(),
            student_name: Some(student_name.into()),
        }
    }

    /// 민준 owns C1 with one well-named board; 세현 is the only teacher.
    fn example_snapshot() -> Snapshot {
        Snapshot {
            teachers: vec![Teacher {
                id: "t1".into(),
                name: "세현".into(),
            }],
            students: vec![StudentProfile {
                id: "s1".into(),
                full_name: "민준".into(),
            }],
            classes: vec![class("C1", "s1", "민준")],
            materials: vec![material("m1", "C1", "민준 칠판", "student_blackboard_image", 0)],
            ..Snapshot::default()
        }
    }

    fn listing(paths: &[&str]) -> StorageListing {
        StorageListing {
            objects: paths.iter().map(|p| StorageObject::leaf(*p)).collect(),
            warnings: Vec::new(),
        }
    }

    fn scope() -> AuditScope {
        AuditScope::new("materials", "teachers")
    }

    #[test]
    fn end_to_end_example() {
        let report = reconcile(
            &example_snapshot(),
            &listing(&["teachers/세현/note1.png"]),
            &scope(),
        );

        assert!(report.mismatched_materials.is_empty());
        assert!(report.orphaned_teacher_folders.is_empty());
        assert!(report.complex_classes.is_empty());
        assert_eq!(report.attributions.len(), 1);
        let c1 = &report.attributions[0];
        assert_eq!(c1.material_id, "m1");
        assert_eq!(c1.confidence, Confidence::Matched);
        assert_eq!(c1.inferred_owner_kind, OwnerKind::Student);
        assert_eq!(report.summary.matched, 1);
    }

    #[test]
    fn unknown_teacher_folder_is_orphaned() {
        let report = reconcile(
            &example_snapshot(),
            &listing(&["teachers/조현철/board1.png"]),
            &scope(),
        );
        let names: Vec<&str> = report
            .orphaned_teacher_folders
            .iter()
            .map(|o| o.folder_name.as_str())
            .collect();
        assert_eq!(names, ["조현철"]);
    }

    #[test]
    fn categories_are_sorted_by_id() {
        let mut snapshot = example_snapshot();
        snapshot.teachers.push(Teacher {
            id: "t2".into(),
            name: "김세현".into(),
        });
        snapshot.materials = vec![
            material("m9", "C1", "세현 판서", "student_blackboard_image", 0),
            material("m3", "C1", "세현 노트", "student_blackboard_image", 1),
            material("m5", "C1", "김세현", "student_blackboard_image", 2),
        ];

        let report = reconcile(&snapshot, &listing(&[]), &scope());
        let mismatched: Vec<&str> = report
            .mismatched_materials
            .iter()
            .map(|a| a.material_id.as_str())
            .collect();
        assert_eq!(mismatched, ["m3", "m9"]);
        assert_eq!(report.ambiguous_materials[0].material_id, "m5");
        assert_eq!(report.complex_classes.len(), 1);
        assert_eq!(report.summary.materials, 3);
        assert_eq!(report.summary.matched, 0);
    }

    #[test]
    fn snapshot_and_walk_warnings_are_merged_sorted() {
        let mut snapshot = example_snapshot();
        snapshot.warnings.push(Warning::new(
            WarningKind::AuxiliaryQuery,
            "centers",
            "no such table",
        ));
        let mut walked = listing(&[]);
        walked
            .warnings
            .push(Warning::skipped_subtree("teachers/세현", "HTTP 503"));

        let report = reconcile(&snapshot, &walked, &scope());
        let kinds: Vec<WarningKind> = report.warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, [WarningKind::SkippedSubtree, WarningKind::AuxiliaryQuery]);
        assert_eq!(report.summary.warnings, 2);
    }

    #[test]
    fn name_filter_narrows_every_category() {
        let mut snapshot = example_snapshot();
        snapshot.students.push(StudentProfile {
            id: "s2".into(),
            full_name: "지우".into(),
        });
        snapshot.classes.push(class("C2", "s2", "지우"));
        snapshot.materials.extend([
            material("m2", "C2", "세현 판서", "student_blackboard_image", 0),
            material("m3", "C2", "지우", "student_blackboard_image", 0),
        ]);
        let walked = listing(&["teachers/조현철/a.png", "students/지우/x.png"]);

        let filtered = scope().with_name_filter(Some("민준".into()));
        let report = reconcile(&snapshot, &walked, &filtered);
        assert_eq!(report.summary.materials, 1);
        assert!(report.mismatched_materials.is_empty());
        assert!(report.corrupt_ordering.is_empty());
        assert!(report.orphaned_teacher_folders.is_empty());
        assert_eq!(report.summary.storage_objects, 0);

        let unfiltered = reconcile(&snapshot, &walked, &scope());
        assert_eq!(unfiltered.summary.materials, 3);
        assert_eq!(unfiltered.mismatched_materials.len(), 1);
        assert_eq!(unfiltered.corrupt_ordering.len(), 1);
        assert_eq!(unfiltered.orphaned_teacher_folders.len(), 1);
    }

    #[test]
    fn json_uses_stable_camel_case_keys() {
        let report = reconcile(&example_snapshot(), &listing(&[]), &scope());
        let value = serde_json::to_value(&report).unwrap();
        for key in [
            "mismatchedMaterials",
            "ambiguousMaterials",
            "unattributedMaterials",
            "orphanedTeacherFolders",
            "unregisteredArtifacts",
            "complexClasses",
            "corruptOrdering",
            "warnings",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(
            value["attributions"][0]["inferredOwnerKind"],
            serde_json::json!("student")
        );
        assert_eq!(value["attributions"][0]["evidence"]["type"], "student_blackboard_image");
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = reconcile(
            &example_snapshot(),
            &listing(&["teachers/조현철/board1.png"]),
            &scope(),
        );
        let json = report.to_json(false).unwrap();
        let back: ReconciliationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
