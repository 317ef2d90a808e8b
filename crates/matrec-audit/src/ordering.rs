//! Ordering & complexity analyzer.
//!
//! A class is expected to own at most one material. When it owns more, it is
//! reported as complex (informational) and its `order_index` values must form
//! a strictly increasing, gap-free run; duplicates or gaps are reported
//! separately as corrupt ordering.

use std::collections::{BTreeMap, BTreeSet};

use matrec_core::entities::{ClassRecord, Material};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A material as listed inside a class finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRef {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub material_type: String,
    pub order_index: i64,
}

impl From<&Material> for MaterialRef {
    fn from(material: &Material) -> Self {
        Self {
            id: material.id.clone(),
            title: material.title.clone(),
            material_type: material.material_type.as_str().to_string(),
            order_index: material.order_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplexClass {
    pub class_id: String,
    pub class_title: Option<String>,
    pub student_id: Option<String>,
    /// Sorted by `orderIndex`, then id.
    pub materials: Vec<MaterialRef>,
}

/// Upper bound on listed missing indices per class.
const MAX_MISSING_LISTED: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CorruptOrdering {
    pub class_id: String,
    /// Every index in the class, sorted.
    pub order_indices: Vec<i64>,
    /// Indices used by more than one material.
    pub duplicate_indices: Vec<i64>,
    /// Indices absent between the lowest and highest one (at most 1000 listed).
    pub missing_indices: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingFindings {
    pub complex_classes: Vec<ComplexClass>,
    pub corrupt_ordering: Vec<CorruptOrdering>,
}

/// Analyze the classes named in `class_ids`. Materials of other classes are
/// ignored. Output is sorted by class id.
#[must_use]
pub fn analyze(
    materials: &[Material],
    classes: &[ClassRecord],
    class_ids: &BTreeSet<&str>,
) -> OrderingFindings {
    let mut by_class: BTreeMap<&str, Vec<&Material>> = BTreeMap::new();
    for material in materials {
        if class_ids.contains(material.class_id.as_str()) {
            by_class
                .entry(material.class_id.as_str())
                .or_default()
                .push(material);
        }
    }
    let class_of: BTreeMap<&str, &ClassRecord> =
        classes.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut findings = OrderingFindings::default();
    for (class_id, mut members) in by_class {
        if members.len() < 2 {
            continue;
        }
        members.sort_by(|a, b| (a.order_index, &a.id).cmp(&(b.order_index, &b.id)));

        let class = class_of.get(class_id);
        findings.complex_classes.push(ComplexClass {
            class_id: class_id.to_string(),
            class_title: class.map(|c| c.title.clone()),
            student_id: class.map(|c| c.student_id.clone()),
            materials: members.iter().map(|m| MaterialRef::from(*m)).collect(),
        });

        let indices: Vec<i64> = members.iter().map(|m| m.order_index).collect();
        if let Some(corrupt) = check_indices(class_id, &indices) {
            findings.corrupt_ordering.push(corrupt);
        }
    }
    findings
}

/// `indices` must already be sorted.
fn check_indices(class_id: &str, indices: &[i64]) -> Option<CorruptOrdering> {
    let duplicate_indices: Vec<i64> = indices
        .windows(2)
        .filter(|pair| pair[0] == pair[1])
        .map(|pair| pair[0])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let missing_indices: Vec<i64> = indices
        .windows(2)
        .flat_map(|pair| pair[0].saturating_add(1)..pair[1])
        .take(MAX_MISSING_LISTED)
        .collect();

    if duplicate_indices.is_empty() && missing_indices.is_empty() {
        return None;
    }
    Some(CorruptOrdering {
        class_id: class_id.to_string(),
        order_indices: indices.to_vec(),
        duplicate_indices,
        missing_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrec_core::enums::MaterialType;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn materials(class_id: &str, indices: &[i64]) -> Vec<Material> {
        indices
            .iter()
            .enumerate()
            .map(|(i, &order_index)| Material {
                id: format!("{class_id}-m{i}"),
                class_id: class_id.into(),
                title: format!("board {i}"),
                material_type: MaterialType::StudentBlackboardImage,
                order_index,
            })
            .collect()
    }

    fn run(materials: &[Material]) -> OrderingFindings {
        let ids: BTreeSet<&str> = materials.iter().map(|m| m.class_id.as_str()).collect();
        analyze(materials, &[], &ids)
    }

    #[test]
    fn contiguous_indices_are_complex_but_not_corrupt() {
        let findings = run(&materials("c1", &[2, 0, 1]));
        assert_eq!(findings.complex_classes.len(), 1);
        let order: Vec<i64> = findings.complex_classes[0]
            .materials
            .iter()
            .map(|m| m.order_index)
            .collect();
        assert_eq!(order, [0, 1, 2]);
        assert!(findings.corrupt_ordering.is_empty());
    }

    #[test]
    fn duplicate_index_is_named() {
        let findings = run(&materials("c1", &[0, 0, 2]));
        assert_eq!(
            findings.corrupt_ordering,
            vec![CorruptOrdering {
                class_id: "c1".into(),
                order_indices: vec![0, 0, 2],
                duplicate_indices: vec![0],
                missing_indices: vec![1],
            }]
        );
    }

    #[rstest]
    #[case(&[0], 0)]
    #[case(&[0, 1], 1)]
    fn complex_only_above_one_material(#[case] indices: &[i64], #[case] expected: usize) {
        let findings = run(&materials("c1", indices));
        assert_eq!(findings.complex_classes.len(), expected);
        if expected == 1 {
            assert_eq!(findings.complex_classes[0].materials.len(), 2);
        }
    }

    #[rstest]
    #[case(&[1, 2, 3], vec![], vec![])]
    #[case(&[0, 3], vec![], vec![1, 2])]
    #[case(&[4, 4, 4], vec![4], vec![])]
    fn index_checks(
        #[case] indices: &[i64],
        #[case] duplicates: Vec<i64>,
        #[case] missing: Vec<i64>,
    ) {
        let found = check_indices("c", indices);
        match found {
            None => assert!(duplicates.is_empty() && missing.is_empty()),
            Some(corrupt) => {
                assert_eq!(corrupt.duplicate_indices, duplicates);
                assert_eq!(corrupt.missing_indices, missing);
            }
        }
    }

    #[test]
    fn classes_outside_scope_are_skipped() {
        let all = materials("c1", &[0, 0]);
        let findings = analyze(&all, &[], &BTreeSet::new());
        assert_eq!(findings, OrderingFindings::default());
    }

    #[test]
    fn class_details_are_attached() {
        let classes = vec![ClassRecord {
            id: "c1".into(),
            title: "수학".into(),
            class_date: None,
            student_id: "s1".into(),
            student_name: Some("민준".into()),
        }];
        let all = materials("c1", &[0, 1]);
        let ids = BTreeSet::from(["c1"]);
        let findings = analyze(&all, &classes, &ids);
        assert_eq!(findings.complex_classes[0].class_title.as_deref(), Some("수학"));
        assert_eq!(findings.complex_classes[0].student_id.as_deref(), Some("s1"));
    }
}
