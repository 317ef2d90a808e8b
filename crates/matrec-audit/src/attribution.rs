//! Attribution engine.
//!
//! Decides who a material really belongs to. The declared owner is the
//! student of the material's class; the title is then checked against that
//! student's name first and the teacher roster second:
//!
//! | title matches                 | type                       | result               |
//! |-------------------------------|----------------------------|----------------------|
//! | declared student              | any                        | matched / student    |
//! | exactly one teacher           | `teacher_blackboard_image` | matched / teacher    |
//! | exactly one teacher           | anything else              | mismatched / teacher |
//! | two or more teachers          | any                        | ambiguous            |
//! | nobody                        | any                        | unattributed         |
//!
//! A material whose class or student name cannot be resolved is
//! unattributed with a `missing_relation` warning.

use std::collections::HashMap;

use matrec_core::entities::{ClassRecord, Material, Teacher};
use matrec_core::enums::{Confidence, OwnerKind};
use matrec_core::names::{NormalizedName, normalize};
use matrec_core::warnings::{Warning, WarningKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A teacher whose name appeared in a material title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Candidate {
    pub id: String,
    pub name: String,
}

/// Why an attribution came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub class_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub material_type: String,
    pub declared_student_id: Option<String>,
    pub declared_student_name: Option<String>,
    /// Matching teachers in roster order.
    pub candidates: Vec<Candidate>,
    pub note: String,
}

/// Inferred owner of one material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttributionResult {
    pub material_id: String,
    pub inferred_owner_kind: OwnerKind,
    pub inferred_owner_id: Option<String>,
    pub confidence: Confidence,
    pub evidence: Evidence,
}

/// Teacher roster with names pre-normalized, kept in roster order.
pub struct Roster<'a> {
    teachers: Vec<(&'a Teacher, NormalizedName)>,
}

impl<'a> Roster<'a> {
    #[must_use]
    pub fn new(teachers: &'a [Teacher]) -> Self {
        Self {
            teachers: teachers
                .iter()
                .map(|t| (t, NormalizedName::new(&t.name)))
                .collect(),
        }
    }

    /// Teachers whose name matches the already-normalized `text`.
    pub fn matching<'s>(&'s self, normalized: &'s str) -> impl Iterator<Item = &'a Teacher> + 's {
        self.teachers
            .iter()
            .filter(move |(_, name)| name.matches(normalized))
            .map(|(teacher, _)| *teacher)
    }

    /// Whether any roster teacher's name matches `text`.
    #[must_use]
    pub fn knows(&self, text: &str) -> bool {
        self.matching(&normalize(text)).next().is_some()
    }
}

/// Attributes materials against one snapshot.
pub struct Attributor<'a> {
    classes: HashMap<&'a str, &'a ClassRecord>,
    roster: Roster<'a>,
}

impl<'a> Attributor<'a> {
    #[must_use]
    pub fn new(classes: &'a [ClassRecord], teachers: &'a [Teacher]) -> Self {
        Self {
            classes: classes.iter().map(|c| (c.id.as_str(), c)).collect(),
            roster: Roster::new(teachers),
        }
    }

    #[must_use]
    pub fn class(&self, id: &str) -> Option<&'a ClassRecord> {
        self.classes.get(id).copied()
    }

    /// Attribute one material. Unresolvable relations push a warning.
    pub fn attribute(&self, material: &Material, warnings: &mut Vec<Warning>) -> AttributionResult {
        let class = self.class(&material.class_id);
        let mut evidence = Evidence {
            class_id: material.class_id.clone(),
            title: material.title.clone(),
            material_type: material.material_type.as_str().to_string(),
            declared_student_id: class.map(|c| c.student_id.clone()),
            declared_student_name: class.and_then(|c| c.student_name.clone()),
            candidates: Vec::new(),
            note: String::new(),
        };

        let Some(class) = class else {
            warnings.push(Warning::new(
                WarningKind::MissingRelation,
                format!("materials/{}", material.id),
                format!("class {} not found", material.class_id),
            ));
            evidence.note = "class not found".into();
            return unattributed(material, evidence);
        };
        let Some(student_name) = class.student_name.as_deref() else {
            warnings.push(Warning::new(
                WarningKind::MissingRelation,
                format!("materials/{}", material.id),
                format!(
                    "class {} has no name for student {}",
                    class.id, class.student_id
                ),
            ));
            evidence.note = "declared student has no profile name".into();
            return unattributed(material, evidence);
        };

        let title = normalize(&material.title);
        if NormalizedName::new(student_name).matches(&title) {
            evidence.note = if material.material_type.is_teacher_blackboard() {
                format!(
                    "title names the declared student but the material is typed {}",
                    material.material_type
                )
            } else {
                "title names the declared student".into()
            };
            return AttributionResult {
                material_id: material.id.clone(),
                inferred_owner_kind: OwnerKind::Student,
                inferred_owner_id: Some(class.student_id.clone()),
                confidence: Confidence::Matched,
                evidence,
            };
        }

        let matched: Vec<&Teacher> = self.roster.matching(&title).collect();
        evidence.candidates = matched
            .iter()
            .map(|t| Candidate {
                id: t.id.clone(),
                name: t.name.clone(),
            })
            .collect();

        match matched.as_slice() {
            [] => {
                evidence.note = "title names neither the student nor any teacher".into();
                unattributed(material, evidence)
            }
            [teacher] => {
                let confidence = if material.material_type.is_teacher_blackboard() {
                    evidence.note = "teacher-typed material titled with its teacher".into();
                    Confidence::Matched
                } else {
                    evidence.note = format!(
                        "title names teacher {} but the material is typed {}",
                        teacher.name, material.material_type
                    );
                    Confidence::Mismatched
                };
                AttributionResult {
                    material_id: material.id.clone(),
                    inferred_owner_kind: OwnerKind::Teacher,
                    inferred_owner_id: Some(teacher.id.clone()),
                    confidence,
                    evidence,
                }
            }
            _ => {
                evidence.note = format!("title names {} teachers", matched.len());
                AttributionResult {
                    material_id: material.id.clone(),
                    inferred_owner_kind: OwnerKind::Teacher,
                    inferred_owner_id: None,
                    confidence: Confidence::Ambiguous,
                    evidence,
                }
            }
        }
    }
}

fn unattributed(material: &Material, evidence: Evidence) -> AttributionResult {
    AttributionResult {
        material_id: material.id.clone(),
        inferred_owner_kind: OwnerKind::Unknown,
        inferred_owner_id: None,
        confidence: Confidence::Unattributed,
        evidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrec_core::enums::MaterialType;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn teachers() -> Vec<Teacher> {
        vec![
            Teacher {
                id: "t1".into(),
                name: "세현".into(),
            },
            Teacher {
                id: "t2".into(),
                name: "김세현".into(),
            },
            Teacher {
                id: "t3".into(),
                name: "조현철".into(),
            },
        ]
    }

    fn classes() -> Vec<ClassRecord> {
        vec![
            ClassRecord {
                id: "c1".into(),
                title: "수학".into(),
                class_date: None,
                student_id: "s1".into(),
                student_name: Some("민준".into()),
            },
            ClassRecord {
                id: "c2".into(),
                title: "영어".into(),
                class_date: None,
                student_id: "s404".into(),
                student_name: None,
            },
        ]
    }

    fn material(class_id: &str, title: &str, kind: &str) -> Material {
        Material {
            id: "m1".into(),
            class_id: class_id.into(),
            title: title.into(),
            material_type: MaterialType::from(kind),
            order_index: 0,
        }
    }

    fn attribute(material: &Material) -> (AttributionResult, Vec<Warning>) {
        let (classes, teachers) = (classes(), teachers());
        let attributor = Attributor::new(&classes, &teachers);
        let mut warnings = Vec::new();
        let result = attributor.attribute(material, &mut warnings);
        (result, warnings)
    }

    #[rstest]
    #[case("민준")]
    #[case("민 준 칠판")]
    #[case("MINJUN 민준")]
    fn student_name_in_title_is_matched_student(#[case] title: &str) {
        let (result, warnings) = attribute(&material("c1", title, "student_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Matched);
        assert_eq!(result.inferred_owner_kind, OwnerKind::Student);
        assert_eq!(result.inferred_owner_id.as_deref(), Some("s1"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn student_match_wins_over_teacher_type() {
        let (result, _) = attribute(&material("c1", "민준 조현철", "teacher_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Matched);
        assert_eq!(result.inferred_owner_kind, OwnerKind::Student);
    }

    #[test]
    fn teacher_typed_material_naming_the_student_is_matched_with_a_note() {
        let (result, warnings) = attribute(&material("c1", "민준 칠판", "teacher_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Matched);
        assert_eq!(result.inferred_owner_kind, OwnerKind::Student);
        assert_eq!(result.inferred_owner_id.as_deref(), Some("s1"));
        assert!(result.evidence.candidates.is_empty());
        assert_eq!(
            result.evidence.note,
            "title names the declared student but the material is typed teacher_blackboard_image"
        );
        assert!(warnings.is_empty());
    }

    #[rstest]
    #[case("student_blackboard_image", Confidence::Mismatched)]
    #[case("blackboard_image", Confidence::Mismatched)]
    #[case("teacher_blackboard_image", Confidence::Matched)]
    fn single_teacher_depends_on_type(#[case] kind: &str, #[case] expected: Confidence) {
        let (result, _) = attribute(&material("c1", "조현철 판서", kind));
        assert_eq!(result.confidence, expected);
        assert_eq!(result.inferred_owner_kind, OwnerKind::Teacher);
        assert_eq!(result.inferred_owner_id.as_deref(), Some("t3"));
        assert_eq!(result.evidence.candidates.len(), 1);
    }

    #[test]
    fn overlapping_teacher_names_are_ambiguous_in_roster_order() {
        let (result, _) = attribute(&material("c1", "김세현 칠판", "student_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Ambiguous);
        assert_eq!(result.inferred_owner_id, None);
        let ids: Vec<&str> = result
            .evidence
            .candidates
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["t1", "t2"]);
    }

    #[test]
    fn nobody_named_is_unattributed() {
        let (result, warnings) = attribute(&material("c1", "칠판", "student_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Unattributed);
        assert_eq!(result.inferred_owner_kind, OwnerKind::Unknown);
        assert!(warnings.is_empty());
    }

    #[test]
    fn missing_student_name_is_unattributed_with_warning() {
        let (result, warnings) = attribute(&material("c2", "조현철", "student_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Unattributed);
        assert_eq!(result.evidence.declared_student_id.as_deref(), Some("s404"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingRelation);
        assert_eq!(warnings[0].subject, "materials/m1");
    }

    #[test]
    fn missing_class_is_unattributed_with_warning() {
        let (result, warnings) = attribute(&material("gone", "민준", "student_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Unattributed);
        assert_eq!(result.evidence.declared_student_id, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn empty_title_matches_nobody() {
        let (result, _) = attribute(&material("c1", "   ", "student_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Unattributed);
    }

    #[test]
    fn no_fuzzy_teacher_match() {
        let (result, _) = attribute(&material("c1", "조현칠 판서", "student_blackboard_image"));
        assert_eq!(result.confidence, Confidence::Unattributed);
    }

    #[test]
    fn roster_knows_folder_names() {
        let teachers = teachers();
        let roster = Roster::new(&teachers);
        assert!(roster.knows("세현"));
        assert!(!roster.knows("박지훈"));
        assert!(!roster.knows(""));
    }
}
