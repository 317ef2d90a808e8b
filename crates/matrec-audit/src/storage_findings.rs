//! Findings about storage objects the relational store does not explain.

use std::collections::{BTreeMap, BTreeSet};

use matrec_core::entities::{Material, StorageObject, StudentProfile, Teacher};
use matrec_core::names::{NormalizedName, normalize};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::attribution::Roster;

/// A folder under the teacher root named after nobody on the roster.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedFolder {
    pub path: String,
    pub folder_name: String,
    /// Leaf objects found anywhere below the folder.
    pub object_count: usize,
}

/// A stored file that names a person but matches no material title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnregisteredArtifact {
    pub path: String,
    /// Names found in the path: students first, then teachers, in roster order.
    pub matched_names: Vec<String>,
}

/// Teacher folders under `teacher_root` whose name matches no roster teacher.
///
/// Files sitting directly in the root are not folders and are ignored.
#[must_use]
pub fn orphaned_teacher_folders(
    objects: &[StorageObject],
    teacher_root: &str,
    roster: &Roster<'_>,
) -> Vec<OrphanedFolder> {
    let mut folders: BTreeMap<String, (String, usize)> = BTreeMap::new();

    for object in objects {
        let Some(rest) = under_root(&object.path, teacher_root) else {
            continue;
        };
        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let Some(folder_name) = segments.next() else {
            continue;
        };
        let is_inside = segments.next().is_some();
        if !is_inside && !object.is_directory {
            continue;
        }
        let path = if teacher_root.is_empty() {
            folder_name.to_string()
        } else {
            format!("{teacher_root}/{folder_name}")
        };
        let entry = folders
            .entry(path)
            .or_insert_with(|| (folder_name.to_string(), 0));
        if !object.is_directory {
            entry.1 += 1;
        }
    }

    folders
        .into_iter()
        .filter(|(_, (name, _))| !roster.knows(name))
        .map(|(path, (folder_name, object_count))| OrphanedFolder {
            path,
            folder_name,
            object_count,
        })
        .collect()
}

/// Path below `root`, or `None` when the path is not inside it.
fn under_root<'p>(path: &'p str, root: &str) -> Option<&'p str> {
    let path = path.trim_start_matches('/');
    if root.is_empty() {
        return Some(path);
    }
    path.strip_prefix(root)?.strip_prefix('/')
}

/// Leaf objects whose path contains a known person's name but whose file
/// stem is equivalent to no material title. Equivalence is equality after
/// normalization; a stem that is only a fragment of a title (`1.png` under a
/// title "민준 칠판 1") is not registered by it.
#[must_use]
pub fn unregistered_artifacts(
    objects: &[StorageObject],
    students: &[StudentProfile],
    teachers: &[Teacher],
    materials: &[Material],
) -> Vec<UnregisteredArtifact> {
    let people: Vec<NormalizedName> = students
        .iter()
        .map(|s| NormalizedName::new(&s.full_name))
        .chain(teachers.iter().map(|t| NormalizedName::new(&t.name)))
        .filter(|name| !name.normalized().is_empty())
        .collect();
    let titles: BTreeSet<String> = materials
        .iter()
        .map(|m| normalize(&m.title))
        .filter(|title| !title.is_empty())
        .collect();

    let mut found: Vec<UnregisteredArtifact> = objects
        .iter()
        .filter(|object| !object.is_directory)
        .filter_map(|object| {
            let path = normalize(&object.path);
            let mut matched_names: Vec<String> = Vec::new();
            for person in people.iter().filter(|p| p.matches(&path)) {
                if !matched_names.iter().any(|n| n == person.raw()) {
                    matched_names.push(person.raw().to_string());
                }
            }
            if matched_names.is_empty() {
                return None;
            }
            let registered = titles.contains(&normalize(object.stem()));
            (!registered).then(|| UnregisteredArtifact {
                path: object.path.clone(),
                matched_names,
            })
        })
        .collect();
    found.sort();
    found
}
