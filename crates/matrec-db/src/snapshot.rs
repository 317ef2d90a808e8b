//! Relational snapshot loader.
//!
//! One query per table, joins done in SQL, five round trips regardless of
//! dataset size. Core tables (teachers, profiles, classes, materials) are
//! mandatory: any failure aborts the load. Centers are reference data only,
//! so a failing `centers` query is downgraded to a warning.

use matrec_core::entities::{Center, ClassRecord, Material, StudentProfile, Teacher};
use matrec_core::enums::{CenterKind, MaterialType};
use matrec_core::warnings::{Warning, WarningKind};

use crate::MatDb;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_string_or_empty, parse_date};

const TEACHERS_SQL: &str = "SELECT id, name FROM teachers ORDER BY id";

const PROFILES_SQL: &str = "SELECT id, full_name FROM profiles ORDER BY id";

const CLASSES_SQL: &str = "SELECT c.id, c.title, c.class_date, c.student_id, p.full_name
     FROM classes c
     LEFT JOIN profiles p ON p.id = c.student_id
     ORDER BY c.id";

const MATERIALS_SQL: &str = "SELECT id, class_id, title, type, order_index
     FROM materials
     ORDER BY class_id, order_index, id";

const CENTERS_SQL: &str = "SELECT id, name, kind FROM centers ORDER BY id";

/// Everything the reconciliation engine reads from the relational store.
///
/// Built once per run and shared read-only afterwards. `teachers` is in
/// roster order (by id), which is the order ambiguity evidence is listed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub centers: Vec<Center>,
    pub teachers: Vec<Teacher>,
    pub students: Vec<StudentProfile>,
    pub classes: Vec<ClassRecord>,
    pub materials: Vec<Material>,
    /// Recoverable problems found while loading.
    pub warnings: Vec<Warning>,
}

/// A mapped row plus the recoverable problem found while mapping it.
type Mapped<T> = (T, Option<Warning>);

impl MatDb {
    /// Load the full snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any core table cannot be read.
    pub async fn load_snapshot(&self) -> Result<Snapshot, DatabaseError> {
        let mut snapshot = Snapshot::default();

        snapshot.teachers = self
            .query_map(TEACHERS_SQL, |row| {
                Ok(Teacher {
                    id: row.get::<String>(0)?,
                    name: get_string_or_empty(row, 1)?,
                })
            })
            .await?;

        snapshot.students = self
            .query_map(PROFILES_SQL, |row| {
                Ok(StudentProfile {
                    id: row.get::<String>(0)?,
                    full_name: get_string_or_empty(row, 1)?,
                })
            })
            .await?;

        for (class, warning) in self.query_map(CLASSES_SQL, row_to_class).await? {
            snapshot.classes.push(class);
            snapshot.warnings.extend(warning);
        }

        for (material, warning) in self.query_map(MATERIALS_SQL, row_to_material).await? {
            snapshot.materials.push(material);
            snapshot.warnings.extend(warning);
        }

        match self.query_map(CENTERS_SQL, row_to_center).await {
            Ok(rows) => {
                for (center, warning) in rows {
                    snapshot.centers.extend(center);
                    snapshot.warnings.extend(warning);
                }
            }
            Err(error) => {
                tracing::warn!(%error, "centers query failed; continuing without centers");
                snapshot.warnings.push(Warning::new(
                    WarningKind::AuxiliaryQuery,
                    "centers",
                    error.to_string(),
                ));
            }
        }

        tracing::info!(
            teachers = snapshot.teachers.len(),
            students = snapshot.students.len(),
            classes = snapshot.classes.len(),
            materials = snapshot.materials.len(),
            centers = snapshot.centers.len(),
            warnings = snapshot.warnings.len(),
            "relational snapshot loaded"
        );

        Ok(snapshot)
    }
}

fn row_to_class(row: &libsql::Row) -> Result<Mapped<ClassRecord>, DatabaseError> {
    let id = row.get::<String>(0)?;
    let mut warning = None;
    let class_date = match get_opt_string(row, 2)? {
        Some(raw) => match parse_date(&raw) {
            Ok(date) => Some(date),
            Err(error) => {
                warning = Some(Warning::new(
                    WarningKind::InvalidField,
                    format!("classes/{id}"),
                    error.to_string(),
                ));
                None
            }
        },
        None => None,
    };
    let student_id = row.get::<String>(3)?;
    let student_name = get_opt_string(row, 4)?;

    let class = ClassRecord {
        title: get_string_or_empty(row, 1)?,
        class_date,
        student_id,
        student_name,
        id,
    };
    Ok((class, warning))
}

fn row_to_material(row: &libsql::Row) -> Result<Mapped<Material>, DatabaseError> {
    let id = row.get::<String>(0)?;
    let mut warning = None;
    let order_index = row.get::<Option<i64>>(4)?.unwrap_or_else(|| {
        warning = Some(Warning::new(
            WarningKind::InvalidField,
            format!("materials/{id}"),
            "order_index is NULL; treated as 0",
        ));
        0
    });

    let material = Material {
        class_id: row.get::<String>(1)?,
        title: get_string_or_empty(row, 2)?,
        material_type: MaterialType::from(get_string_or_empty(row, 3)?),
        order_index,
        id,
    };
    Ok((material, warning))
}

/// Centers with an unknown `kind` are dropped with a warning.
fn row_to_center(row: &libsql::Row) -> Result<Mapped<Option<Center>>, DatabaseError> {
    let id = row.get::<String>(0)?;
    let raw_kind = get_string_or_empty(row, 2)?;
    match raw_kind.parse::<CenterKind>() {
        Ok(kind) => {
            let center = Center {
                name: get_string_or_empty(row, 1)?,
                kind,
                id,
            };
            Ok((Some(center), None))
        }
        Err(error) => {
            let warning = Warning::new(
                WarningKind::InvalidField,
                format!("centers/{id}"),
                error.to_string(),
            );
            Ok((None, Some(warning)))
        }
    }
}
