use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A class joined with its student's name.
///
/// `student_name` is `None` when the profile row for `student_id` is missing;
/// `class_date` is `None` when the column is empty or unparseable.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClassRecord {
    pub id: String,
    pub title: String,
    pub class_date: Option<NaiveDate>,
    pub student_id: String,
    pub student_name: Option<String>,
}
