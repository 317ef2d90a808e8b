use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A teacher on the roster.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Teacher {
    pub id: String,
    pub name: String,
}

/// A student profile (`profiles` table).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StudentProfile {
    pub id: String,
    pub full_name: String,
}
