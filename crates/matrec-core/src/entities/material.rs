use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MaterialType;

/// A stored lesson artifact linked to exactly one class.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Material {
    pub id: String,
    pub class_id: String,
    pub title: String,
    #[serde(rename = "type")]
    #[schemars(with = "String")]
    pub material_type: MaterialType,
    pub order_index: i64,
}
