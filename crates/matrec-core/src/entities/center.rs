use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CenterKind;

/// A tutoring center or study hall. Reference data only.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Center {
    pub id: String,
    pub name: String,
    pub kind: CenterKind,
}
