//! Entity structs for the records the auditor reads.
//!
//! Each relational entity maps to one table (`centers`, `teachers`, `profiles`,
//! `classes`, `materials`). `StorageObject` is the one entity that comes from
//! the blob namespace instead. All structs derive `Serialize`, `Deserialize`,
//! and `JsonSchema` so they can be embedded in the report document.

mod center;
mod class;
mod material;
mod person;
mod storage;

pub use center::Center;
pub use class::ClassRecord;
pub use material::Material;
pub use person::{StudentProfile, Teacher};
pub use storage::StorageObject;
