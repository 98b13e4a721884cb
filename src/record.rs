//! The record pushed through every codec.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One element of [`TestRecord::tests`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TestEntry {
    pub rty: String,
    pub ott: i64,
}

/// The ad hoc structure every format is measured against.
///
/// Field names double as XML element names, Avro field names and map keys in
/// the self-describing formats, so renaming a field changes encoded sizes.
/// Collections default to empty because XML drops empty repeated elements.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TestRecord {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub service_ids: Vec<i32>,
    #[serde(default)]
    pub tests: Vec<TestEntry>,
    #[serde(default)]
    pub flts: Vec<f64>,
    #[serde(default)]
    pub dict: HashMap<String, i32>,
    pub very_long_name_for_small_variable: f32,
}
