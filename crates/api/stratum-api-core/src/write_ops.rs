//! Write operations produced by the evaluator to describe scalar writes into
//! a host object, for hosts that transport writes instead of applying them
//! in-process.
//!
//! WriteOp serializes to JSON as:
//!   { "path": "location", "index": 0, "value": 47.05 }
//!
//! WriteBatch is a simple Vec<WriteOp> with helpers.

use serde::{Deserialize, Serialize};

use crate::PropIdentifier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOp {
    #[serde(rename = "path")]
    pub rna_path: String,
    #[serde(rename = "index")]
    pub array_index: i32,
    pub value: f32,
}

impl WriteOp {
    pub fn new(rna_path: impl Into<String>, array_index: i32, value: f32) -> Self {
        Self {
            rna_path: rna_path.into(),
            array_index,
            value,
        }
    }

    pub fn from_ident(ident: &PropIdentifier, value: f32) -> Self {
        Self::new(ident.rna_path.clone(), ident.array_index, value)
    }
}

/// Ordered list of writes; order is the order they should be applied in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriteBatch(pub Vec<WriteOp>);

impl WriteBatch {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, op: WriteOp) {
        self.0.push(op);
    }

    pub fn iter(&self) -> impl Iterator<Item = &WriteOp> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last written value for the given component, if any.
    pub fn value_of(&self, rna_path: &str, array_index: i32) -> Option<f32> {
        self.0
            .iter()
            .rev()
            .find(|op| op.array_index == array_index && op.rna_path == rna_path)
            .map(|op| op.value)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl IntoIterator for WriteBatch {
    type Item = WriteOp;
    type IntoIter = std::vec::IntoIter<WriteOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<WriteOp> for WriteBatch {
    fn from_iter<I: IntoIterator<Item = WriteOp>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writeop_json_shape() {
        let op = WriteOp::new("location", 1, 2.5);
        let v = serde_json::to_value(&op).unwrap();
        assert_eq!(v, serde_json::json!({ "path": "location", "index": 1, "value": 2.5 }));
    }

    #[test]
    fn batch_is_a_plain_json_array() {
        let batch: WriteBatch = vec![
            WriteOp::new("location", 0, 1.0),
            WriteOp::new("location", 0, 3.0),
        ]
        .into_iter()
        .collect();
        let json = batch.to_json().unwrap();
        assert!(json.starts_with('['));
        let parsed: WriteBatch = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.value_of("location", 0), Some(3.0));
        assert_eq!(parsed.value_of("location", 1), None);
    }
}
