//! Labeled field records exchanged with callers, and the decimal dictionary a
//! layout decode produces before fields are assembled.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::errors::{RebalanceError, RebalanceResult};

// ============================================================================
// Field Info
// ============================================================================

/// Kind of value a field carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
}

/// Value of a field: free text or an arbitrary-precision decimal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(BigDecimal),
    Text(String),
}

/// One displayable parameter or derived quantity of a rebalance strategy.
///
/// `label` is the external contract. `enabled == false` marks derived,
/// read-only display data rather than an editable input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub value: FieldValue,
    pub enabled: bool,
}

impl FieldInfo {
    /// Numeric field
    pub fn number(label: &str, value: BigDecimal, enabled: bool) -> Self {
        Self {
            label: label.to_string(),
            field_type: FieldType::Number,
            value: FieldValue::Number(value),
            enabled,
        }
    }

    /// Text field
    pub fn text(label: &str, value: impl Into<String>, enabled: bool) -> Self {
        Self {
            label: label.to_string(),
            field_type: FieldType::String,
            value: FieldValue::Text(value.into()),
            enabled,
        }
    }

    /// Numeric value, or an error naming the label when the field holds text
    pub fn as_number(&self) -> RebalanceResult<&BigDecimal> {
        match &self.value {
            FieldValue::Number(value) => Ok(value),
            FieldValue::Text(_) => Err(RebalanceError::invalid_value(&self.label, "expected a number")),
        }
    }

    /// Text value, or an error naming the label when the field holds a number
    pub fn as_text(&self) -> RebalanceResult<&str> {
        match &self.value {
            FieldValue::Text(value) => Ok(value),
            FieldValue::Number(_) => Err(RebalanceError::invalid_value(&self.label, "expected text")),
        }
    }
}

/// Wire form of a [`FieldInfo`]; `type` decides how `value` is read.
#[derive(Deserialize)]
struct FieldInfoRepr {
    label: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    value: RawValue,
    enabled: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Text(String),
    Number(BigDecimal),
}

impl<'de> Deserialize<'de> for FieldInfo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = FieldInfoRepr::deserialize(deserializer)?;
        repr.into_field_info().map_err(serde::de::Error::custom)
    }
}

impl FieldInfoRepr {
    fn into_field_info(self) -> RebalanceResult<FieldInfo> {
        let Self { label, field_type, value, enabled } = self;
        let value = match (field_type, value) {
            (FieldType::String, RawValue::Text(text)) => FieldValue::Text(text),
            (FieldType::String, RawValue::Number(number)) => FieldValue::Text(number.to_string()),
            (FieldType::Number, RawValue::Number(number)) => FieldValue::Number(number),
            (FieldType::Number, RawValue::Text(text)) => {
                let number = BigDecimal::from_str(text.trim()).map_err(|_| {
                    RebalanceError::invalid_value(&label, format!("expected a number, got {:?}", text))
                })?;
                FieldValue::Number(number)
            }
        };
        Ok(FieldInfo {
            label,
            field_type,
            value,
            enabled,
        })
    }
}

/// Look up a field by label
pub fn find_field<'a>(fields: &'a [FieldInfo], label: &str) -> RebalanceResult<&'a FieldInfo> {
    fields
        .iter()
        .find(|field| field.label == label)
        .ok_or_else(|| RebalanceError::FieldNotFound(label.to_string()))
}

/// Look up a numeric field by label
pub fn find_number<'a>(fields: &'a [FieldInfo], label: &str) -> RebalanceResult<&'a BigDecimal> {
    find_field(fields, label)?.as_number()
}

// ============================================================================
// Fields Dict
// ============================================================================

/// Ordered label → decimal mapping, in the order values were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldsDict {
    entries: Vec<(String, BigDecimal)>,
}

impl FieldsDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value
    pub fn insert(&mut self, label: &str, value: BigDecimal) {
        match self.entries.iter_mut().find(|(existing, _)| existing == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label.to_string(), value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&BigDecimal> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| value)
    }

    /// Value for `label`, or [`RebalanceError::FieldNotFound`]
    pub fn require(&self, label: &str) -> RebalanceResult<&BigDecimal> {
        self.get(label)
            .ok_or_else(|| RebalanceError::FieldNotFound(label.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BigDecimal)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect the numeric fields of a field list. Text fields are skipped.
    pub fn from_field_infos(fields: &[FieldInfo]) -> Self {
        let mut dict = Self::new();
        for field in fields {
            if let FieldValue::Number(value) = &field.value {
                dict.insert(&field.label, value.clone());
            }
        }
        dict
    }
}
