//! # Merge Engine
//!
//! Overlays state-derived fields onto a params-derived field list by label.
//! State is authoritative; fields it does not mention pass through untouched.

use crate::types::FieldInfo;

/// Replace the same-label field in place, or append.
pub fn upsert_field_info(fields: &mut Vec<FieldInfo>, field: FieldInfo) {
    match fields.iter_mut().find(|existing| existing.label == field.label) {
        Some(existing) => {
            existing.field_type = field.field_type;
            existing.value = field.value;
            existing.enabled = field.enabled;
        }
        None => fields.push(field),
    }
}

/// `base` with every override applied in order. Base positions are kept and
/// new labels are appended in override order.
pub fn upsert_field_infos(base: Vec<FieldInfo>, overrides: Vec<FieldInfo>) -> Vec<FieldInfo> {
    let mut merged = base;
    for field in overrides {
        upsert_field_info(&mut merged, field);
    }
    merged
}
