// handlers/mod.rs - two security tiers
//
// public    → no authentication (/auth/*)
// protected → bearer token required (/api/*), with list and todo context
//             resolved by middleware before the handler runs

pub mod protected;
pub mod public;

use std::collections::BTreeMap;

use crate::error::ApiError;

/// Fails with a field-level validation error for every blank value
pub(crate) fn require_fields(fields: &[(&str, &str)]) -> Result<(), ApiError> {
    let missing: BTreeMap<String, String> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| (name.to_string(), "This field is required".to_string()))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Missing required fields", Some(missing)))
    }
}

/// A patch may omit `title`, but a present title must not be blank
pub(crate) fn reject_blank_title(title: Option<&str>) -> Result<(), ApiError> {
    match title {
        Some(t) if t.trim().is_empty() => {
            let mut fields = BTreeMap::new();
            fields.insert("title".to_string(), "Title must not be empty".to_string());
            Err(ApiError::validation_error("Invalid field value", Some(fields)))
        }
        _ => Ok(()),
    }
}
