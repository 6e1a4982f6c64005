//! Form serialization for submission.
//!
//! Both body formats share the same field traversal: unnamed fields,
//! disabled fields, and button-like kinds never serialize; checkboxes
//! and radios contribute only while checked; multi-selects contribute
//! one pair per selected option.

use std::collections::HashMap;

use url::form_urlencoded;

use crate::form::{FieldKind, Form};

/// Wire format of the submission body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    UrlEncoded,
    Json,
}

impl BodyFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            BodyFormat::UrlEncoded => "application/x-www-form-urlencoded",
            BodyFormat::Json => "application/json",
        }
    }
}

fn serializable_pairs(form: &Form) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();
    for field in form.fields() {
        let Some(key) = field.serialize_key() else {
            continue;
        };
        if !field.enabled || !kind_serializes(field.kind) {
            continue;
        }
        match field.kind {
            FieldKind::SelectMultiple => {
                for option in &field.selected {
                    pairs.push((key, option.as_str()));
                }
            }
            FieldKind::Checkbox | FieldKind::Radio => {
                if field.checked {
                    pairs.push((key, field.value.as_str()));
                }
            }
            _ => pairs.push((key, field.value.as_str())),
        }
    }
    pairs
}

fn kind_serializes(kind: FieldKind) -> bool {
    !matches!(
        kind,
        FieldKind::File | FieldKind::Reset | FieldKind::Submit | FieldKind::Button
    )
}

/// Serialize the form's current values into the given body format.
///
/// The url-encoded form keeps repeated keys; the associative JSON form
/// keeps the last value per key.
pub fn serialize_form(form: &Form, format: BodyFormat) -> String {
    let pairs = serializable_pairs(form);
    match format {
        BodyFormat::UrlEncoded => {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (key, value) in pairs {
                serializer.append_pair(key, value);
            }
            serializer.finish()
        }
        BodyFormat::Json => {
            let mut map = serde_json::Map::new();
            for (key, value) in pairs {
                map.insert(key.to_string(), serde_json::Value::String(value.to_string()));
            }
            serde_json::Value::Object(map).to_string()
        }
    }
}

/// Lower-case all header names so duplicates cannot slip through.
pub fn normalize_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.clone()))
        .collect()
}

/// Default headers for a body format.
pub fn default_headers(format: BodyFormat) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), format.content_type().to_string());
    headers
}
