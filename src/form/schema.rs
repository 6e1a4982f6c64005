//! Form Definition Schema
//!
//! Serde types matching the TOML form-definition file. These are the
//! on-disk shapes; conversion into the runtime model lives in
//! [`crate::form::field`].

use serde::Deserialize;

/// Root form definition file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FormFile {
    pub form: FormMeta,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Form metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FormMeta {
    pub name: String,
    /// Destination address submissions post to
    pub action: Option<String>,
    pub description: Option<String>,
}

/// A single field declaration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FieldDef {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: FieldKindDef,
    #[serde(default)]
    pub value: String,
    /// Selected options for multi-selects
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Rule names to apply; empty means the field does not validate
    #[serde(default)]
    pub rules: Vec<String>,
    pub depends_on: Option<DependencyDef>,
    /// Per-field trigger behavior overriding the configured list
    pub behavior: Option<String>,
}

fn default_enabled() -> bool {
    true
}

/// Field kinds as written in definitions
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKindDef {
    #[default]
    Text,
    Hidden,
    Checkbox,
    Radio,
    Select,
    SelectMultiple,
    File,
    Button,
    Submit,
    Reset,
}

/// A dependency declaration on another field.
///
/// `checked = true` requires the controller to be enabled and checked;
/// `equals` requires the controller's value to match; neither requires
/// only that the controller be enabled.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DependencyDef {
    pub field: String,
    pub equals: Option<String>,
    #[serde(default)]
    pub checked: bool,
}
