//! Runtime field model.
//!
//! Optimized for the engine's access patterns: ordered iteration for
//! declaration-order tie-breaks, key lookup for controller resolution,
//! and a live "who depends on me" query for cascades.

use std::collections::HashMap;

use anyhow::{Result, bail};

use super::schema::{FieldDef, FieldKindDef, FormFile};

/// What kind of input a field is. Determines serialization behavior and
/// the submit-trigger partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
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

impl From<FieldKindDef> for FieldKind {
    fn from(def: FieldKindDef) -> Self {
        match def {
            FieldKindDef::Text => FieldKind::Text,
            FieldKindDef::Hidden => FieldKind::Hidden,
            FieldKindDef::Checkbox => FieldKind::Checkbox,
            FieldKindDef::Radio => FieldKind::Radio,
            FieldKindDef::Select => FieldKind::Select,
            FieldKindDef::SelectMultiple => FieldKind::SelectMultiple,
            FieldKindDef::File => FieldKind::File,
            FieldKindDef::Button => FieldKind::Button,
            FieldKindDef::Submit => FieldKind::Submit,
            FieldKindDef::Reset => FieldKind::Reset,
        }
    }
}

/// A field's declared dependency on another field's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// Always applicable
    None,
    /// Applicable while the controller is enabled and checked
    OnChecked { controller: String },
    /// Applicable while the controller is enabled and its value matches
    OnValue { controller: String, equals: String },
    /// Applicable while the controller is enabled
    OnEnabled { controller: String },
}

impl Dependency {
    /// The id of the controlling field, if any.
    pub fn controller(&self) -> Option<&str> {
        match self {
            Dependency::None => None,
            Dependency::OnChecked { controller }
            | Dependency::OnValue { controller, .. }
            | Dependency::OnEnabled { controller } => Some(controller),
        }
    }
}

/// One validatable unit of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: Option<String>,
    pub name: Option<String>,
    pub kind: FieldKind,
    /// Current raw value, mutated externally by user input
    pub value: String,
    /// Selected options for multi-selects
    pub selected: Vec<String>,
    pub checked: bool,
    /// Toggled only by the submission gate while a submit is in flight
    pub enabled: bool,
    /// Rule names applied in order; empty means the field does not validate
    pub rules: Vec<String>,
    pub dependency: Dependency,
    /// Per-field trigger behavior overriding the configured list
    pub behavior: Option<String>,
    /// Presentation markers, mutated only through a presenter
    pub classes: Vec<String>,
}

impl Field {
    /// Resolved key: id, falling back to name.
    pub fn key(&self) -> &str {
        self.id
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Key used when serializing values: name, falling back to id.
    pub fn serialize_key(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }

    /// Whether this field belongs to the validating subset.
    pub fn validates(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Whether activating this field triggers a submission.
    pub fn is_submit_trigger(&self) -> bool {
        self.kind == FieldKind::Submit
    }
}

impl TryFrom<FieldDef> for Field {
    type Error = anyhow::Error;

    fn try_from(def: FieldDef) -> Result<Self> {
        if def.id.is_none() && def.name.is_none() {
            bail!("field declared without id or name");
        }
        let dependency = match def.depends_on {
            None => Dependency::None,
            Some(dep) if dep.checked => Dependency::OnChecked {
                controller: dep.field,
            },
            Some(dep) => match dep.equals {
                Some(equals) => Dependency::OnValue {
                    controller: dep.field,
                    equals,
                },
                None => Dependency::OnEnabled {
                    controller: dep.field,
                },
            },
        };
        Ok(Field {
            id: def.id,
            name: def.name,
            kind: def.kind.into(),
            value: def.value,
            selected: def.selected,
            checked: def.checked,
            enabled: def.enabled,
            rules: def.rules,
            dependency,
            behavior: def.behavior,
            classes: Vec::new(),
        })
    }
}

/// The full set of fields known to the engine, in declaration order.
#[derive(Debug, Clone)]
pub struct Form {
    pub name: String,
    /// Destination address submissions post to
    pub action: Option<String>,
    fields: Vec<Field>,
    by_key: HashMap<String, usize>,
}

impl Form {
    /// Build a form from explicit fields, checking key uniqueness.
    pub fn new(name: String, action: Option<String>, fields: Vec<Field>) -> Result<Self> {
        let mut by_key = HashMap::new();
        for (idx, field) in fields.iter().enumerate() {
            let key = field.key();
            if key.is_empty() {
                bail!("field at position {idx} has no id or name");
            }
            if by_key.insert(key.to_string(), idx).is_some() {
                bail!("duplicate field key `{key}`");
            }
        }
        Ok(Form {
            name,
            action,
            fields,
            by_key,
        })
    }

    pub fn from_file(file: FormFile) -> Result<Self> {
        let fields = file
            .fields
            .into_iter()
            .map(Field::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(file.form.name, file.form.action, fields)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.by_key.get(key).map(|&idx| &self.fields[idx])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.by_key.get(key).map(|&idx| &mut self.fields[idx])
    }

    pub(crate) fn index_of(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    pub(crate) fn field_at(&self, idx: usize) -> &Field {
        &self.fields[idx]
    }

    pub(crate) fn field_at_mut(&mut self, idx: usize) -> &mut Field {
        &mut self.fields[idx]
    }

    /// Look up a controlling field by its declared id.
    pub fn controller(&self, id: &str) -> Option<&Field> {
        self.get(id)
            .filter(|f| f.id.as_deref() == Some(id))
    }

    /// Live query: indices of fields whose dependency points at `id`,
    /// in declaration order.
    pub(crate) fn dependents_of(&self, id: &str) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.dependency.controller() == Some(id))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Fields that carry validation rules.
    pub fn validating_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.validates())
    }

    /// Fields whose activation triggers a submission.
    pub fn submit_triggers(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_submit_trigger())
    }

    /// Fields with a per-field trigger behavior override.
    pub fn special_behavior_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.behavior.is_some())
    }

    /// Set every field's enabled flag. Only the submission gate calls this.
    pub(crate) fn set_all_enabled(&mut self, enabled: bool) {
        for field in &mut self.fields {
            field.enabled = enabled;
        }
    }
}
