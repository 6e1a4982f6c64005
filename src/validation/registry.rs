//! Validator Registry
//!
//! Simple in-memory registry mapping rule names to predicates. Built-in
//! predicates always win resolution; caller-supplied ones only take
//! effect for names no built-in claims.

use std::collections::HashMap;

use regex::Regex;

/// A named validation predicate over a field's raw value.
pub type Predicate = Box<dyn Fn(&str) -> bool>;

/// Registry of built-in and caller-supplied validators.
pub struct ValidatorRegistry {
    builtin: HashMap<&'static str, Predicate>,
    custom: HashMap<String, Predicate>,
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorRegistry {
    /// Create a registry holding only the built-in predicate set.
    ///
    /// The `number` and `decimal` patterns accept a single digit (and
    /// digit-dot-digit) only; see DESIGN.md for why this stays as-is.
    pub fn new() -> Self {
        let mut builtin: HashMap<&'static str, Predicate> = HashMap::new();
        builtin.insert("not-empty", Box::new(|val: &str| !val.is_empty()));
        builtin.insert("number", pattern_predicate("number", r"^[0-9]$"));
        builtin.insert("decimal", pattern_predicate("decimal", r"^[0-9]\.[0-9]$"));
        builtin.insert("text", Box::new(|_: &str| true));
        builtin.insert(
            "phone",
            pattern_predicate(
                "phone",
                r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$",
            ),
        );
        builtin.insert("email", pattern_predicate("email", r"^[^@]+@.+\..+$"));
        Self {
            builtin,
            custom: HashMap::new(),
        }
    }

    /// Register a caller-supplied predicate. Built-in names cannot be
    /// shadowed; the registration is kept but never resolved for them.
    pub fn register(&mut self, name: impl Into<String>, predicate: Predicate) {
        let name = name.into();
        if self.builtin.contains_key(name.as_str()) {
            log::warn!("validator `{name}` shadows a built-in and will not resolve");
        }
        self.custom.insert(name, predicate);
    }

    /// Resolve a rule name, built-in first, then caller-supplied.
    pub fn resolve(&self, name: &str) -> Option<&dyn Fn(&str) -> bool> {
        self.builtin
            .get(name)
            .or_else(|| self.custom.get(name))
            .map(|p| p.as_ref())
    }

    pub fn builtin_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.builtin.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("builtin", &self.builtin.len())
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Compile a built-in pattern into a predicate.
fn pattern_predicate(name: &'static str, pattern: &str) -> Predicate {
    match Regex::new(pattern) {
        Ok(re) => Box::new(move |val: &str| re.is_match(val)),
        Err(e) => {
            log::warn!("failed to compile built-in `{name}` pattern: {e}");
            Box::new(|_: &str| false)
        }
    }
}
