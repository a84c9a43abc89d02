//! # Noise Library
//!
//! A named collection of noise field configurations. Modifier slots refer
//! to other fields by name, so the library is the unit that gets loaded,
//! validated and sampled.
//!
//! ## Validation
//!
//! 1. Every field's base parameters are in range
//! 2. Every modifier reference names a field in the library
//! 3. The modifier reference graph is acyclic (DFS with a recursion stack)
//!
//! Sampling a field obtained through [`NoiseLibrary::field`] can therefore
//! never recurse forever.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{FractalParameter, ModifierOp, NoiseFieldConfig};
use crate::error::{NoiseError, NoiseResult};
use crate::field::NoiseField;

/// Named noise field configurations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLibrary {
    /// All fields indexed by name.
    fields: BTreeMap<String, NoiseFieldConfig>,
}

impl NoiseLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field, returning the previous config if any.
    ///
    /// No validation happens here; references may point at fields that
    /// are added later.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        config: NoiseFieldConfig,
    ) -> Option<NoiseFieldConfig> {
        self.fields.insert(name.into(), config)
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, config: NoiseFieldConfig) -> Self {
        self.insert(name, config);
        self
    }

    /// Gets a field config by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NoiseFieldConfig> {
        self.fields.get(name)
    }

    /// Returns true if the library has a field named `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns all field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the library has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates every field in the library.
    ///
    /// # Errors
    ///
    /// Returns the first parameter, reference or cycle error found.
    pub fn validate(&self) -> NoiseResult<()> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();

        for name in self.fields.keys() {
            if !visited.contains(name.as_str()) {
                self.visit(name, &mut visited, &mut path)?;
            }
        }

        tracing::debug!("noise library validated: {} fields", self.fields.len());
        Ok(())
    }

    /// Returns a sampling handle for `name`.
    ///
    /// Only the part of the graph reachable from `name` is validated, so
    /// unrelated broken fields do not block sampling.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::UnknownField`] if `name` is missing, or any
    /// validation error in the reachable sub-graph.
    pub fn field(&self, name: &str) -> NoiseResult<NoiseField<'_>> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        self.visit(name, &mut visited, &mut path)?;

        tracing::debug!(
            "noise field '{}' validated ({} reachable fields)",
            name,
            visited.len()
        );
        self.field_unchecked(name)
    }

    /// Returns a sampling handle without validating.
    pub(crate) fn field_unchecked(&self, name: &str) -> NoiseResult<NoiseField<'_>> {
        let (name, config) = self
            .fields
            .get_key_value(name)
            .ok_or_else(|| NoiseError::UnknownField(name.to_owned()))?;
        Ok(NoiseField::new(self, name, config))
    }

    /// DFS helper for validation and cycle detection.
    ///
    /// `path` is the current recursion stack; meeting a field that is
    /// already on it closes a cycle.
    fn visit<'a>(
        &'a self,
        name: &str,
        visited: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
    ) -> NoiseResult<()> {
        let (name, config) = self
            .fields
            .get_key_value(name)
            .ok_or_else(|| NoiseError::UnknownField(name.to_owned()))?;
        let name = name.as_str();

        config.validate(name)?;
        visited.insert(name);
        path.push(name);

        for (parameter, target) in config.modifiers.references() {
            if !self.fields.contains_key(target) {
                return Err(NoiseError::UnknownModifierTarget {
                    field: name.to_owned(),
                    parameter,
                    target: target.to_owned(),
                });
            }

            if let Some(start) = path.iter().position(|&on_path| on_path == target) {
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|&n| n.to_owned()).collect();
                cycle.push(target.to_owned());
                return Err(NoiseError::CycleDetected(cycle));
            }

            if parameter == FractalParameter::Octaves
                && config.modifiers.octaves.op == ModifierOp::Divide
            {
                tracing::warn!(
                    "field '{}' divides octaves by '{}'; values in (-1, 1) truncate to zero and fail",
                    name,
                    target
                );
            }

            if !visited.contains(target) {
                self.visit(target, visited, path)?;
            }
        }

        path.pop();
        Ok(())
    }
}
