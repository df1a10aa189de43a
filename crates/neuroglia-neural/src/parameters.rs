// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named parameter sets with defaults and merging
//!
//! Cell parameters travel through the API as name/value pairs so that the
//! same vocabulary works for every cell type. A [`ParameterSet`] is a small
//! ordered map; scalar values cover the common case and list values carry
//! things like explicit spike times.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, Result};

/// A single parameter value: a scalar or a list of scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Scalar(f64),
    List(Vec<f64>),
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Scalar(value)
    }
}

impl From<Vec<f64>> for ParameterValue {
    fn from(values: Vec<f64>) -> Self {
        ParameterValue::List(values)
    }
}

impl From<&[f64]> for ParameterValue {
    fn from(values: &[f64]) -> Self {
        ParameterValue::List(values.to_vec())
    }
}

/// Ordered name -> value parameter map
///
/// Iteration order is the lexical name order, which keeps error messages and
/// serialized forms deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, ParameterValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, used heavily for default parameter tables.
    pub fn with(mut self, name: &str, value: impl Into<ParameterValue>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<ParameterValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fetch a scalar parameter. The name must be present; the defaults table
    /// guarantees that for translated sets.
    pub fn scalar(&self, name: &str) -> Result<f64> {
        match self.values.get(name) {
            Some(ParameterValue::Scalar(v)) => Ok(*v),
            Some(ParameterValue::List(_)) => Err(ParameterError::ExpectedScalar {
                name: name.to_string(),
            }),
            None => Err(ParameterError::ExpectedScalar {
                name: name.to_string(),
            }),
        }
    }

    /// Fetch a list parameter.
    pub fn list(&self, name: &str) -> Result<&[f64]> {
        match self.values.get(name) {
            Some(ParameterValue::List(v)) => Ok(v.as_slice()),
            Some(ParameterValue::Scalar(_)) => Err(ParameterError::ExpectedList {
                name: name.to_string(),
            }),
            None => Err(ParameterError::ExpectedList {
                name: name.to_string(),
            }),
        }
    }

    /// Merge caller overrides onto a defaults table.
    ///
    /// Every override name must exist in the defaults; an unknown name is a
    /// hard error naming the offending cell type.
    pub fn merged_with(
        defaults: &ParameterSet,
        overrides: Option<&ParameterSet>,
        cell_type: &'static str,
    ) -> Result<ParameterSet> {
        let mut merged = defaults.clone();
        if let Some(overrides) = overrides {
            for (name, value) in overrides.iter() {
                if !merged.contains(name) {
                    return Err(ParameterError::UnknownParameter {
                        cell_type,
                        name: name.to_string(),
                    });
                }
                merged.set(name, value.clone());
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_and_list_access() {
        let params = ParameterSet::new()
            .with("tau_m", 20.0)
            .with("spike_times", vec![1.0, 2.0, 3.0]);

        assert_eq!(params.scalar("tau_m").unwrap(), 20.0);
        assert_eq!(params.list("spike_times").unwrap(), &[1.0, 2.0, 3.0]);
        assert!(params.scalar("spike_times").is_err());
        assert!(params.list("tau_m").is_err());
    }

    #[test]
    fn test_merge_applies_overrides() {
        let defaults = ParameterSet::new().with("tau_m", 20.0).with("cm", 1.0);
        let overrides = ParameterSet::new().with("tau_m", 10.0);

        let merged = ParameterSet::merged_with(&defaults, Some(&overrides), "test").unwrap();
        assert_eq!(merged.scalar("tau_m").unwrap(), 10.0);
        assert_eq!(merged.scalar("cm").unwrap(), 1.0);
    }

    #[test]
    fn test_merge_rejects_unknown_name() {
        let defaults = ParameterSet::new().with("tau_m", 20.0);
        let overrides = ParameterSet::new().with("tau_x", 1.0);

        let err = ParameterSet::merged_with(&defaults, Some(&overrides), "test").unwrap_err();
        assert!(matches!(err, ParameterError::UnknownParameter { .. }));
    }

    #[test]
    fn test_json_untagged_values() {
        let params = ParameterSet::new()
            .with("tau_m", 20.0)
            .with("spike_times", vec![1.0, 2.5]);

        // Untagged representation: scalars as numbers, lists as arrays.
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"spike_times":[1.0,2.5],"tau_m":20.0}"#);

        let parsed: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, params);
    }
}
