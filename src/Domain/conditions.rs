//! Expansion of user supplied initial and boundary conditions.
//!
//! A condition is either a scalar, broadcast over the whole target, or a profile
//! that must already have the target length: `num_nodes` for an initial
//! condition, `num_steps` for a boundary condition.
use super::grid::ConfigError;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionInput {
    Scalar(f64),
    Profile(Vec<f64>),
}

impl From<f64> for ConditionInput {
    fn from(value: f64) -> Self {
        ConditionInput::Scalar(value)
    }
}

impl From<Vec<f64>> for ConditionInput {
    fn from(values: Vec<f64>) -> Self {
        ConditionInput::Profile(values)
    }
}

impl From<&[f64]> for ConditionInput {
    fn from(values: &[f64]) -> Self {
        ConditionInput::Profile(values.to_vec())
    }
}

impl From<DVector<f64>> for ConditionInput {
    fn from(values: DVector<f64>) -> Self {
        ConditionInput::Profile(values.iter().cloned().collect())
    }
}

/// Which condition is being resolved, used for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Initial,
    Boundary,
}

impl ConditionKind {
    fn label(&self) -> &'static str {
        match self {
            ConditionKind::Initial => "initial condition",
            ConditionKind::Boundary => "boundary condition",
        }
    }
}

impl ConditionInput {
    /// Expand into exactly `target_len` values.
    pub fn resolve(
        &self,
        species: &str,
        kind: ConditionKind,
        target_len: usize,
    ) -> Result<DVector<f64>, ConfigError> {
        let resolved = match self {
            ConditionInput::Scalar(value) => DVector::from_element(target_len, *value),
            ConditionInput::Profile(values) => {
                if values.len() != target_len {
                    return Err(ConfigError::LengthMismatch {
                        species: species.to_string(),
                        what: kind.label(),
                        expected: target_len,
                        found: values.len(),
                    });
                }
                DVector::from_column_slice(values)
            }
        };
        if resolved.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteValue {
                species: species.to_string(),
                what: kind.label(),
            });
        }
        Ok(resolved)
    }
}
