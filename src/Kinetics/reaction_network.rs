//! Reaction configuration: net-rate (`dcdt`) expressions per species, named rate laws
//! and named coefficients.
//!
//! Entries are validated when they are set (identifier names, expression syntax,
//! finite coefficients, no name shared between rate laws and coefficients). Whether
//! the identifiers used inside the expressions exist is only known once the species
//! are fixed, so that check happens when a [`KineticSystem`](super::kinetic_system::KineticSystem)
//! is compiled.
use super::rate_expressions::{KineticsError, check_syntax};
use crate::Domain::species::is_identifier;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// dcdt of a species without an explicit entry
pub const NO_REACTION: &str = "0";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionNetwork {
    #[serde(default)]
    dcdt: BTreeMap<String, String>,
    #[serde(default)]
    rates: BTreeMap<String, String>,
    #[serde(default)]
    coefficients: BTreeMap<String, f64>,
}

impl ReactionNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network from plain maps, validating every entry.
    pub fn from_maps(
        dcdt: &HashMap<String, String>,
        rates: &HashMap<String, String>,
        coefficients: &HashMap<String, f64>,
    ) -> Result<Self, KineticsError> {
        let mut network = Self::new();
        network.set_coefficients(coefficients)?;
        network.set_rates(rates)?;
        network.set_dcdt_map(dcdt)?;
        Ok(network)
    }

    pub fn set_dcdt(&mut self, species: &str, expression: &str) -> Result<(), KineticsError> {
        validate_name(species)?;
        check_syntax(expression)?;
        self.dcdt
            .insert(species.to_string(), expression.trim().to_string());
        Ok(())
    }

    pub fn add_rate(&mut self, name: &str, expression: &str) -> Result<(), KineticsError> {
        validate_name(name)?;
        if self.coefficients.contains_key(name) {
            return Err(KineticsError::AmbiguousName(name.to_string()));
        }
        check_syntax(expression)?;
        self.rates
            .insert(name.to_string(), expression.trim().to_string());
        Ok(())
    }

    pub fn set_coefficient(&mut self, name: &str, value: f64) -> Result<(), KineticsError> {
        validate_name(name)?;
        if self.rates.contains_key(name) {
            return Err(KineticsError::AmbiguousName(name.to_string()));
        }
        if !value.is_finite() {
            return Err(KineticsError::InvalidCoefficient {
                name: name.to_string(),
                value,
            });
        }
        self.coefficients.insert(name.to_string(), value);
        Ok(())
    }

    /// Replace all `dcdt` entries. On error the previous entries are kept.
    pub fn set_dcdt_map(&mut self, dcdt: &HashMap<String, String>) -> Result<(), KineticsError> {
        let mut staged = self.clone();
        staged.dcdt.clear();
        for (species, expression) in dcdt {
            staged.set_dcdt(species, expression)?;
        }
        self.dcdt = staged.dcdt;
        Ok(())
    }

    /// Replace all rate laws. On error the previous entries are kept.
    pub fn set_rates(&mut self, rates: &HashMap<String, String>) -> Result<(), KineticsError> {
        let mut staged = self.clone();
        staged.rates.clear();
        for (name, expression) in rates {
            staged.add_rate(name, expression)?;
        }
        self.rates = staged.rates;
        Ok(())
    }

    /// Replace all coefficients. On error the previous entries are kept.
    pub fn set_coefficients(
        &mut self,
        coefficients: &HashMap<String, f64>,
    ) -> Result<(), KineticsError> {
        let mut staged = self.clone();
        staged.coefficients.clear();
        for (name, value) in coefficients {
            staged.set_coefficient(name, *value)?;
        }
        self.coefficients = staged.coefficients;
        Ok(())
    }

    /// `dcdt` expression of a species, `"0"` when none was set
    pub fn dcdt(&self, species: &str) -> &str {
        self.dcdt
            .get(species)
            .map(|s| s.as_str())
            .unwrap_or(NO_REACTION)
    }

    pub fn dcdt_map(&self) -> &BTreeMap<String, String> {
        &self.dcdt
    }

    pub fn rates(&self) -> &BTreeMap<String, String> {
        &self.rates
    }

    pub fn coefficients(&self) -> &BTreeMap<String, f64> {
        &self.coefficients
    }

    pub fn rate_names(&self) -> Vec<String> {
        self.rates.keys().cloned().collect()
    }

    /// Re-run the per-entry checks, used after deserialization.
    pub fn validate(&self) -> Result<(), KineticsError> {
        let mut fresh = Self::new();
        for (name, value) in &self.coefficients {
            fresh.set_coefficient(name, *value)?;
        }
        for (name, expression) in &self.rates {
            fresh.add_rate(name, expression)?;
        }
        for (species, expression) in &self.dcdt {
            fresh.set_dcdt(species, expression)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), KineticsError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(KineticsError::InvalidName(name.to_string()))
    }
}
