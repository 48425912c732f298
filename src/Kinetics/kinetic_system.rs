//! # Kinetic system
//!
//! Compiled form of a [`ReactionNetwork`] for a fixed, ordered list of species.
//! Evaluation is two-phase:
//! 1. every rate law from species concentrations and coefficients;
//! 2. every `dcdt` from species, coefficients and the rate values of phase 1.
//!
//! A rate law cannot see other rate laws: phase 1 binds against a table without them,
//! so such a reference is reported as an unresolved name.
use super::rate_expressions::{CompiledExpression, KineticsError, Slot, SymbolTable};
use super::reaction_network::{NO_REACTION, ReactionNetwork};

/// Rate-law values and species derivatives at one state
#[derive(Debug, Clone, PartialEq)]
pub struct RateEvaluation {
    /// ordered as [`KineticSystem::rate_names`]
    pub rates: Vec<f64>,
    /// ordered as [`KineticSystem::species`]
    pub derivative: Vec<f64>,
}

#[derive(Debug)]
pub struct KineticSystem {
    species: Vec<String>,
    rate_names: Vec<String>,
    rates: Vec<CompiledExpression>,
    /// `None` stands for a species without reaction
    dcdt: Vec<Option<CompiledExpression>>,
}

impl KineticSystem {
    pub fn compile(species: &[String], network: &ReactionNetwork) -> Result<Self, KineticsError> {
        for key in network.dcdt_map().keys() {
            if !species.iter().any(|s| s == key) {
                return Err(KineticsError::UnknownSpecies(key.clone()));
            }
        }

        let mut table = SymbolTable::new();
        for (i, name) in species.iter().enumerate() {
            table.insert(name, Slot::State(i))?;
        }
        for (name, value) in network.coefficients() {
            table.insert(name, Slot::Constant(*value))?;
        }

        let rate_names = network.rate_names();
        let mut rates = Vec::with_capacity(rate_names.len());
        for (name, expression) in network.rates() {
            let context = format!("rate law '{}'", name);
            rates.push(CompiledExpression::compile(expression, &table, &context)?);
        }

        for (j, name) in rate_names.iter().enumerate() {
            table.insert(name, Slot::Rate(j))?;
        }
        let mut dcdt = Vec::with_capacity(species.len());
        for name in species {
            let expression = network.dcdt(name);
            if expression == NO_REACTION {
                dcdt.push(None);
                continue;
            }
            let context = format!("dcdt of '{}'", name);
            dcdt.push(Some(CompiledExpression::compile(
                expression, &table, &context,
            )?));
        }

        Ok(Self {
            species: species.to_vec(),
            rate_names,
            rates,
            dcdt,
        })
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn rate_names(&self) -> &[String] {
        &self.rate_names
    }

    pub fn dim(&self) -> usize {
        self.species.len()
    }

    /// true when no species has a reaction term: the reaction step is the identity
    pub fn is_inert(&self) -> bool {
        self.dcdt.iter().all(|d| d.is_none())
    }

    /// Rate laws first, then derivatives. `state` is ordered as [`Self::species`].
    pub fn evaluate(&self, state: &[f64]) -> RateEvaluation {
        let rates: Vec<f64> = self.rates.iter().map(|r| r.eval(state, &[])).collect();
        let derivative = self
            .dcdt
            .iter()
            .map(|d| match d {
                Some(expression) => expression.eval(state, &rates),
                None => 0.0,
            })
            .collect();
        RateEvaluation { rates, derivative }
    }
}
