//! # Species and species registry
//!
//! A [`Species`] owns its concentration field: a `num_nodes × num_steps` matrix whose
//! column 0 is the initial condition and whose row 0 is the inlet boundary value for
//! every time level. Only the simulation writes into the matrix (crate-private
//! accessor); everybody else gets read-only views.
//!
//! [`SpeciesRegistry`] keeps the species in declaration order and refuses duplicate
//! or malformed names.
use super::conditions::{ConditionInput, ConditionKind};
use super::grid::{ConfigError, Grid};
use nalgebra::{DMatrix, DVector, DVectorView};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

/// `[A-Za-z_][A-Za-z0-9_]*`: names must be usable inside rate expressions
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

#[derive(Debug, Clone)]
pub struct Species {
    name: String,
    /// diffusion coefficient D
    diffusion_coefficient: f64,
    initial_condition: DVector<f64>,
    boundary_condition: DVector<f64>,
    concentration: DMatrix<f64>,
}

impl Species {
    pub fn new(
        grid: &Grid,
        name: &str,
        diffusion_coefficient: f64,
        initial_condition: ConditionInput,
        boundary_condition: ConditionInput,
    ) -> Result<Self, ConfigError> {
        if !is_identifier(name) {
            return Err(ConfigError::InvalidName(name.to_string()));
        }
        if !(diffusion_coefficient >= 0.0 && diffusion_coefficient.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "diffusion_coefficient",
                value: diffusion_coefficient,
                reason: "must be non-negative and finite",
            });
        }
        let n = grid.num_nodes();
        let m = grid.num_steps();
        let initial = initial_condition.resolve(name, ConditionKind::Initial, n)?;
        let boundary = boundary_condition.resolve(name, ConditionKind::Boundary, m)?;

        let mut concentration = DMatrix::zeros(n, m);
        concentration.set_column(0, &initial);
        // the inlet keeps the boundary value at every time level, (0, 0) included
        concentration.set_row(0, &boundary.transpose());

        Ok(Self {
            name: name.to_string(),
            diffusion_coefficient,
            initial_condition: initial,
            boundary_condition: boundary,
            concentration,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn diffusion_coefficient(&self) -> f64 {
        self.diffusion_coefficient
    }
    pub fn initial_condition(&self) -> &DVector<f64> {
        &self.initial_condition
    }
    pub fn boundary_condition(&self) -> &DVector<f64> {
        &self.boundary_condition
    }

    /// rows = nodes from inlet to outlet, columns = time levels
    pub fn concentration(&self) -> &DMatrix<f64> {
        &self.concentration
    }

    /// profile at time level `k`
    pub fn profile(&self, k: usize) -> DVectorView<'_, f64> {
        self.concentration.column(k)
    }

    /// profile at the last time level
    pub fn final_profile(&self) -> DVectorView<'_, f64> {
        self.concentration.column(self.concentration.ncols() - 1)
    }

    pub(crate) fn concentration_mut(&mut self) -> &mut DMatrix<f64> {
        &mut self.concentration
    }
}

/// Declared species in declaration order, addressable by name.
#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    species: Vec<Species>,
    index: HashMap<String, usize>,
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, species: Species) -> Result<&Species, ConfigError> {
        if self.index.contains_key(species.name()) {
            return Err(ConfigError::DuplicateName(species.name().to_string()));
        }
        let position = self.species.len();
        self.index.insert(species.name().to_string(), position);
        self.species.push(species);
        Ok(&self.species[position])
    }

    pub fn get(&self, name: &str) -> Option<&Species> {
        self.index.get(name).map(|&i| &self.species[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.species.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Species> {
        self.species.iter()
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Species] {
        &mut self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
