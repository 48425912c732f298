//! Simulation task as a JSON document.
//!
//! ```json
//! {
//!   "grid": { "length": 1.0, "dx": 0.1, "duration": 0.1, "dt": 0.01, "phi": 1.0, "w": 0.2 },
//!   "species": [
//!     { "name": "O2", "D": 40.0, "init_C": 12.32, "bc": 0.2 }
//!   ],
//!   "rates": { "R": "k*O2" },
//!   "coefficients": { "k": 0.5 },
//!   "dcdt": { "O2": "-R" },
//!   "solver": "Butcher5",
//!   "settings": { "clamp_negative": true }
//! }
//! ```
//! Conditions are either numbers or arrays; `rates`, `coefficients`, `dcdt`,
//! `solver` and `settings` may be omitted.
use super::porous_media_lab::{LabError, PorousMediaLab, SolverSettings};
use crate::Domain::conditions::ConditionInput;
use crate::Domain::grid::{Grid, GridConfig};
use crate::Integrators::ode_api::SolverType;
use crate::Kinetics::reaction_network::ReactionNetwork;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    #[serde(alias = "D")]
    pub diffusion_coefficient: f64,
    #[serde(alias = "init_C", alias = "init_c")]
    pub initial_condition: ConditionInput,
    #[serde(alias = "bc")]
    pub boundary_condition: ConditionInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub species: Vec<SpeciesConfig>,
    #[serde(default)]
    pub rates: HashMap<String, String>,
    #[serde(default)]
    pub coefficients: HashMap<String, f64>,
    #[serde(default)]
    pub dcdt: HashMap<String, String>,
    #[serde(default)]
    pub solver: SolverType,
    #[serde(default)]
    pub settings: SolverSettings,
}

impl SimulationConfig {
    pub fn from_json_str(document: &str) -> Result<Self, LabError> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LabError> {
        let path = path.as_ref();
        let document = fs::read_to_string(path).map_err(|source| LabError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&document)?;
        info!(
            "task loaded from '{}': {} species, {} rate laws",
            path.display(),
            config.species.len(),
            config.rates.len()
        );
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, LabError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Declare the grid, the species and the reactions, without solving.
    pub fn build(&self) -> Result<PorousMediaLab, LabError> {
        let grid = Grid::from_config(&self.grid)?;
        let mut lab = PorousMediaLab::with_grid(grid);
        lab.settings = self.settings;
        for species in &self.species {
            lab.add_solute_species(
                &species.name,
                species.diffusion_coefficient,
                species.initial_condition.clone(),
                species.boundary_condition.clone(),
            )?;
        }
        *lab.reactions_mut() = ReactionNetwork::from_maps(&self.dcdt, &self.rates, &self.coefficients)?;
        Ok(lab)
    }

    /// Build and solve with the configured integrator.
    pub fn run(&self) -> Result<PorousMediaLab, LabError> {
        let mut lab = self.build()?;
        lab.solve(self.solver)?;
        Ok(lab)
    }
}
