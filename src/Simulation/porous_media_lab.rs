//! # Porous media lab
//!
//! The simulation orchestrator. It owns the grid, the species (and through them the
//! concentration matrices), the reaction network and the solver settings, and drives the
//! outer time loop by operator splitting:
//!
//! 1. transport every species from time level `k-1` to `k` with the step-`k` inlet value;
//! 2. integrate the reactions on the transported state, node by node (the inlet node keeps
//!    its Dirichlet value and is not reacted);
//! 3. store the reacted state in column `k`.
//!
//! With the adaptive integrator and `adaptive_substeps` on, step 2 is subdivided into
//! reaction sub-steps following the integrator's recommendation; the recommendation
//! carries over from one outer step to the next and never exceeds `dt`.
//!
//! ## Example
//! ```
//! use PoroLab::Simulation::porous_media_lab::PorousMediaLab;
//! use PoroLab::Integrators::ode_api::SolverType;
//! let mut lab = PorousMediaLab::new(1.0, 0.1, 0.1, 0.01, 1.0, 0.2).unwrap();
//! lab.add_solute_species("O2", 40.0, 12.32, 0.2).unwrap();
//! lab.set_coefficient("k", 0.5).unwrap();
//! lab.add_rate("R", "k*O2").unwrap();
//! lab.set_dcdt("O2", "-R").unwrap();
//! lab.solve(SolverType::Butcher5).unwrap();
//! let o2 = lab.species("O2").unwrap();
//! assert!(o2.concentration().row(0).iter().all(|&c| c == 0.2));
//! ```
use crate::Domain::conditions::ConditionInput;
use crate::Domain::grid::{ConfigError, Grid};
use crate::Domain::species::{Species, SpeciesRegistry};
use crate::Integrators::ode_api::{
    IntegratorError, SolverType, SubstepControl, SubstepOutcome, Tolerances, integrate_over,
    single_step,
};
use crate::Kinetics::kinetic_system::KineticSystem;
use crate::Kinetics::rate_expressions::KineticsError;
use crate::Kinetics::reaction_network::ReactionNetwork;
use crate::Transport::transport_solver::{TransportError, TransportScheme, TransportSolver};
use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/////////////////////ERROR HANDLING////////////////////////////////////////////////////////
#[derive(Debug, Error)]
pub enum LabError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Kinetics(#[from] KineticsError),
    #[error("transport of '{species}' failed at time step {step}: {source}")]
    Transport {
        species: String,
        step: usize,
        #[source]
        source: TransportError,
    },
    #[error("reaction integration failed at time step {step}, node {node}: {source}")]
    Reaction {
        step: usize,
        node: usize,
        #[source]
        source: IntegratorError,
    },
    #[error("no species declared")]
    NoSpecies,
    #[error("cannot read task file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse task: {0}")]
    Parse(#[from] serde_json::Error),
}
////////////////////////////////////////////////////////////////////////////////////////////

/// Numerical settings of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub transport: TransportScheme,
    pub tolerances: Tolerances,
    pub substeps: SubstepControl,
    /// subdivide the reaction step when the integrator is adaptive
    pub adaptive_substeps: bool,
    /// set negative concentrations produced by the reaction step to zero
    pub clamp_negative: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            transport: TransportScheme::default(),
            tolerances: Tolerances::default(),
            substeps: SubstepControl::default(),
            adaptive_substeps: true,
            clamp_negative: true,
        }
    }
}

/// Counters of the last `solve`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolveStatistics {
    pub time_steps: usize,
    pub reaction_substeps: usize,
    pub rejected_substeps: usize,
    pub clamped_values: usize,
    /// reaction sub-step size recommended at the end of the run
    pub last_reaction_dt: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PorousMediaLab {
    grid: Grid,
    species: SpeciesRegistry,
    reactions: ReactionNetwork,
    pub settings: SolverSettings,
    /// rate-law values, `num_nodes × num_steps` per rate law
    estimated_rates: BTreeMap<String, DMatrix<f64>>,
    statistics: SolveStatistics,
}

impl PorousMediaLab {
    /// * `length`, `dx` - column length and node spacing
    /// * `duration`, `dt` - simulated time and time step
    /// * `phi` - porosity
    /// * `w` - advection velocity
    pub fn new(
        length: f64,
        dx: f64,
        duration: f64,
        dt: f64,
        phi: f64,
        w: f64,
    ) -> Result<Self, LabError> {
        let grid = Grid::new(length, dx, duration, dt, phi, w)?;
        Ok(Self::with_grid(grid))
    }

    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            species: SpeciesRegistry::new(),
            reactions: ReactionNetwork::new(),
            settings: SolverSettings::default(),
            estimated_rates: BTreeMap::new(),
            statistics: SolveStatistics::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Declare a dissolved species. Scalars are broadcast, profiles must have
    /// `num_nodes` (initial) or `num_steps` (boundary) values.
    pub fn add_solute_species(
        &mut self,
        name: &str,
        diffusion_coefficient: f64,
        initial_condition: impl Into<ConditionInput>,
        boundary_condition: impl Into<ConditionInput>,
    ) -> Result<&Species, LabError> {
        let species = Species::new(
            &self.grid,
            name,
            diffusion_coefficient,
            initial_condition.into(),
            boundary_condition.into(),
        )?;
        info!(
            "species '{}' declared: D = {}, {} nodes x {} time levels",
            name,
            diffusion_coefficient,
            self.grid.num_nodes(),
            self.grid.num_steps()
        );
        Ok(self.species.add(species)?)
    }

    pub fn species(&self, name: &str) -> Option<&Species> {
        self.species.get(name)
    }

    pub fn species_registry(&self) -> &SpeciesRegistry {
        &self.species
    }

    pub fn reactions(&self) -> &ReactionNetwork {
        &self.reactions
    }

    pub fn reactions_mut(&mut self) -> &mut ReactionNetwork {
        &mut self.reactions
    }

    pub fn set_dcdt(&mut self, species: &str, expression: &str) -> Result<(), LabError> {
        Ok(self.reactions.set_dcdt(species, expression)?)
    }

    pub fn add_rate(&mut self, name: &str, expression: &str) -> Result<(), LabError> {
        Ok(self.reactions.add_rate(name, expression)?)
    }

    pub fn set_coefficient(&mut self, name: &str, value: f64) -> Result<(), LabError> {
        Ok(self.reactions.set_coefficient(name, value)?)
    }

    /// rate-law values at every node and time level of the last `solve`
    pub fn estimated_rates(&self, name: &str) -> Option<&DMatrix<f64>> {
        self.estimated_rates.get(name)
    }

    pub fn statistics(&self) -> &SolveStatistics {
        &self.statistics
    }

    /// Run the whole time horizon. Columns `1..` of every concentration matrix are
    /// recomputed; column 0 and row 0 are never touched.
    pub fn solve(&mut self, solver: SolverType) -> Result<(), LabError> {
        if self.species.is_empty() {
            return Err(LabError::NoSpecies);
        }
        let names = self.species.names();
        let system = KineticSystem::compile(&names, &self.reactions)?;
        let integrator = solver.integrator(self.settings.tolerances);

        let grid = &self.grid;
        let settings = self.settings;
        let transport = self
            .species
            .iter()
            .map(|s| {
                TransportSolver::new(grid, s.diffusion_coefficient(), settings.transport).map_err(
                    |source| LabError::Transport {
                        species: s.name().to_string(),
                        step: 0,
                        source,
                    },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let n = grid.num_nodes();
        let m = grid.num_steps();
        let dt = grid.dt();
        info!(
            "solving {} species on {} nodes x {} time levels with {:?}, transport {:?}",
            names.len(),
            n,
            m,
            solver,
            settings.transport
        );

        let mut estimated_rates: BTreeMap<String, DMatrix<f64>> = system
            .rate_names()
            .iter()
            .map(|r| (r.clone(), DMatrix::zeros(n, m)))
            .collect();
        let species = self.species.as_mut_slice();
        record_rates(&system, species, &mut estimated_rates, 0);

        let mut statistics = SolveStatistics::default();
        let mut reaction_dt = dt;
        for k in 1..m {
            for (s, column_solver) in species.iter_mut().zip(transport.iter()) {
                let previous: Vec<f64> = s.concentration().column(k - 1).iter().cloned().collect();
                let boundary_value = s.boundary_condition()[k];
                let next = column_solver.advance(&previous, boundary_value).map_err(|source| {
                    LabError::Transport {
                        species: s.name().to_string(),
                        step: k,
                        source,
                    }
                })?;
                s.concentration_mut().set_column(k, &DVector::from_vec(next));
            }

            if !system.is_inert() {
                let mut next_reaction_dt = dt;
                for i in 1..n {
                    let state: Vec<f64> = species.iter().map(|s| s.concentration()[(i, k)]).collect();
                    let result = if settings.adaptive_substeps {
                        integrate_over(
                            &integrator,
                            &system,
                            &state,
                            dt,
                            reaction_dt,
                            settings.substeps,
                        )
                    } else {
                        // one step of size dt, the error estimate is not acted upon
                        single_step(&integrator, &system, &state, dt).map(|o| SubstepOutcome {
                            state: o.state,
                            rates: o.rates,
                            substeps: 1,
                            rejections: 0,
                            next_dt: dt,
                        })
                    };
                    let outcome = result.map_err(|source| LabError::Reaction {
                        step: k,
                        node: i,
                        source,
                    })?;

                    statistics.reaction_substeps += outcome.substeps;
                    statistics.rejected_substeps += outcome.rejections;
                    next_reaction_dt = next_reaction_dt.min(outcome.next_dt);

                    for (s, &value) in species.iter_mut().zip(outcome.state.iter()) {
                        let value = if settings.clamp_negative && value < 0.0 {
                            statistics.clamped_values += 1;
                            0.0
                        } else {
                            value
                        };
                        s.concentration_mut()[(i, k)] = value;
                    }
                }
                reaction_dt = next_reaction_dt;
                statistics.last_reaction_dt = Some(reaction_dt);
            }
            record_rates(&system, species, &mut estimated_rates, k);
            statistics.time_steps += 1;
            debug!("time step {}/{} done, t = {}", k, m - 1, k as f64 * dt);
        }

        if statistics.clamped_values > 0 {
            warn!(
                "{} negative concentrations were set to zero after the reaction step",
                statistics.clamped_values
            );
        }
        info!(
            "solve finished: {} time steps, {} reaction sub-steps, {} rejected",
            statistics.time_steps, statistics.reaction_substeps, statistics.rejected_substeps
        );
        self.estimated_rates = estimated_rates;
        self.statistics = statistics;
        Ok(())
    }
}

/// rate-law values at every node of time level `k`, from the stored (reacted, clamped)
/// concentrations
fn record_rates(
    system: &KineticSystem,
    species: &[Species],
    estimated_rates: &mut BTreeMap<String, DMatrix<f64>>,
    k: usize,
) {
    if system.rate_names().is_empty() {
        return;
    }
    let num_nodes = species.first().map_or(0, |s| s.concentration().nrows());
    for i in 0..num_nodes {
        let state: Vec<f64> = species.iter().map(|s| s.concentration()[(i, k)]).collect();
        let evaluation = system.evaluate(&state);
        for (name, &rate) in system.rate_names().iter().zip(evaluation.rates.iter()) {
            if let Some(matrix) = estimated_rates.get_mut(name) {
                matrix[(i, k)] = rate;
            }
        }
    }
}
