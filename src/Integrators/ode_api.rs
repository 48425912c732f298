//! # ODE API
//!
//! Common interface of the reaction integrators and the entry points built on it:
//!
//! - [`ReactionStepper`]: one step of size `dt` on a [`KineticSystem`], dispatched over
//!   the [`Integrator`] enum.
//! - [`integrate_over`]: advances a state over a whole outer time step, subdividing it
//!   when the integrator is adaptive.
//! - [`ode_integrate`]: name-keyed entry point that compiles the kinetics from plain maps
//!   and takes a single step, usable without any simulation around it.
use super::butcher5::Butcher5;
use super::runge_kutta4::RungeKutta4;
use crate::Kinetics::kinetic_system::KineticSystem;
use crate::Kinetics::rate_expressions::KineticsError;
use crate::Kinetics::reaction_network::ReactionNetwork;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/////////////////////ERROR HANDLING////////////////////////////////////////////////////////
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegratorError {
    #[error(transparent)]
    Kinetics(#[from] KineticsError),
    #[error("non-finite concentration of '{species}' during reaction integration")]
    NonFinite { species: String },
    #[error("invalid step size {0}")]
    InvalidStep(f64),
    #[error("adaptive step rejected {rejections} times in a row, last step size {dt:e}")]
    StepRejected { dt: f64, rejections: usize },
    #[error("more than {0} reaction sub-steps needed within one time step")]
    TooManySubsteps(usize),
    #[error("unknown solver code {0}: 0 = Butcher5, 1 = RungeKutta4")]
    UnknownSolver(u8),
}
////////////////////////////////////////////////////////////////////////////////////////////

/// Error control of the adaptive integrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub absolute: f64,
    pub relative: f64,
    /// safety factor applied to the optimal step size
    pub safety: f64,
    /// smallest allowed ratio new_dt/dt
    pub min_factor: f64,
    /// largest allowed ratio new_dt/dt
    pub max_factor: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            absolute: 1e-8,
            relative: 1e-6,
            safety: 0.9,
            min_factor: 0.2,
            max_factor: 2.0,
        }
    }
}

/// Error estimate of an embedded step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// max |y5 - y4| over the species
    pub local_error: f64,
    /// local error scaled by `absolute + relative*|y|`, the step is accepted when <= 1
    pub error_norm: f64,
    pub accepted: bool,
    pub suggested_dt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub state: Vec<f64>,
    /// rate-law values of the last stage
    pub rates: Vec<f64>,
    /// `None` for fixed-step integrators
    pub report: Option<StepReport>,
}

#[enum_dispatch]
pub trait ReactionStepper {
    fn step(
        &self,
        system: &KineticSystem,
        state: &[f64],
        dt: f64,
    ) -> Result<StepOutcome, IntegratorError>;

    fn is_adaptive(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(ReactionStepper)]
pub enum Integrator {
    RungeKutta4(RungeKutta4),
    Butcher5(Butcher5),
}

/// Integrator choice as exposed to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverType {
    RungeKutta4,
    #[default]
    Butcher5,
}

impl SolverType {
    pub fn integrator(self, tolerances: Tolerances) -> Integrator {
        match self {
            SolverType::RungeKutta4 => Integrator::RungeKutta4(RungeKutta4),
            SolverType::Butcher5 => Integrator::Butcher5(Butcher5::new(tolerances)),
        }
    }
}

/// numeric selector: 0 is the embedded 5th order scheme, 1 the classical RK4
impl TryFrom<u8> for SolverType {
    type Error = IntegratorError;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(SolverType::Butcher5),
            1 => Ok(SolverType::RungeKutta4),
            other => Err(IntegratorError::UnknownSolver(other)),
        }
    }
}

/// Bounds of the shrink-and-retry loop in [`integrate_over`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstepControl {
    pub max_substeps: usize,
    /// consecutive rejections tolerated before giving up
    pub max_rejections: usize,
}

impl Default for SubstepControl {
    fn default() -> Self {
        Self {
            max_substeps: 10_000,
            max_rejections: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubstepOutcome {
    pub state: Vec<f64>,
    pub rates: Vec<f64>,
    pub substeps: usize,
    pub rejections: usize,
    /// step size to start the next outer step with
    pub next_dt: f64,
}

/// One step of size `dt` whatever the error estimate says. The new state has to be finite.
pub fn single_step(
    stepper: &Integrator,
    system: &KineticSystem,
    state: &[f64],
    dt: f64,
) -> Result<StepOutcome, IntegratorError> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(IntegratorError::InvalidStep(dt));
    }
    let outcome = stepper.step(system, state, dt)?;
    check_finite(system, &outcome.state)?;
    Ok(outcome)
}

/// Advance `state` over `dt`. Fixed-step integrators take exactly one step; adaptive ones
/// start from `initial_substep` and follow their own step-size recommendations, clipped so
/// that the sub-steps add up to `dt` exactly.
pub fn integrate_over(
    stepper: &Integrator,
    system: &KineticSystem,
    state: &[f64],
    dt: f64,
    initial_substep: f64,
    control: SubstepControl,
) -> Result<SubstepOutcome, IntegratorError> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(IntegratorError::InvalidStep(dt));
    }
    if !stepper.is_adaptive() {
        let outcome = single_step(stepper, system, state, dt)?;
        return Ok(SubstepOutcome {
            state: outcome.state,
            rates: outcome.rates,
            substeps: 1,
            rejections: 0,
            next_dt: dt,
        });
    }

    let mut h = if initial_substep > 0.0 && initial_substep.is_finite() {
        initial_substep.min(dt)
    } else {
        dt
    };
    let mut y = state.to_vec();
    let mut rates = system.evaluate(&y).rates;
    let mut t = 0.0;
    let mut substeps = 0;
    let mut rejections = 0;
    let mut rejected_in_row = 0;
    let mut next_dt = h;

    while dt - t > dt * 1e-12 {
        let remaining = dt - t;
        let h_try = h.min(remaining);
        if h_try < dt * 1e-12 {
            return Err(IntegratorError::StepRejected {
                dt: h_try,
                rejections: rejected_in_row,
            });
        }
        let outcome = stepper.step(system, &y, h_try)?;
        let (accepted, suggested) = match outcome.report {
            Some(report) => (report.accepted, report.suggested_dt),
            None => (true, h_try),
        };
        if accepted {
            // a step clipped to the end of the interval says nothing about the next one
            next_dt = if h_try < h { h } else { suggested };
            y = outcome.state;
            rates = outcome.rates;
            t += h_try;
            substeps += 1;
            rejected_in_row = 0;
            if substeps > control.max_substeps {
                return Err(IntegratorError::TooManySubsteps(control.max_substeps));
            }
        } else {
            rejections += 1;
            rejected_in_row += 1;
            if rejected_in_row > control.max_rejections {
                return Err(IntegratorError::StepRejected {
                    dt: h_try,
                    rejections: rejected_in_row,
                });
            }
        }
        h = suggested.min(dt);
    }

    Ok(SubstepOutcome {
        state: y,
        rates,
        substeps,
        rejections,
        next_dt: next_dt.min(dt),
    })
}

/// Single step on name-keyed maps, with the error report of the adaptive scheme.
///
/// Species are ordered by name; every key of `dcdt` must be a key of `state`.
pub fn ode_integrate_with_report(
    state: &HashMap<String, f64>,
    dcdt: &HashMap<String, String>,
    rates: &HashMap<String, String>,
    coefficients: &HashMap<String, f64>,
    dt: f64,
    solver: SolverType,
    tolerances: Tolerances,
) -> Result<
    (
        HashMap<String, f64>,
        HashMap<String, f64>,
        Option<StepReport>,
    ),
    IntegratorError,
> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(IntegratorError::InvalidStep(dt));
    }
    let network = ReactionNetwork::from_maps(dcdt, rates, coefficients)?;
    let mut species: Vec<String> = state.keys().cloned().collect();
    species.sort();
    let system = KineticSystem::compile(&species, &network)?;
    let y0: Vec<f64> = species.iter().map(|s| state[s]).collect();

    let outcome = single_step(&solver.integrator(tolerances), &system, &y0, dt)?;

    let new_state = species
        .iter()
        .cloned()
        .zip(outcome.state.iter().cloned())
        .collect();
    let rate_values = system
        .rate_names()
        .iter()
        .cloned()
        .zip(outcome.rates.iter().cloned())
        .collect();
    Ok((new_state, rate_values, outcome.report))
}

/// Single step on name-keyed maps: returns the new state and the rate-law values.
pub fn ode_integrate(
    state: &HashMap<String, f64>,
    dcdt: &HashMap<String, String>,
    rates: &HashMap<String, String>,
    coefficients: &HashMap<String, f64>,
    dt: f64,
    solver: SolverType,
) -> Result<(HashMap<String, f64>, HashMap<String, f64>), IntegratorError> {
    let (new_state, rate_values, _) = ode_integrate_with_report(
        state,
        dcdt,
        rates,
        coefficients,
        dt,
        solver,
        Tolerances::default(),
    )?;
    Ok((new_state, rate_values))
}

/// Shared by the integrators: reject states that left the real line.
pub(crate) fn check_finite(system: &KineticSystem, state: &[f64]) -> Result<(), IntegratorError> {
    match state.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(IntegratorError::NonFinite {
            species: system.species()[i].clone(),
        }),
        None => Ok(()),
    }
}

/// `y + dt * sum(weight_i * k_i)`
pub(crate) fn combine(y: &[f64], dt: f64, terms: &[(f64, &[f64])]) -> Vec<f64> {
    y.iter()
        .enumerate()
        .map(|(i, &yi)| {
            let increment: f64 = terms.iter().map(|(weight, k)| weight * k[i]).sum();
            yi + dt * increment
        })
        .collect()
}
