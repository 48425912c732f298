//! # Grid
//!
//! Spatial and temporal discretization of the 1D column together with the two
//! medium properties shared by every species: porosity `phi` and advection
//! velocity `w`.
//!
//! Node `0` is the inlet (Dirichlet boundary), node `num_nodes - 1` is the outlet.
//! Time level `0` holds the initial condition.
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/////////////////////ERROR HANDLING////////////////////////////////////////////////////////
/// Configuration errors raised while building a grid, resolving conditions or
/// declaring species. All of them are fatal: nothing is simulated on a bad setup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("{what} = {ratio} is not an integer number of steps")]
    NonIntegerDivision { what: &'static str, ratio: f64 },
    #[error("{what} of species '{species}' has length {found}, expected {expected}")]
    LengthMismatch {
        species: String,
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("'{0}' is not a valid identifier")]
    InvalidName(String),
    #[error("name '{0}' is already declared")]
    DuplicateName(String),
    #[error("non-finite value in {what} of species '{species}'")]
    NonFiniteValue { species: String, what: &'static str },
}
////////////////////////////////////////////////////////////////////////////////////////////

/// relative tolerance used to accept a floating point ratio as an integer
pub const DIVISION_TOLERANCE: f64 = 1e-9;

/// Parameters of the grid as the user supplies them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub length: f64,
    pub dx: f64,
    pub duration: f64,
    pub dt: f64,
    #[serde(alias = "phi")]
    pub porosity: f64,
    #[serde(alias = "w")]
    pub advection_velocity: f64,
}

/// Uniform space × time grid with derived node and step counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    length: f64,
    dx: f64,
    duration: f64,
    dt: f64,
    phi: f64,
    w: f64,
    num_nodes: usize,
    num_steps: usize,
}

impl Grid {
    pub fn new(
        length: f64,
        dx: f64,
        duration: f64,
        dt: f64,
        phi: f64,
        w: f64,
    ) -> Result<Self, ConfigError> {
        positive("length", length)?;
        positive("dx", dx)?;
        positive("duration", duration)?;
        positive("dt", dt)?;
        if !(phi > 0.0 && phi <= 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "porosity",
                value: phi,
                reason: "must lie in (0, 1]",
            });
        }
        if !w.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "advection_velocity",
                value: w,
                reason: "must be finite",
            });
        }
        let intervals = integer_ratio("length/dx", length, dx)?;
        let time_steps = integer_ratio("duration/dt", duration, dt)?;

        Ok(Self {
            length,
            dx,
            duration,
            dt,
            phi,
            w,
            num_nodes: intervals + 1,
            num_steps: time_steps + 1,
        })
    }

    pub fn from_config(config: &GridConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.length,
            config.dx,
            config.duration,
            config.dt,
            config.porosity,
            config.advection_velocity,
        )
    }

    pub fn length(&self) -> f64 {
        self.length
    }
    pub fn dx(&self) -> f64 {
        self.dx
    }
    pub fn duration(&self) -> f64 {
        self.duration
    }
    pub fn dt(&self) -> f64 {
        self.dt
    }
    /// porosity
    pub fn phi(&self) -> f64 {
        self.phi
    }
    /// advection velocity
    pub fn w(&self) -> f64 {
        self.w
    }
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// node coordinates from inlet to outlet
    pub fn x(&self) -> DVector<f64> {
        DVector::from_fn(self.num_nodes, |i, _| i as f64 * self.dx)
    }

    /// time levels from 0 to duration
    pub fn time(&self) -> DVector<f64> {
        DVector::from_fn(self.num_steps, |k, _| k as f64 * self.dt)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

/// `numerator / denominator` rounded to the nearest integer, rejected when the
/// rounding moves the ratio by more than `DIVISION_TOLERANCE` (relative).
fn integer_ratio(
    what: &'static str,
    numerator: f64,
    denominator: f64,
) -> Result<usize, ConfigError> {
    let ratio = numerator / denominator;
    let rounded = ratio.round();
    if rounded < 1.0 || (ratio - rounded).abs() > DIVISION_TOLERANCE * rounded.max(1.0) {
        return Err(ConfigError::NonIntegerDivision { what, ratio });
    }
    Ok(rounded as usize)
}
