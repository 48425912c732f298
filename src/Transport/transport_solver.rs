//! # Transport solver
//!
//! One implicit time step of `phi * dC/dt = D * d²C/dx² - w * dC/dx` for one species.
//!
//! With the spatial operator at node `i`
//! `L_i(C) = l*C[i-1] + m*C[i] + u*C[i+1]`
//! the θ-scheme reads
//! `phi*(C^{n+1} - C^n) = dt*(θ*L(C^{n+1}) + (1-θ)*L(C^n))`,
//! θ = 1/2 for Crank–Nicolson and θ = 1 for backward Euler.
//!
//! | advection | l | m | u |
//! |-----------|---|---|---|
//! | central | s + w/(2dx) | -2s | s - w/(2dx) |
//! | upwind, w ≥ 0 | s + w/dx | -2s - w/dx | s |
//! | upwind, w < 0 | s | -2s + w/dx | s - w/dx |
//!
//! with `s = D/dx²`. Node 0 carries the Dirichlet value and is moved to the right-hand
//! side, so the system has `num_nodes - 1` unknowns. The outlet is zero-gradient: the
//! ghost node `C[n] = C[n-2]` folds `u` into the lower diagonal of the last row.
use super::tridiagonal::Tridiagonal;
use crate::Domain::grid::Grid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/////////////////////ERROR HANDLING////////////////////////////////////////////////////////
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("singular transport matrix: zero pivot in row {row}")]
    Singular { row: usize },
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("transport produced a non-finite concentration at node {node}")]
    NonFinite { node: usize },
}
////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeScheme {
    #[default]
    CrankNicolson,
    BackwardEuler,
}

impl TimeScheme {
    pub fn theta(&self) -> f64 {
        match self {
            TimeScheme::CrankNicolson => 0.5,
            TimeScheme::BackwardEuler => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdvectionScheme {
    #[default]
    Central,
    Upwind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportScheme {
    pub time: TimeScheme,
    pub advection: AdvectionScheme,
}

/// coefficients of the spatial operator at one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stencil {
    pub lower: f64,
    pub center: f64,
    pub upper: f64,
}

impl Stencil {
    pub fn new(diffusion_coefficient: f64, w: f64, dx: f64, advection: AdvectionScheme) -> Self {
        let s = diffusion_coefficient / (dx * dx);
        match advection {
            AdvectionScheme::Central => Stencil {
                lower: s + w / (2.0 * dx),
                center: -2.0 * s,
                upper: s - w / (2.0 * dx),
            },
            AdvectionScheme::Upwind if w >= 0.0 => Stencil {
                lower: s + w / dx,
                center: -2.0 * s - w / dx,
                upper: s,
            },
            AdvectionScheme::Upwind => Stencil {
                lower: s,
                center: -2.0 * s + w / dx,
                upper: s - w / dx,
            },
        }
    }
}

/// Pre-assembled implicit system of one species.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSolver {
    stencil: Stencil,
    theta: f64,
    phi: f64,
    dt: f64,
    num_nodes: usize,
    /// left-hand side over nodes 1..num_nodes-1
    implicit: Tridiagonal,
}

impl TransportSolver {
    pub fn new(
        grid: &Grid,
        diffusion_coefficient: f64,
        scheme: TransportScheme,
    ) -> Result<Self, TransportError> {
        let stencil = Stencil::new(diffusion_coefficient, grid.w(), grid.dx(), scheme.advection);
        let theta = scheme.time.theta();
        let phi = grid.phi();
        let dt = grid.dt();
        let n = grid.num_nodes();
        let unknowns = n - 1;

        let a = theta * dt;
        let mut lower = vec![-a * stencil.lower; unknowns];
        let diag = vec![phi - a * stencil.center; unknowns];
        let mut upper = vec![-a * stencil.upper; unknowns];
        lower[0] = 0.0;
        upper[unknowns - 1] = 0.0;
        if unknowns > 1 {
            lower[unknowns - 1] = -a * (stencil.lower + stencil.upper);
        }
        let implicit = Tridiagonal::new(lower, diag, upper)?;

        Ok(Self {
            stencil,
            theta,
            phi,
            dt,
            num_nodes: n,
            implicit,
        })
    }

    pub fn stencil(&self) -> Stencil {
        self.stencil
    }

    /// `L_i(c)` with the zero-gradient ghost node at the outlet
    fn operator(&self, c: &[f64], i: usize) -> f64 {
        let st = &self.stencil;
        if i + 1 == self.num_nodes {
            (st.lower + st.upper) * c[i - 1] + st.center * c[i]
        } else {
            st.lower * c[i - 1] + st.center * c[i] + st.upper * c[i + 1]
        }
    }

    /// coefficient of the inlet node in the operator of node 1
    fn inlet_coupling(&self) -> f64 {
        if self.num_nodes == 2 {
            self.stencil.lower + self.stencil.upper
        } else {
            self.stencil.lower
        }
    }

    /// Profile at the next time level, given the current profile and the inlet value of
    /// the next level. Node 0 of the result is exactly `boundary_value`.
    pub fn advance(&self, previous: &[f64], boundary_value: f64) -> Result<Vec<f64>, TransportError> {
        let n = self.num_nodes;
        if previous.len() != n {
            return Err(TransportError::DimensionMismatch {
                expected: n,
                found: previous.len(),
            });
        }
        let explicit = (1.0 - self.theta) * self.dt;
        let mut rhs: Vec<f64> = (1..n)
            .map(|i| self.phi * previous[i] + explicit * self.operator(previous, i))
            .collect();
        rhs[0] += self.theta * self.dt * self.inlet_coupling() * boundary_value;

        let interior = self.implicit.solve(&rhs)?;
        let mut next = Vec::with_capacity(n);
        next.push(boundary_value);
        next.extend(interior);
        if let Some(node) = next.iter().position(|v| !v.is_finite()) {
            return Err(TransportError::NonFinite { node });
        }
        Ok(next)
    }
}
