//! # Transport Module
//!
//! Diffusion–advection of dissolved species through the porous column.
//!
//! - [`tridiagonal`]: banded (tridiagonal) storage and the Thomas algorithm.
//! - [`transport_solver`]: finite-difference θ-scheme (Crank–Nicolson by default, backward
//!   Euler on request) with central or upwind advection, Dirichlet inlet and
//!   zero-gradient outlet. One solver is assembled per species and reused at every step.
pub mod transport_solver;
pub mod tridiagonal;
mod transport_tests;
