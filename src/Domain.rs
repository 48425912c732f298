//! # Domain Module
//!
//! Everything that describes *what* is simulated before any numerics run:
//!
//! - [`grid`]: uniform space × time discretization, porosity and advection velocity.
//!   The node count is `length/dx + 1`, the number of time levels `duration/dt + 1`;
//!   ratios that are not integers (within a relative `1e-9`) are rejected.
//! - [`conditions`]: scalar-or-profile expansion of initial and boundary conditions.
//! - [`species`]: species entities owning their concentration matrices and the
//!   name-indexed registry that holds them.
pub mod conditions;
pub mod grid;
pub mod species;
mod domain_tests;
