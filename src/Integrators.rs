//! # Integrators Module
//!
//! ODE integrators advancing the reaction subsystem `dC/dt = f(C)`, where `f` is a compiled
//! [`KineticSystem`](crate::Kinetics::kinetic_system::KineticSystem).
//!
//! - [`runge_kutta4`]: classical fixed-step RK4, no error estimate.
//! - [`butcher5`]: embedded 5(4) pair (Cash–Karp tableau) with local error estimate and
//!   step-size recommendation.
//! - [`ode_api`]: the [`ReactionStepper`](ode_api::ReactionStepper) trait, the dispatch enum,
//!   sub-stepping over an outer time step and the name-keyed [`ode_integrate`](ode_api::ode_integrate)
//!   entry point.
//!
//! Both integrators see a flat state vector; in the coupled simulation they are called once
//! per spatial node.
//!
//! # Examples
//! ```
//! use PoroLab::Integrators::ode_api::{SolverType, ode_integrate};
//! use std::collections::HashMap;
//! let state: HashMap<String, f64> = [("C".to_string(), 1.0)].into();
//! let dcdt: HashMap<String, String> = [("C".to_string(), "-R".to_string())].into();
//! let rates: HashMap<String, String> = [("R".to_string(), "k*C".to_string())].into();
//! let coef: HashMap<String, f64> = [("k".to_string(), 2.0)].into();
//! let (new_state, rate_values) =
//!     ode_integrate(&state, &dcdt, &rates, &coef, 1e-4, SolverType::RungeKutta4).unwrap();
//! assert!((new_state["C"] - (-2e-4f64).exp()).abs() < 1e-12);
//! assert!(rate_values.contains_key("R"));
//! ```
pub mod butcher5;
pub mod ode_api;
pub mod runge_kutta4;
