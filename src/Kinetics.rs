//! # Kinetics Module
//!
//! User-extensible reaction kinetics.
//!
//! - [`reaction_network`]: the configuration side. Species net rates (`dcdt`), named
//!   rate laws and named coefficients, validated at every mutation.
//! - [`rate_expressions`]: parsing of expression strings into symbolic expressions,
//!   explicit binding of identifiers against a symbol table, and the error type of the module.
//! - [`kinetic_system`]: the compiled network for a fixed species order, evaluating all
//!   rate laws and then all derivatives at a state.
//!
//! # Examples
//! ```
//! use PoroLab::Kinetics::reaction_network::ReactionNetwork;
//! use PoroLab::Kinetics::kinetic_system::KineticSystem;
//! let mut network = ReactionNetwork::new();
//! network.set_coefficient("k", 2.0).unwrap();
//! network.add_rate("R", "k*C").unwrap();
//! network.set_dcdt("C", "-R").unwrap();
//! let system = KineticSystem::compile(&["C".to_string()], &network).unwrap();
//! let evaluation = system.evaluate(&[0.5]);
//! assert_eq!(evaluation.derivative, vec![-1.0]);
//! ```
pub mod kinetic_system;
pub mod rate_expressions;
pub mod reaction_network;
mod kinetics_tests;
