//! # Simulation Module
//!
//! The orchestrator tying the grid, the species, transport and kinetics together.
//!
//! - [`porous_media_lab`]: [`PorousMediaLab`](porous_media_lab::PorousMediaLab), the
//!   operator-splitting time loop and its settings.
//! - [`simulation_config`]: the same setup read from a JSON task.
//! - [`simulation_output`]: summary tables printed with `prettytable`.
pub mod porous_media_lab;
pub mod simulation_config;
pub mod simulation_output;
