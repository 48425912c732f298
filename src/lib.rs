//! # PoroLab
//!
//! Reaction-transport of dissolved species in a 1D porous column.
//!
//! Each species is diffused and advected by an implicit finite-difference scheme and,
//! within the same time step, reacted node by node according to user supplied rate laws
//! (`"k*O2*Fe2"`, `"-4*R1 + R2"`, ...), integrated by a classical RK4 or an adaptive
//! embedded 5th order Runge–Kutta scheme.
#[allow(non_snake_case)]
pub mod Domain;
#[allow(non_snake_case)]
pub mod Integrators;
#[allow(non_snake_case)]
pub mod Kinetics;
#[allow(non_snake_case)]
pub mod Simulation;
#[allow(non_snake_case)]
pub mod Transport;
#[allow(non_snake_case)]
pub mod Utils;
