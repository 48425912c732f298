//! Classical fixed-step 4th order Runge–Kutta
use super::ode_api::{
    IntegratorError, ReactionStepper, StepOutcome, check_finite, combine,
};
use crate::Kinetics::kinetic_system::KineticSystem;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RungeKutta4;

impl ReactionStepper for RungeKutta4 {
    fn step(
        &self,
        system: &KineticSystem,
        state: &[f64],
        dt: f64,
    ) -> Result<StepOutcome, IntegratorError> {
        let k1 = system.evaluate(state).derivative;
        let k2 = system
            .evaluate(&combine(state, dt, &[(0.5, k1.as_slice())]))
            .derivative;
        let k3 = system
            .evaluate(&combine(state, dt, &[(0.5, k2.as_slice())]))
            .derivative;
        let last = system.evaluate(&combine(state, dt, &[(1.0, k3.as_slice())]));
        let k4 = &last.derivative;

        let new_state = combine(
            state,
            dt,
            &[
                (1.0 / 6.0, k1.as_slice()),
                (2.0 / 6.0, k2.as_slice()),
                (2.0 / 6.0, k3.as_slice()),
                (1.0 / 6.0, k4.as_slice()),
            ],
        );
        check_finite(system, &new_state)?;
        Ok(StepOutcome {
            state: new_state,
            rates: last.rates,
            report: None,
        })
    }

    fn is_adaptive(&self) -> bool {
        false
    }
}
