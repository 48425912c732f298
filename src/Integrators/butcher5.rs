//! Embedded 5(4) Runge–Kutta pair with step-size control.
//!
//! Six stages of the Cash–Karp Butcher tableau give a 5th order solution and an embedded
//! 4th order one. Their difference is the local error estimate; scaled by
//! `absolute + relative*|y|` it decides acceptance and the next step size:
//! `dt_new = dt * clamp(safety * norm^(-1/5), min_factor, max_factor)`, never growing
//! after a rejection. A trial step that leaves the real line is rejected with
//! `min_factor`; callers taking a single step check the state themselves.
use super::ode_api::{
    IntegratorError, ReactionStepper, StepOutcome, StepReport, Tolerances, combine,
};
use crate::Kinetics::kinetic_system::KineticSystem;

// Cash–Karp tableau
const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0];
const A5: [f64; 4] = [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0];
const A6: [f64; 5] = [
    1631.0 / 55296.0,
    175.0 / 512.0,
    575.0 / 13824.0,
    44275.0 / 110592.0,
    253.0 / 4096.0,
];
/// 5th order weights
const B5: [f64; 6] = [
    37.0 / 378.0,
    0.0,
    250.0 / 621.0,
    125.0 / 594.0,
    0.0,
    512.0 / 1771.0,
];
/// embedded 4th order weights
const B4: [f64; 6] = [
    2825.0 / 27648.0,
    0.0,
    18575.0 / 48384.0,
    13525.0 / 55296.0,
    277.0 / 14336.0,
    1.0 / 4.0,
];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Butcher5 {
    pub tolerances: Tolerances,
}

impl Butcher5 {
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    fn step_factor(&self, error_norm: f64, accepted: bool) -> f64 {
        let tol = &self.tolerances;
        let factor = if error_norm == 0.0 {
            tol.max_factor
        } else {
            (tol.safety * error_norm.powf(-0.2)).clamp(tol.min_factor, tol.max_factor)
        };
        if accepted { factor } else { factor.min(1.0) }
    }
}

impl ReactionStepper for Butcher5 {
    fn step(
        &self,
        system: &KineticSystem,
        state: &[f64],
        dt: f64,
    ) -> Result<StepOutcome, IntegratorError> {
        let stage = |weights: &[f64], ks: &[Vec<f64>]| -> Vec<f64> {
            let terms: Vec<(f64, &[f64])> = weights
                .iter()
                .zip(ks.iter())
                .map(|(w, k)| (*w, k.as_slice()))
                .collect();
            combine(state, dt, &terms)
        };

        let mut ks: Vec<Vec<f64>> = Vec::with_capacity(6);
        ks.push(system.evaluate(state).derivative);
        ks.push(system.evaluate(&stage(&A2, &ks)).derivative);
        ks.push(system.evaluate(&stage(&A3, &ks)).derivative);
        ks.push(system.evaluate(&stage(&A4, &ks)).derivative);
        ks.push(system.evaluate(&stage(&A5, &ks)).derivative);
        let last = system.evaluate(&stage(&A6, &ks));
        ks.push(last.derivative);

        let y5 = stage(&B5, &ks);
        let y4 = stage(&B4, &ks);

        let tol = &self.tolerances;
        let mut local_error: f64 = 0.0;
        let mut error_norm: f64 = 0.0;
        let mut finite = true;
        for i in 0..y5.len() {
            let difference = (y5[i] - y4[i]).abs();
            let scale = tol.absolute + tol.relative * state[i].abs().max(y5[i].abs());
            finite &= y5[i].is_finite() && difference.is_finite() && scale.is_finite();
            local_error = local_error.max(difference);
            error_norm = error_norm.max(difference / scale);
        }
        // an overflowing trial step is a rejection: retry with the smallest allowed factor
        if !finite || !error_norm.is_finite() {
            return Ok(StepOutcome {
                state: y5,
                rates: last.rates,
                report: Some(StepReport {
                    local_error: f64::INFINITY,
                    error_norm: f64::INFINITY,
                    accepted: false,
                    suggested_dt: dt * tol.min_factor,
                }),
            });
        }
        let accepted = error_norm <= 1.0;
        let suggested_dt = dt * self.step_factor(error_norm, accepted);

        Ok(StepOutcome {
            state: y5,
            rates: last.rates,
            report: Some(StepReport {
                local_error,
                error_norm,
                accepted,
                suggested_dt,
            }),
        })
    }

    fn is_adaptive(&self) -> bool {
        true
    }
}
