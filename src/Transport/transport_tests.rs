#[cfg(test)]
mod tests {
    use crate::Domain::grid::Grid;
    use crate::Transport::transport_solver::{
        AdvectionScheme, Stencil, TimeScheme, TransportError, TransportScheme, TransportSolver,
    };
    use crate::Transport::tridiagonal::Tridiagonal;
    use approx::assert_relative_eq;

    #[test]
    fn thomas_solves_tridiagonal_system() {
        let system = Tridiagonal::new(
            vec![0.0, -1.0, -1.0, -1.0],
            vec![4.0, 4.0, 4.0, 4.0],
            vec![-1.0, -1.0, -1.0, 0.0],
        )
        .unwrap();
        let expected = vec![1.0, 2.0, -0.5, 3.0];
        let rhs = system.apply(&expected);
        let x = system.solve(&rhs).unwrap();
        for (xi, ei) in x.iter().zip(expected.iter()) {
            assert_relative_eq!(xi, ei, epsilon = 1e-12);
        }
    }

    #[test]
    fn thomas_reports_singular_pivot() {
        let system = Tridiagonal::new(vec![0.0, 1.0], vec![1.0, 1.0], vec![1.0, 0.0]).unwrap();
        assert_eq!(
            system.solve(&[1.0, 1.0]),
            Err(TransportError::Singular { row: 1 })
        );
        let zero = Tridiagonal::new(vec![0.0], vec![0.0], vec![0.0]).unwrap();
        assert_eq!(zero.solve(&[1.0]), Err(TransportError::Singular { row: 0 }));
    }

    #[test]
    fn thomas_checks_dimensions() {
        assert!(Tridiagonal::new(vec![0.0], vec![1.0, 1.0], vec![0.0, 0.0]).is_err());
        let system = Tridiagonal::new(vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]).unwrap();
        assert_eq!(
            system.solve(&[1.0]),
            Err(TransportError::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn stencils() {
        let central = Stencil::new(1.0, 0.2, 0.1, AdvectionScheme::Central);
        assert_relative_eq!(central.lower, 101.0, epsilon = 1e-9);
        assert_relative_eq!(central.center, -200.0, epsilon = 1e-9);
        assert_relative_eq!(central.upper, 99.0, epsilon = 1e-9);
        let upwind = Stencil::new(1.0, 0.2, 0.1, AdvectionScheme::Upwind);
        assert_relative_eq!(upwind.lower, 102.0, epsilon = 1e-9);
        assert_relative_eq!(upwind.center, -202.0, epsilon = 1e-9);
        assert_relative_eq!(upwind.upper, 100.0, epsilon = 1e-9);
        let backward = Stencil::new(1.0, -0.2, 0.1, AdvectionScheme::Upwind);
        assert_relative_eq!(backward.lower, 100.0, epsilon = 1e-9);
        assert_relative_eq!(backward.center, -202.0, epsilon = 1e-9);
        assert_relative_eq!(backward.upper, 102.0, epsilon = 1e-9);
        // every stencil annihilates constants
        for st in [central, upwind, backward] {
            assert_relative_eq!(st.lower + st.center + st.upper, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn uniform_profile_is_stationary() {
        let grid = Grid::new(1.0, 0.1, 1.0, 0.01, 0.4, 0.3).unwrap();
        for time in [TimeScheme::CrankNicolson, TimeScheme::BackwardEuler] {
            for advection in [AdvectionScheme::Central, AdvectionScheme::Upwind] {
                let solver =
                    TransportSolver::new(&grid, 2.0, TransportScheme { time, advection }).unwrap();
                let next = solver.advance(&vec![3.0; 11], 3.0).unwrap();
                for v in next {
                    assert_relative_eq!(v, 3.0, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn inlet_holds_the_boundary_value() {
        let grid = Grid::new(1.0, 0.1, 1.0, 0.01, 1.0, 0.2).unwrap();
        let solver = TransportSolver::new(&grid, 1.0, TransportScheme::default()).unwrap();
        let next = solver.advance(&vec![0.0; 11], 1.0).unwrap();
        assert_eq!(next[0], 1.0);
        // mass enters from the inlet and decreases monotonically downstream
        assert!(next[1] > next[2]);
        assert!(next[2] > next[3]);
        assert!(next.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn no_transport_keeps_the_profile() {
        let grid = Grid::new(1.0, 0.25, 1.0, 0.5, 1.0, 0.0).unwrap();
        let solver = TransportSolver::new(&grid, 0.0, TransportScheme::default()).unwrap();
        let previous = vec![5.0, 1.0, 2.0, 3.0, 4.0];
        let next = solver.advance(&previous, 5.0).unwrap();
        assert_eq!(next, previous);
    }

    #[test]
    fn two_node_grid() {
        let grid = Grid::new(1.0, 1.0, 1.0, 0.1, 1.0, 0.0).unwrap();
        let solver = TransportSolver::new(
            &grid,
            1.0,
            TransportScheme {
                time: TimeScheme::BackwardEuler,
                advection: AdvectionScheme::Central,
            },
        )
        .unwrap();
        // (1 + 0.1*2) c1 - 0.1*2*1 = 0  =>  c1 = 0.2/1.2
        let next = solver.advance(&[1.0, 0.0], 1.0).unwrap();
        assert_relative_eq!(next[1], 0.2 / 1.2, epsilon = 1e-12);
    }

    #[test]
    fn diffusion_conserves_mass_away_from_the_inlet() {
        // the zero-gradient outlet conserves the trapezoidal sum, half weight on the last node
        let grid = Grid::new(1.0, 0.1, 1.0, 0.001, 1.0, 0.0).unwrap();
        let solver = TransportSolver::new(&grid, 0.01, TransportScheme::default()).unwrap();
        let mut profile = vec![0.0; 11];
        profile[8] = 1.0;
        let next = solver.advance(&profile, 0.0).unwrap();
        let mass = |c: &[f64]| c.iter().sum::<f64>() - 0.5 * c[c.len() - 1];
        assert_relative_eq!(mass(&next), mass(&profile), epsilon = 1e-9);
        assert!(next[7] > 0.0 && next[9] > 0.0);
    }

    #[test]
    fn wrong_profile_length() {
        let grid = Grid::new(1.0, 0.1, 1.0, 0.01, 1.0, 0.2).unwrap();
        let solver = TransportSolver::new(&grid, 1.0, TransportScheme::default()).unwrap();
        assert!(matches!(
            solver.advance(&[0.0; 3], 1.0),
            Err(TransportError::DimensionMismatch { .. })
        ));
    }
}
