#[cfg(test)]
mod tests {
    use crate::Domain::conditions::{ConditionInput, ConditionKind};
    use crate::Domain::grid::{ConfigError, Grid};
    use crate::Domain::species::{Species, SpeciesRegistry, is_identifier};
    use approx::assert_relative_eq;

    #[test]
    fn grid_derived_counts() {
        let grid = Grid::new(1.0, 0.1, 0.1, 0.01, 1.0, 0.2).unwrap();
        assert_eq!(grid.num_nodes(), 11);
        assert_eq!(grid.num_steps(), 11);
        let x = grid.x();
        assert_relative_eq!(x[10], 1.0, epsilon = 1e-12);
        let t = grid.time();
        assert_relative_eq!(t[10], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn grid_accepts_float_noise_in_ratios() {
        // 100/0.1 and 0.1/0.001 are not exact in binary floating point
        let grid = Grid::new(100.0, 0.1, 0.1, 0.001, 1.0, 0.2).unwrap();
        assert_eq!(grid.num_nodes(), 1001);
        assert_eq!(grid.num_steps(), 101);
    }

    #[test]
    fn grid_rejects_fractional_division() {
        let err = Grid::new(1.0, 0.3, 1.0, 0.1, 1.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonIntegerDivision {
                what: "length/dx",
                ..
            }
        ));
        let err = Grid::new(1.0, 0.1, 1.0, 0.15, 1.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonIntegerDivision {
                what: "duration/dt",
                ..
            }
        ));
    }

    #[test]
    fn grid_rejects_bad_parameters() {
        assert!(Grid::new(0.0, 0.1, 1.0, 0.1, 1.0, 0.0).is_err());
        assert!(Grid::new(1.0, -0.1, 1.0, 0.1, 1.0, 0.0).is_err());
        assert!(Grid::new(1.0, 0.1, 1.0, 0.1, 0.0, 0.0).is_err());
        assert!(Grid::new(1.0, 0.1, 1.0, 0.1, 1.5, 0.0).is_err());
        assert!(Grid::new(1.0, 0.1, 1.0, 0.1, 0.5, f64::NAN).is_err());
        // dx larger than the domain leaves no interval
        assert!(Grid::new(1.0, 2.0, 1.0, 0.1, 0.5, 0.0).is_err());
    }

    #[test]
    fn scalar_condition_is_broadcast() {
        let resolved = ConditionInput::from(12.32)
            .resolve("O2", ConditionKind::Initial, 11)
            .unwrap();
        assert_eq!(resolved.len(), 11);
        assert!(resolved.iter().all(|&v| v == 12.32));
    }

    #[test]
    fn profile_condition_must_match_length() {
        let err = ConditionInput::from(vec![1.0, 2.0, 3.0])
            .resolve("O2", ConditionKind::Boundary, 4)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::LengthMismatch {
                species: "O2".to_string(),
                what: "boundary condition",
                expected: 4,
                found: 3,
            }
        );
        let ok = ConditionInput::from(vec![1.0, 2.0, 3.0, 4.0])
            .resolve("O2", ConditionKind::Boundary, 4)
            .unwrap();
        assert_eq!(ok[3], 4.0);
    }

    #[test]
    fn species_concentration_layout() {
        let grid = Grid::new(1.0, 0.1, 0.1, 0.1, 1.0, 0.2).unwrap();
        let init_c = 12.32;
        let o2 = Species::new(&grid, "O2", 40.0, init_c.into(), init_c.into()).unwrap();
        let c = o2.concentration();
        assert_eq!(c.nrows(), 11);
        assert_eq!(c.ncols(), 2);
        assert!(c.column(0).iter().all(|&v| v == init_c));
        assert!(c.row(0).iter().all(|&v| v == init_c));
        // untouched interior of later columns stays zero until solve
        assert_eq!(c[(5, 1)], 0.0);
    }

    #[test]
    fn boundary_wins_at_the_inlet_corner() {
        let grid = Grid::new(1.0, 0.5, 1.0, 0.5, 1.0, 0.0).unwrap();
        let s = Species::new(&grid, "A", 1.0, 0.0.into(), vec![2.0, 3.0, 4.0].into()).unwrap();
        assert_eq!(s.concentration()[(0, 0)], 2.0);
        assert_eq!(s.concentration()[(1, 0)], 0.0);
        assert_eq!(s.concentration()[(0, 2)], 4.0);
    }

    #[test]
    fn species_validation() {
        let grid = Grid::new(1.0, 0.1, 0.1, 0.1, 1.0, 0.2).unwrap();
        assert!(matches!(
            Species::new(&grid, "2O", 1.0, 0.0.into(), 0.0.into()),
            Err(ConfigError::InvalidName(_))
        ));
        assert!(Species::new(&grid, "O2", -1.0, 0.0.into(), 0.0.into()).is_err());
        assert!(Species::new(&grid, "O2", 1.0, vec![0.0; 3].into(), 0.0.into()).is_err());
    }

    #[test]
    fn registry_rejects_duplicates() {
        let grid = Grid::new(1.0, 0.1, 0.1, 0.1, 1.0, 0.2).unwrap();
        let mut registry = SpeciesRegistry::new();
        registry
            .add(Species::new(&grid, "O2", 1.0, 0.0.into(), 0.0.into()).unwrap())
            .unwrap();
        registry
            .add(Species::new(&grid, "Fe2", 1.0, 0.0.into(), 0.0.into()).unwrap())
            .unwrap();
        let err = registry
            .add(Species::new(&grid, "O2", 2.0, 0.0.into(), 0.0.into()).unwrap())
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateName("O2".to_string()));
        assert_eq!(registry.names(), vec!["O2".to_string(), "Fe2".to_string()]);
        assert_eq!(registry.get("Fe2").unwrap().diffusion_coefficient(), 1.0);
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("O2"));
        assert!(is_identifier("_k1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1k"));
        assert!(!is_identifier("k-1"));
        assert!(!is_identifier("O2\n"));
        assert!(!is_identifier("Fe 2"));
    }
}
