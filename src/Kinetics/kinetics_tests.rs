#[cfg(test)]
mod tests {
    use crate::Kinetics::kinetic_system::KineticSystem;
    use crate::Kinetics::rate_expressions::{
        CompiledExpression, KineticsError, Slot, SymbolTable, check_syntax, normalize_expression,
    };
    use crate::Kinetics::reaction_network::ReactionNetwork;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn decay_network() -> ReactionNetwork {
        let mut network = ReactionNetwork::new();
        network.set_coefficient("k", 2.0).unwrap();
        network.add_rate("R", "k*C").unwrap();
        network.set_dcdt("C", "-R").unwrap();
        network
    }

    #[test]
    fn syntax_check() {
        assert!(check_syntax("k*C").is_ok());
        assert!(check_syntax("k1 * (A + B)^2").is_ok());
        assert!(check_syntax("k*O2**0.5").is_ok());
        assert!(check_syntax("").is_err());
        assert!(check_syntax("k*C;").is_err());
        assert!(check_syntax("(k*C").is_err());
        assert!(check_syntax("k*C)").is_err());
        assert!(check_syntax("k*").is_err());
        assert_eq!(normalize_expression(" k*O2**2 "), "k*O2^2");
    }

    #[test]
    fn malformed_token_sequences_are_syntax_errors() {
        for bad in ["k*/C", "*k", "()", "k C", "1..2*C", "C^^2", "2k*C", "k*()", "(*C)", "C^", "."] {
            assert!(
                matches!(check_syntax(bad), Err(KineticsError::Syntax { .. })),
                "accepted '{}'",
                bad
            );
        }
        for good in ["-k*C", "+C", "k*(-C)", "1.5e-3*C", ".5*C", "2.*C", "exp(-k)*C", "-(A + B)/2"] {
            assert!(check_syntax(good).is_ok(), "rejected '{}'", good);
        }
        let mut network = ReactionNetwork::new();
        assert!(matches!(
            network.add_rate("R", "k C"),
            Err(KineticsError::Syntax { .. })
        ));
        assert!(network.rates().is_empty());
    }

    #[test]
    fn compiled_expression_binds_slots() {
        let mut table = SymbolTable::new();
        table.insert("C", Slot::State(0)).unwrap();
        table.insert("k", Slot::Constant(3.0)).unwrap();
        let expression = CompiledExpression::compile("k*C", &table, "test").unwrap();
        assert_eq!(expression.slots().len(), 2);
        assert_relative_eq!(expression.eval(&[2.0], &[]), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn symbol_table_rejects_duplicates() {
        let mut table = SymbolTable::new();
        table.insert("A", Slot::State(0)).unwrap();
        assert_eq!(
            table.insert("A", Slot::Constant(1.0)),
            Err(KineticsError::AmbiguousName("A".to_string()))
        );
    }

    #[test]
    fn two_phase_evaluation() {
        let system = KineticSystem::compile(&names(&["C"]), &decay_network()).unwrap();
        let evaluation = system.evaluate(&[0.5]);
        assert_relative_eq!(evaluation.rates[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(evaluation.derivative[0], -1.0, epsilon = 1e-12);
        assert!(!system.is_inert());
    }

    #[test]
    fn species_without_dcdt_default_to_zero() {
        let system = KineticSystem::compile(&names(&["C", "D"]), &decay_network()).unwrap();
        let evaluation = system.evaluate(&[0.5, 7.0]);
        assert_eq!(evaluation.derivative[1], 0.0);
        let empty = KineticSystem::compile(&names(&["C"]), &ReactionNetwork::new()).unwrap();
        assert!(empty.is_inert());
        assert_eq!(empty.evaluate(&[3.0]).derivative, vec![0.0]);
    }

    #[test]
    fn coupled_reaction() {
        // Fe2 oxidation: R = k*Fe2*O2, dFe2/dt = -4R, dO2/dt = -R, dFe3/dt = 4R
        let mut network = ReactionNetwork::new();
        network.set_coefficient("k", 0.5).unwrap();
        network.add_rate("R", "k*Fe2*O2").unwrap();
        network.set_dcdt("Fe2", "-4*R").unwrap();
        network.set_dcdt("O2", "-R").unwrap();
        network.set_dcdt("Fe3", "4*R").unwrap();
        let system = KineticSystem::compile(&names(&["Fe2", "O2", "Fe3"]), &network).unwrap();
        let evaluation = system.evaluate(&[2.0, 3.0, 0.0]);
        assert_relative_eq!(evaluation.rates[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(evaluation.derivative[0], -12.0, epsilon = 1e-12);
        assert_relative_eq!(evaluation.derivative[1], -3.0, epsilon = 1e-12);
        assert_relative_eq!(evaluation.derivative[2], 12.0, epsilon = 1e-12);
    }

    #[test]
    fn dcdt_for_unknown_species_is_reported() {
        let mut network = ReactionNetwork::new();
        network.set_coefficient("k", 2.0).unwrap();
        network.add_rate("R", "k*C").unwrap();
        network.set_dcdt("C1", "-R").unwrap();
        let err = KineticSystem::compile(&names(&["C"]), &network).unwrap_err();
        assert_eq!(err, KineticsError::UnknownSpecies("C1".to_string()));
        assert!(err.is_name_resolution());
    }

    #[test]
    fn unresolved_identifier_is_reported() {
        let mut network = ReactionNetwork::new();
        network.add_rate("R", "kk*C").unwrap();
        network.set_dcdt("C", "-R").unwrap();
        let err = KineticSystem::compile(&names(&["C"]), &network).unwrap_err();
        assert_eq!(
            err,
            KineticsError::UnresolvedName {
                context: "rate law 'R'".to_string(),
                name: "kk".to_string()
            }
        );
    }

    #[test]
    fn rate_law_cannot_reference_another_rate() {
        let mut network = ReactionNetwork::new();
        network.set_coefficient("k", 1.0).unwrap();
        network.add_rate("R1", "k*C").unwrap();
        network.add_rate("R2", "2*R1").unwrap();
        let err = KineticSystem::compile(&names(&["C"]), &network).unwrap_err();
        assert!(matches!(err, KineticsError::UnresolvedName { ref name, .. } if name == "R1"));
    }

    #[test]
    fn names_are_one_namespace() {
        let mut network = ReactionNetwork::new();
        network.set_coefficient("k", 1.0).unwrap();
        assert_eq!(
            network.add_rate("k", "C"),
            Err(KineticsError::AmbiguousName("k".to_string()))
        );
        network.set_coefficient("C", 1.0).unwrap();
        let err = KineticSystem::compile(&names(&["C"]), &network).unwrap_err();
        assert_eq!(err, KineticsError::AmbiguousName("C".to_string()));
    }

    #[test]
    fn network_mutations_are_validated() {
        let mut network = ReactionNetwork::new();
        assert!(matches!(
            network.set_coefficient("k", f64::INFINITY),
            Err(KineticsError::InvalidCoefficient { .. })
        ));
        assert!(matches!(
            network.set_dcdt("1C", "-R"),
            Err(KineticsError::InvalidName(_))
        ));
        assert!(matches!(
            network.add_rate("R", "k*C$"),
            Err(KineticsError::Syntax { .. })
        ));
        assert_eq!(network.dcdt("C"), "0");
    }

    #[test]
    fn bulk_replacement_keeps_old_entries_on_error() {
        let mut network = decay_network();
        let mut bad = HashMap::new();
        bad.insert("R".to_string(), "k*(C".to_string());
        assert!(network.set_rates(&bad).is_err());
        assert_eq!(network.rates().get("R").unwrap(), "k*C");

        let mut good = HashMap::new();
        good.insert("R".to_string(), "k*C^2".to_string());
        network.set_rates(&good).unwrap();
        assert_eq!(network.rates().get("R").unwrap(), "k*C^2");
        assert!(network.validate().is_ok());
    }

    #[test]
    fn network_from_maps() {
        let dcdt: HashMap<String, String> = [("C".to_string(), "-R".to_string())].into();
        let rates: HashMap<String, String> = [("R".to_string(), "k*C".to_string())].into();
        let coef: HashMap<String, f64> = [("k".to_string(), 2.0)].into();
        let network = ReactionNetwork::from_maps(&dcdt, &rates, &coef).unwrap();
        assert_eq!(network, decay_network());
    }
}
