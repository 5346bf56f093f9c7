//! # Validation Tier Tests (T0-T4)
//!
//! If ANY tier fails, the enumeration engine is INVALID.
//!
//! ## Tiers
//! - T0: Presentation Integrity
//! - T1: Closure Invariants
//! - T2: Known Finite Structures
//! - T3: Budgets and Inconclusive Runs
//! - T4: Export Stability

use quandle_core::{
    Budget, CayleyGraph, ClosureEngine, Edge, EdgeStore, Expander, Generator, Limit, Outcome,
    Presentation, QuandleError, SilentObserver, Structure, Vertex, expand,
};

fn edge(s: u64, t: u64, g: u32) -> Edge {
    Edge::new(Vertex(s), Vertex(t), Generator(g))
}

fn run_bounded(presentation: Presentation, max_steps: u64) -> quandle_core::ExpansionReport {
    Expander::new(presentation)
        .with_budget(Budget::unbounded().with_max_steps(max_steps))
        .expect("budget")
        .run(&mut SilentObserver)
}

// =============================================================================
// TIER T0: PRESENTATION INTEGRITY
// =============================================================================

mod t0_presentation_integrity {
    use super::*;

    /// T0.1: Well-formed relations are accepted.
    #[test]
    fn valid_presentation_accepted() {
        let p = Presentation::new(3, &[vec![1, 2, 3], vec![2, -3, 1, 1]]).expect("valid");

        assert_eq!(p.generator_count(), 3);
        assert_eq!(p.relations().len(), 2);
        assert_eq!(p.structure(), Structure::Quandle);
        assert_eq!(p.orders(), &[2, 2, 2]);
        assert!(p.extra_secondary().is_empty());
    }

    /// T0.2: Zero generators are rejected before any graph is built.
    #[test]
    fn zero_generators_rejected() {
        assert!(matches!(expand(0, &[]), Err(QuandleError::NoGenerators)));
    }

    /// T0.3: An endpoint that is not a generator is rejected.
    #[test]
    fn undeclared_endpoint_rejected() {
        let result = expand(2, &[vec![1, 2, 5]]);
        assert!(matches!(
            result,
            Err(QuandleError::MalformedRelation { index: 0, .. })
        ));
    }

    /// T0.4: A relation without a word is rejected.
    #[test]
    fn relation_without_word_rejected() {
        assert!(expand(2, &[vec![1, 2]]).is_err());
    }

    /// T0.5: Zero steps are rejected.
    #[test]
    fn zero_step_rejected() {
        assert!(expand(2, &[vec![1, 0, 2]]).is_err());
    }

    /// T0.6: Error messages name the offending relation.
    #[test]
    fn error_names_relation_index() {
        let err = expand(2, &[vec![1, 2, 1], vec![1, 3, 1]]).expect_err("must fail");
        assert!(err.to_string().contains("#1"));
    }
}

// =============================================================================
// TIER T1: CLOSURE INVARIANTS
// =============================================================================

mod t1_closure_invariants {
    use super::*;

    /// T1.1: Closure restores functionality.
    #[test]
    fn closure_restores_functionality() {
        let mut store = EdgeStore::new();
        for v in 1..=4 {
            store.add_vertex(Vertex(v));
        }
        store.add_edge(edge(1, 3, 1));
        store.add_edge(edge(1, 4, 1));
        store.add_edge(edge(3, 2, 2));
        store.add_edge(edge(4, 1, 2));

        let outcome = ClosureEngine::close(&mut store, None);
        assert!(outcome.converged);

        let graph = CayleyGraph::from_store(2, &store);
        assert!(graph.is_functional());
        assert!(graph.is_injective());
        // 3 ~ 4, then 2 ~ 1 through the shared source on label 2
        assert_eq!(
            graph.vertices().collect::<Vec<_>>(),
            vec![Vertex(1), Vertex(3)]
        );
    }

    /// T1.2: The smallest id of every class survives.
    #[test]
    fn smallest_id_survives() {
        let mut store = EdgeStore::new();
        for v in [2, 5, 9] {
            store.add_vertex(Vertex(v));
        }
        store.add_edge(edge(9, 5, 1));
        store.add_edge(edge(9, 2, 1));

        ClosureEngine::close(&mut store, None);

        assert!(store.contains_vertex(Vertex(2)));
        assert!(!store.contains_vertex(Vertex(5)));
        assert!(store.contains_edge(&edge(9, 2, 1)));
    }

    /// T1.3: Closing a closed store changes nothing.
    #[test]
    fn closure_is_idempotent() {
        let mut store = EdgeStore::new();
        store.add_vertex(Vertex(1));
        store.add_vertex(Vertex(2));
        store.add_edge(edge(1, 2, 1));
        store.add_edge(edge(2, 1, 1));

        assert!(ClosureEngine::is_closed(&store));
        let before = CayleyGraph::from_store(1, &store);
        let outcome = ClosureEngine::close(&mut store, None);

        assert_eq!(outcome.passes, 0);
        assert_eq!(CayleyGraph::from_store(1, &store), before);
    }
}

// =============================================================================
// TIER T2: KNOWN FINITE STRUCTURES
// =============================================================================

mod t2_known_structures {
    use super::*;

    /// T2.1: One generator collapses to a single fixed point.
    #[test]
    fn one_generator_quandle() {
        let report = expand(1, &[]).expect("valid");

        assert_eq!(report.outcome, Outcome::Complete);
        assert_eq!(report.graph.vertices().collect::<Vec<_>>(), vec![Vertex(1)]);
        assert_eq!(report.graph.edges().collect::<Vec<_>>(), vec![edge(1, 1, 1)]);
    }

    /// T2.2: The trivial quandle on two generators.
    #[test]
    fn trivial_two_element_quandle() {
        let report = expand(2, &[vec![1, 2, 1], vec![2, 1, 2]]).expect("valid");

        assert!(report.is_complete());
        assert_eq!(
            report.graph.edges().collect::<Vec<_>>(),
            vec![edge(1, 1, 1), edge(1, 1, 2), edge(2, 2, 1), edge(2, 2, 2)]
        );
    }

    /// T2.3: The trivial quandle on three generators.
    #[test]
    fn trivial_three_element_quandle() {
        let relations: Vec<Vec<i64>> = (1..=3)
            .flat_map(|x| (1..=3).filter(move |&y| y != x).map(move |y| vec![x, y, x]))
            .collect();
        let report = expand(3, &relations).expect("valid");

        assert!(report.is_complete());
        assert_eq!(report.graph.vertex_count(), 3);
        assert_eq!(report.graph.edge_count(), 9);
        assert!(report.graph.edges().all(|e| e.source == e.target));
    }

    /// T2.4: `a^b = a` leaves `{a, b, b^a}`.
    #[test]
    fn one_fixed_generator() {
        let report = run_bounded(
            Presentation::new(2, &[vec![1, 2, 1]]).expect("valid"),
            1_000,
        );

        assert!(report.is_complete());
        assert_eq!(report.graph.vertex_count(), 3);
        assert!(report.graph.is_total());
        assert_eq!(report.graph.act(Vertex(1), Generator(2)), Some(Vertex(1)));
    }

    /// T2.5: `a^{ba} = b` presents the three-element dihedral quandle.
    #[test]
    fn dihedral_three() {
        let report = run_bounded(
            Presentation::new(2, &[vec![1, 2, 1, 2]]).expect("valid"),
            1_000,
        );

        assert!(report.is_complete());
        let graph = report.graph.relabeled();
        assert_eq!(graph.vertex_count(), 3);
        assert!(graph.is_total());
        // no element but itself is fixed by a generator of R3
        for g in [Generator(1), Generator(2)] {
            let fixed = graph.vertices().filter(|&v| graph.act(v, g) == Some(v)).count();
            assert_eq!(fixed, 1);
        }
    }

    /// T2.6: The free involutory rack on one generator is `{a, a^a}`.
    #[test]
    fn one_generator_rack() {
        let presentation = Presentation::new(1, &[])
            .expect("valid")
            .with_structure(Structure::Rack);
        let report = run_bounded(presentation, 100);

        assert!(report.is_complete());
        assert_eq!(
            report.graph.edges().collect::<Vec<_>>(),
            vec![edge(1, 2, 1), edge(2, 1, 1)]
        );
    }

    /// T2.7: With order 3 the one-generator rack is a 3-cycle.
    #[test]
    fn order_three_rack_is_a_cycle() {
        let presentation = Presentation::new(1, &[])
            .expect("valid")
            .with_structure(Structure::Rack)
            .with_order(3)
            .expect("order");
        let report = run_bounded(presentation, 100);

        assert!(report.is_complete());
        assert_eq!(report.graph.vertex_count(), 3);
        assert!(report.graph.is_total());
        assert_eq!(
            report
                .graph
                .apply_word(Vertex(1), &quandle_core::Word::from_signed(&[1, 1, 1]).expect("w")),
            Some(Vertex(1))
        );
    }

    /// T2.8: Per-generator orders: a one-generator rack of order 3.
    #[test]
    fn per_generator_order_rack() {
        let presentation = Presentation::new(1, &[])
            .expect("valid")
            .with_structure(Structure::Rack)
            .with_generator_orders(&[3])
            .expect("orders");
        let report = run_bounded(presentation, 100);

        assert!(report.is_complete());
        assert_eq!(report.graph.vertex_count(), 3);
        assert_eq!(report.graph.edge_count(), 3);
        assert!(report.graph.is_total());
    }

    /// T2.9: An extra closed word `x^{ab} = x` collapses the free
    /// involutory rack on two generators to two 2-cycles.
    #[test]
    fn extra_secondary_closes_free_rack() {
        let presentation = Presentation::new(2, &[])
            .expect("valid")
            .with_structure(Structure::Rack)
            .with_extra_secondary(&[vec![1, 2]])
            .expect("extra");
        let report = run_bounded(presentation, 100);

        assert!(report.is_complete());
        assert_eq!(report.graph.vertex_count(), 4);
        assert!(report.graph.is_total());
        for v in report.graph.vertices() {
            assert_eq!(
                report.graph.act(v, Generator(1)),
                report.graph.act(v, Generator(2))
            );
        }
    }

    /// T2.10: Three generators, 36 elements.
    #[test]
    fn three_generator_36_element_quandle() {
        let report = expand(
            3,
            &[
                vec![1, 2, 1, 2, 1, 2, 1, 3, 1, 2, 1, 2],
                vec![1, 2, 1, 3, 2, 1, 3],
                vec![3, 1, 2, 1, 2, 1, 3, 1, 2, 1, 2, 1, 2],
            ],
        )
        .expect("valid");

        assert!(report.is_complete());
        assert_eq!(report.graph.vertex_count(), 36);
        assert_eq!(report.graph.edge_count(), 108);
        assert!(report.graph.is_total());
    }

    /// T2.11: Three generators, 60 elements.
    #[test]
    fn three_generator_60_element_quandle() {
        let report = expand(
            3,
            &[
                vec![3, 1, 2, 1, 3, 1, 2, 1, 2, 1],
                vec![1, 2, 1, 2, 1, 2, 1, 3, 1, 2, 1, 2],
                vec![3, 1, 2, 1, 2, 3, 1, 2],
            ],
        )
        .expect("valid");

        assert!(report.is_complete());
        assert_eq!(report.graph.vertex_count(), 60);
        assert_eq!(report.graph.edge_count(), 180);
        assert!(report.graph.is_total());
    }

    /// T2.12: Identical input produces identical output.
    #[test]
    fn enumeration_is_deterministic() {
        let first = expand(2, &[vec![1, 2, 1, 2]]).expect("valid");
        let second = expand(2, &[vec![1, 2, 1, 2]]).expect("valid");

        assert_eq!(first, second);
    }
}

// =============================================================================
// TIER T3: BUDGETS AND INCONCLUSIVE RUNS
// =============================================================================

mod t3_budgets {
    use super::*;

    /// T3.1: The free involutory quandle on two generators is infinite.
    #[test]
    fn free_quandle_hits_step_limit() {
        let report = run_bounded(Presentation::new(2, &[]).expect("valid"), 40);

        assert_eq!(
            report.outcome,
            Outcome::Inconclusive(quandle_core::Exhausted {
                limit: Limit::Steps,
                reached: 40,
            })
        );
        assert_eq!(report.stats.steps, 40);
    }

    /// T3.2: A partial graph still satisfies the closure invariants.
    #[test]
    fn partial_graph_is_closed() {
        let report = run_bounded(Presentation::new(2, &[]).expect("valid"), 40);

        assert!(report.graph.is_functional());
        assert!(report.graph.is_injective());
        assert!(!report.graph.is_total());
    }

    /// T3.3: A closure pass limit of one stops a run that needs cascades.
    #[test]
    fn closure_pass_limit_reported() {
        let report = Expander::new(Presentation::new(2, &[vec![1, 2, 1, 2]]).expect("valid"))
            .with_budget(Budget::unbounded().with_max_closure_passes(1))
            .expect("budget")
            .run(&mut SilentObserver);

        match report.outcome {
            Outcome::Inconclusive(exhausted) => {
                assert_eq!(exhausted.limit, Limit::ClosurePasses);
            }
            Outcome::Complete => {
                // every closure happened to settle in one pass
                assert!(report.graph.is_total());
            }
        }
    }

    /// T3.4: Exhaustion is described by the limit that was hit.
    #[test]
    fn exhausted_display() {
        let exhausted = quandle_core::Exhausted {
            limit: Limit::Vertices,
            reached: 1001,
        };
        assert_eq!(exhausted.to_string(), "max_vertices exceeded (reached 1001)");
    }
}

// =============================================================================
// TIER T4: EXPORT STABILITY
// =============================================================================

mod t4_export {
    use super::*;
    use quandle_core::{export_canonical, import_canonical, report_from_bytes, report_to_bytes};

    /// T4.1: A completed graph survives the canonical format.
    #[test]
    fn canonical_roundtrip_of_enumeration() {
        let report = expand(2, &[vec![1, 2, 1, 2]]).expect("valid");
        let bytes = export_canonical(&report.graph).expect("export");

        assert_eq!(import_canonical(&bytes).expect("import"), report.graph);
    }

    /// T4.2: Two runs export the same bytes.
    #[test]
    fn canonical_bytes_are_stable() {
        let a = export_canonical(&expand(2, &[vec![1, 2, 1]]).expect("valid").graph);
        let b = export_canonical(&expand(2, &[vec![1, 2, 1]]).expect("valid").graph);

        assert_eq!(a.expect("export"), b.expect("export"));
    }

    /// T4.3: A snapshot keeps an inconclusive outcome.
    #[test]
    fn snapshot_keeps_partial_run() {
        let report = run_bounded(Presentation::new(2, &[]).expect("valid"), 10);
        let restored = report_from_bytes(&report_to_bytes(&report).expect("save")).expect("load");

        assert_eq!(restored, report);
    }
}
