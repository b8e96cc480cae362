use coopnav_core::NodeId;

use crate::graph::{Connection, EnvGraph, OutcomeArity, split_remainder};
use crate::map::{EnvMap, Transition};
use crate::search::{BLOCKED_EDGE_NOMINAL, Objective, PathInstance, shortest_path};

/// Line environment `1 - 2 - ... - n`, every edge distance 1, success 0.9.
fn line_graph(n: usize) -> EnvGraph {
    let connections: Vec<Connection> = (1..n as u32)
        .map(|i| Connection::new(i, i + 1, 1.0, 0.9))
        .collect();
    let mut graph = EnvGraph::new(n, OutcomeArity::Three);
    graph.add_connections(&connections).unwrap();
    graph.build_map(None).unwrap();
    graph
}

/// Diamond: 1→4 via 2 is short but risky, via 3 is long but safe.
fn diamond_graph() -> EnvGraph {
    let connections = [
        Connection::new(1, 2, 1.0, 0.9),
        Connection::new(2, 4, 1.0, 0.9),
        Connection::new(1, 3, 3.0, 0.99),
        Connection::new(3, 4, 3.0, 0.99),
    ];
    let mut graph = EnvGraph::new(4, OutcomeArity::Three);
    graph.add_connections(&connections).unwrap();
    graph.build_map(None).unwrap();
    graph
}

fn n(id: u32) -> NodeId {
    NodeId(id)
}

mod construction {
    use super::*;

    #[test]
    fn add_connections_records_both_directions() {
        let graph = line_graph(3);
        assert_eq!(graph.connections().len(), 4);
        assert!(graph.connections().contains(&(n(1), n(2))));
        assert!(graph.connections().contains(&(n(2), n(1))));
    }

    #[test]
    fn synthesized_map_is_symmetric_and_normalized() {
        let graph = line_graph(4);
        for (a, b, t) in graph.map().edges() {
            assert!(t.is_normalized(), "{a}->{b} sums to {}", t.outcome_sum());
            assert_eq!(graph.map().get(b, a), Some(t));
        }
    }

    #[test]
    fn distance_only_layout_yields_certain_transitions() {
        let mut graph = EnvGraph::new(2, OutcomeArity::Three);
        graph
            .add_connections(&[Connection { a: n(1), b: n(2), distance: 2.0, success: None }])
            .unwrap();
        graph.build_map(None).unwrap();
        assert_eq!(graph.map().get(n(1), n(2)), Some(&Transition::certain(2.0)));
    }

    #[test]
    fn arity_two_folds_return_into_fail() {
        let three = line_graph(3);
        let mut two = EnvGraph::new(3, OutcomeArity::Two);
        two.add_connections(&[Connection::new(1, 2, 1.0, 0.9), Connection::new(2, 3, 1.0, 0.9)])
            .unwrap();
        two.build_map(Some(three.map())).unwrap();

        let t = two.map().get(n(1), n(2)).unwrap();
        assert_eq!(t.ret, 0.0);
        assert!((t.fail - 0.1).abs() < 1e-9);
        assert!(t.is_normalized());
    }

    #[test]
    fn out_of_range_node_is_rejected() {
        let mut graph = EnvGraph::new(2, OutcomeArity::Three);
        let err = graph.add_connections(&[Connection::new(1, 5, 1.0, 0.9)]);
        assert!(err.is_err());
    }

    #[test]
    fn split_remainder_favors_return() {
        let (ret, fail) = split_remainder(0.85).unwrap();
        assert!(ret >= fail);
        assert!((0.85 + ret + fail - 1.0).abs() < 1e-9);
    }
}

mod search {
    use super::*;

    #[test]
    fn distance_objective_takes_short_route() {
        let graph = diamond_graph();
        let path = graph.shortest_path(n(1), n(4), Objective::MinimizeDistance).unwrap();
        assert_eq!(path.nodes, vec![n(1), n(2), n(4)]);
        assert!((path.length - 2.0).abs() < 1e-9);
        // Secondary metric counts success + return mass per hop.
        assert!((path.probability - 1.0).abs() < 1e-9);
    }

    #[test]
    fn probability_objective_takes_safe_route() {
        let graph = diamond_graph();
        let path = graph.shortest_path(n(1), n(4), Objective::MaximizeProbability).unwrap();
        assert_eq!(path.nodes, vec![n(1), n(3), n(4)]);
        assert!((path.probability - 0.99 * 0.99).abs() < 1e-9);
        assert!((path.length - 6.0).abs() < 1e-9);
    }

    #[test]
    fn start_equals_goal_is_trivial_path() {
        let graph = line_graph(3);
        let path = graph.shortest_path(n(2), n(2), Objective::MinimizeDistance).unwrap();
        assert_eq!(path.nodes, vec![n(2)]);
        assert_eq!(path.length, 0.0);
        assert_eq!(path.probability, 1.0);
        assert!(path.at_end());
    }

    #[test]
    fn unreachable_goal_is_an_error() {
        let mut graph = EnvGraph::new(4, OutcomeArity::Three);
        graph
            .add_connections(&[Connection::new(1, 2, 1.0, 0.9), Connection::new(3, 4, 1.0, 0.9)])
            .unwrap();
        graph.build_map(None).unwrap();
        assert!(graph.shortest_path(n(1), n(4), Objective::MinimizeDistance).is_err());
    }

    #[test]
    fn zero_success_edge_gets_nominal_weight() {
        let mut map = EnvMap::new();
        map.insert(n(1), n(2), Transition { distance: 1.0, success: 0.0, ret: 1.0, fail: 0.0 });
        map.insert(n(2), n(1), Transition { distance: 1.0, success: 0.0, ret: 1.0, fail: 0.0 });
        map.touch(n(2));

        let path = shortest_path(&map, n(1), n(2), Objective::MaximizeProbability).unwrap();
        assert_eq!(path.nodes, vec![n(1), n(2)]);
        assert!((path.probability - BLOCKED_EDGE_NOMINAL).abs() < 1e-9);
    }

    #[test]
    fn rebuild_cumulative_accumulates_hop_distances() {
        let graph = line_graph(4);
        let mut path = graph.shortest_path(n(1), n(4), Objective::MinimizeDistance).unwrap();
        path.rebuild_cumulative(graph.map());
        assert_eq!(path.cumulative, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn path_instance_progress_helpers() {
        let mut path = PathInstance::new(vec![n(1), n(2), n(3)], 2.0, 0.81);
        assert_eq!(path.current(), Some(n(1)));
        assert_eq!(path.next(), Some(n(2)));
        assert_eq!(path.terminal(), Some(n(3)));
        assert!(!path.at_end());

        path.index = 2;
        assert!(path.at_end());
        assert_eq!(path.next(), None);
        assert_eq!(path.remaining(), &[n(3)]);
    }
}

mod heat {
    use super::*;

    #[test]
    fn edges_touching_position_or_next_step_are_blocked() {
        let graph = line_graph(4);
        let heat = graph.heat_map(&[n(2), n(3)], n(2), 0.5, 0.90);

        for blocked in [(n(1), n(2)), (n(2), n(3)), (n(3), n(4))] {
            let t = heat.get(blocked.0, blocked.1).unwrap();
            assert_eq!((t.success, t.ret, t.fail), (0.0, 1.0, 0.0), "edge {blocked:?}");
        }
    }

    #[test]
    fn full_and_partial_scaling_redistribute_to_return_and_fail() {
        let graph = line_graph(7);
        let heat = graph.heat_map(&[n(3), n(4), n(5)], n(3), 0.5, 0.90);

        // 4 is the next step, so 4-5 is blocked despite both endpoints
        // sitting on the path.
        let full = heat.get(n(5), n(4)).unwrap();
        assert_eq!((full.success, full.ret, full.fail), (0.0, 1.0, 0.0));

        // 5-6 has one endpoint on the path and shows partial scaling.
        let partial = heat.get(n(5), n(6)).unwrap();
        assert!((partial.success - 0.81).abs() < 1e-9);
        assert!((partial.ret - 0.16).abs() < 1e-9);
        assert!((partial.fail - 0.03).abs() < 1e-9);
        assert!(partial.is_normalized());

        // Untouched edge keeps base probabilities.
        assert_eq!(heat.get(n(6), n(7)), graph.map().get(n(6), n(7)));
    }

    #[test]
    fn full_scale_edge_clear_of_block_is_halved() {
        let graph = line_graph(8);
        // Position 3, next step 4; edge 5-6 has both endpoints on the path
        // and touches neither blocked node.
        let heat = graph.heat_map(&[n(3), n(4), n(5), n(6)], n(3), 0.5, 0.90);

        let t = heat.get(n(5), n(6)).unwrap();
        assert!((t.success - 0.45).abs() < 1e-9);
        assert!((t.ret - 0.4).abs() < 1e-9);
        assert!((t.fail - 0.15).abs() < 1e-9);
        assert!(t.is_normalized());
    }

    #[test]
    fn idle_entity_blocks_only_around_its_node() {
        let graph = line_graph(5);
        let heat = graph.heat_map(&[n(3)], n(3), 0.5, 0.90);

        let t23 = heat.get(n(2), n(3)).unwrap();
        let t34 = heat.get(n(3), n(4)).unwrap();
        assert_eq!((t23.success, t23.ret), (0.0, 1.0));
        assert_eq!((t34.success, t34.ret), (0.0, 1.0));
        assert_eq!(heat.get(n(1), n(2)), graph.map().get(n(1), n(2)));
    }

    #[test]
    fn base_map_is_untouched_by_heat_mapping() {
        let graph = line_graph(4);
        let before = graph.map().clone();
        let _ = graph.heat_map(&[n(2), n(3)], n(2), 0.5, 0.90);
        assert_eq!(graph.map(), &before);
    }
}

mod layout {
    use super::*;
    use crate::layout::{load_connections_reader, load_safe_nodes_reader};

    #[test]
    fn parses_connections_with_optional_success() {
        let csv = "node_a,node_b,distance,success\n1,2,3.0,0.95\n2,3,2.5,\n";
        let connections = load_connections_reader(csv.as_bytes()).unwrap();
        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].success, Some(0.95));
        assert_eq!(connections[1].success, None);
        assert_eq!(connections[1].a, n(2));
        assert!((connections[1].distance - 2.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_zero_node_label() {
        let csv = "node_a,node_b,distance,success\n0,2,3.0,0.95\n";
        assert!(load_connections_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn parses_safe_nodes() {
        let csv = "node\n13\n14\n20\n24\n";
        let nodes = load_safe_nodes_reader(csv.as_bytes()).unwrap();
        assert_eq!(nodes, vec![n(13), n(14), n(20), n(24)]);
    }
}
