use canvas_store::graph::GraphStore;
use canvas_store::model::{CanvasEdge, CanvasNode};
use proptest::prelude::*;

const IDS: [&str; 5] = ["A", "B", "C", "D", "E"];

#[derive(Clone, Debug)]
enum GraphOp {
    AddNode(usize),
    AddEdge(usize, usize),
    DeleteNode(usize),
    DeleteEdge(usize, usize),
    SelectNodes(Vec<usize>),
    SelectEdges(Vec<(usize, usize)>),
    ClearSelection,
}

fn edge_id(source: usize, target: usize) -> String {
    format!("{}-{}", IDS[source], IDS[target])
}

fn graph_op_strategy() -> impl Strategy<Value = GraphOp> {
    let id = 0..IDS.len();
    prop_oneof![
        3 => id.clone().prop_map(GraphOp::AddNode),
        3 => (id.clone(), id.clone()).prop_map(|(s, t)| GraphOp::AddEdge(s, t)),
        2 => id.clone().prop_map(GraphOp::DeleteNode),
        1 => (id.clone(), id.clone()).prop_map(|(s, t)| GraphOp::DeleteEdge(s, t)),
        2 => prop::collection::vec(id.clone(), 0..4).prop_map(GraphOp::SelectNodes),
        2 => prop::collection::vec((id.clone(), id.clone()), 0..4).prop_map(GraphOp::SelectEdges),
        1 => Just(GraphOp::ClearSelection),
    ]
}

fn apply(graph: &mut GraphStore, op: &GraphOp) {
    match op {
        GraphOp::AddNode(n) => {
            let _ = graph.add_node(CanvasNode::new(IDS[*n], "imageGen"));
        }
        GraphOp::AddEdge(s, t) => {
            let _ = graph.add_edge(CanvasEdge::new(edge_id(*s, *t), IDS[*s], IDS[*t]));
        }
        GraphOp::DeleteNode(n) => {
            graph.delete_node(IDS[*n]);
        }
        GraphOp::DeleteEdge(s, t) => {
            graph.delete_edge(&edge_id(*s, *t));
        }
        GraphOp::SelectNodes(ids) => {
            graph.set_selected_nodes(ids.iter().map(|n| IDS[*n].to_string()));
        }
        GraphOp::SelectEdges(pairs) => {
            graph.set_selected_edges(pairs.iter().map(|(s, t)| edge_id(*s, *t)));
        }
        GraphOp::ClearSelection => graph.clear_selection(),
    }
}

proptest! {
    #[test]
    fn edges_never_dangle_and_selection_stays_present(
        ops in prop::collection::vec(graph_op_strategy(), 0..150)
    ) {
        let mut graph = GraphStore::new();

        for op in &ops {
            apply(&mut graph, op);

            prop_assert!(graph.validate().is_empty(), "dangling after {:?}", op);
            for id in graph.selection().selected_nodes() {
                prop_assert!(graph.node(id).is_some(), "stale node '{}' after {:?}", id, op);
            }
            for id in graph.selection().selected_edges() {
                prop_assert!(graph.edge(id).is_some(), "stale edge '{}' after {:?}", id, op);
            }
        }
    }

    #[test]
    fn deleted_node_leaves_no_incident_edges(
        ops in prop::collection::vec(graph_op_strategy(), 0..80),
        victim in 0..IDS.len()
    ) {
        let mut graph = GraphStore::new();
        for op in &ops {
            apply(&mut graph, op);
        }
        let incident = graph.edges_of(IDS[victim]).count();
        let edges_before = graph.edges().len();

        let removal = graph.delete_node(IDS[victim]);

        prop_assert_eq!(graph.edges_of(IDS[victim]).count(), 0);
        prop_assert!(!graph.selection().is_node_selected(IDS[victim]));
        match removal {
            Some(removal) => {
                prop_assert_eq!(removal.edges.len(), incident);
                prop_assert_eq!(graph.edges().len(), edges_before - incident);
            }
            None => {
                prop_assert_eq!(incident, 0);
            }
        }
    }
}
