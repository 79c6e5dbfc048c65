use crate::schedule::Schedule;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Directed graph of `after` references. Edges run from the predecessor to
/// the task that follows it. Node indices follow schedule scan order.
pub struct DependencyGraph<'a> {
    pub graph: DiGraph<&'a str, ()>,
    pub id_to_index: HashMap<&'a str, NodeIndex>,
    predecessor: HashMap<&'a str, &'a str>,
}

impl<'a> DependencyGraph<'a> {
    pub fn build(schedule: &'a Schedule) -> Self {
        let mut graph: DiGraph<&'a str, ()> = DiGraph::new();
        let mut id_to_index: HashMap<&'a str, NodeIndex> = HashMap::new();
        let mut predecessor: HashMap<&'a str, &'a str> = HashMap::new();

        // Add nodes first; the first task with a given id owns it
        for task in schedule.tasks() {
            let id = task.id.as_str();
            if !id_to_index.contains_key(id) {
                let node_ix = graph.add_node(id);
                id_to_index.insert(id, node_ix);
            }
        }

        // Add edges: after -> task. Unknown references are skipped
        for task in schedule.tasks() {
            if let Some(dependency) = task.dependency() {
                if let (Some(&u), Some(&v)) = (
                    id_to_index.get(dependency),
                    id_to_index.get(task.id.as_str()),
                ) {
                    graph.add_edge(u, v, ());
                    predecessor.entry(task.id.as_str()).or_insert(dependency);
                }
            }
        }

        Self {
            graph,
            id_to_index,
            predecessor,
        }
    }

    /// Task ids ordered so that every task comes after its predecessor, or
    /// `None` when the references contain a cycle.
    pub fn dependency_order(&self) -> Option<Vec<&'a str>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|ix| self.graph[ix]).collect())
    }

    /// Ids of the tasks declared `after` the given one, in scan order.
    pub fn dependents(&self, task_id: &str) -> Vec<&'a str> {
        let Some(&node) = self.id_to_index.get(task_id) else {
            return Vec::new();
        };
        let mut dependents: Vec<NodeIndex> = self.graph.neighbors(node).collect();
        dependents.sort();
        dependents.into_iter().map(|ix| self.graph[ix]).collect()
    }

    /// The first cycle in scan order, as a path of ids starting and ending at
    /// the same task, each one declared `after` the next.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let start = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&ix| self.graph.contains_edge(ix, ix))
            })
            .filter_map(|component| component.into_iter().min())
            .min()?;

        let first = self.graph[start];
        let mut path = vec![first.to_string()];
        let mut current = first;
        for _ in 0..self.graph.node_count() {
            let next = *self.predecessor.get(current)?;
            path.push(next.to_string());
            if next == first {
                return Some(path);
            }
            current = next;
        }
        None
    }
}
