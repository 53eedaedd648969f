//! Prerequisite graph of a project's parts.
//!
//! Edges run from a prerequisite to the part that lists it in `after`. Node
//! indices follow declaration order, which is also the tie-breaker whenever
//! several parts could go next.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};

use crate::error::DependencyError;
use crate::part::PartDescriptor;

/// Dependency graph over part names.
#[derive(Debug, Clone)]
pub struct PartGraph {
  graph: DiGraph<String, ()>,
  nodes: HashMap<String, NodeIndex>,
}

impl PartGraph {
  /// Build and validate the graph.
  ///
  /// # Errors
  ///
  /// `UnknownPrerequisite` if an `after` entry names no declared part, and
  /// `Cycle` if any part transitively depends on itself.
  pub fn new(parts: &[PartDescriptor]) -> Result<Self, DependencyError> {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    for part in parts {
      let idx = graph.add_node(part.name.clone());
      nodes.insert(part.name.clone(), idx);
    }

    for part in parts {
      let dependent = nodes[&part.name];
      for prerequisite in &part.after {
        let Some(&dep) = nodes.get(prerequisite) else {
          return Err(DependencyError::UnknownPrerequisite {
            part: part.name.clone(),
            prerequisite: prerequisite.clone(),
          });
        };
        graph.update_edge(dep, dependent, ());
      }
    }

    let dag = Self { graph, nodes };
    dag.verify_acyclic()?;
    Ok(dag)
  }

  fn verify_acyclic(&self) -> Result<(), DependencyError> {
    for mut component in tarjan_scc(&self.graph) {
      let is_cycle = component.len() > 1 || self.graph.contains_edge(component[0], component[0]);
      if is_cycle {
        component.sort();
        let mut parts: Vec<String> = component.iter().map(|&idx| self.graph[idx].clone()).collect();
        parts.push(parts[0].clone());
        return Err(DependencyError::Cycle { parts });
      }
    }
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.graph.node_count()
  }

  pub fn is_empty(&self) -> bool {
    self.graph.node_count() == 0
  }

  pub fn contains(&self, name: &str) -> bool {
    self.nodes.contains_key(name)
  }

  /// Every part, prerequisites first, ties broken by declaration order.
  pub fn order(&self) -> Vec<&str> {
    let mut in_degree: Vec<usize> = self
      .graph
      .node_indices()
      .map(|idx| self.graph.neighbors_directed(idx, Direction::Incoming).count())
      .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
      .iter()
      .enumerate()
      .filter(|&(_, &degree)| degree == 0)
      .map(|(i, _)| Reverse(i))
      .collect();

    let mut order = Vec::with_capacity(self.len());
    while let Some(Reverse(i)) = ready.pop() {
      let idx = NodeIndex::new(i);
      order.push(self.graph[idx].as_str());
      for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
        let degree = &mut in_degree[dependent.index()];
        *degree -= 1;
        if *degree == 0 {
          ready.push(Reverse(dependent.index()));
        }
      }
    }
    order
  }

  /// Sort `names` the way [`order`](Self::order) would.
  pub fn sorted<'a>(&'a self, names: &[&str]) -> Vec<&'a str> {
    self.order().into_iter().filter(|name| names.contains(name)).collect()
  }

  /// Everything `name` depends on, directly or not, in declaration order.
  pub fn prerequisites(&self, name: &str) -> Vec<&str> {
    self.reachable(name, true)
  }

  /// Everything depending on `name`, directly or not, in declaration order.
  pub fn dependents(&self, name: &str) -> Vec<&str> {
    self.reachable(name, false)
  }

  fn reachable(&self, name: &str, upstream: bool) -> Vec<&str> {
    let Some(&start) = self.nodes.get(name) else {
      return Vec::new();
    };

    let mut found = Vec::new();
    if upstream {
      let reversed = Reversed(&self.graph);
      let mut dfs = Dfs::new(reversed, start);
      while let Some(idx) = dfs.next(reversed) {
        found.push(idx);
      }
    } else {
      let mut dfs = Dfs::new(&self.graph, start);
      while let Some(idx) = dfs.next(&self.graph) {
        found.push(idx);
      }
    }

    found.retain(|&idx| idx != start);
    found.sort();
    found.into_iter().map(|idx| self.graph[idx].as_str()).collect()
  }
}
