// Lightpath: Explicit Path Installation on SDN Controllers
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Switch Graph
//!
//! Undirected adjacency structure of the switches, built from normalized links, and the
//! breadth-first path search on it.

use crate::types::{Link, PortNumber, SwitchId};
use crate::Error;

use log::*;
use petgraph::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};

/// Ports of an undirected link. `a` is the port on the edge source (as inserted into the graph),
/// and `b` the port on the edge target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LinkPorts {
    a: Option<PortNumber>,
    b: Option<PortNumber>,
}

/// Graph type used to store the switches
type LinkGraph = Graph<SwitchId, LinkPorts, Undirected, u32>;
/// Neighbor node, port on the local switch and port on the neighbor
type Neighbor = (NodeIndex<u32>, Option<PortNumber>, Option<PortNumber>);

/// One entry in the adjacency of a switch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Adjacency {
    /// Neighboring switch
    pub neighbor: SwitchId,
    /// Port on the switch itself, towards the neighbor
    pub local_port: Option<PortNumber>,
    /// Port on the neighbor, towards the switch
    pub neighbor_port: Option<PortNumber>,
}

/// # Switch Graph
///
/// Every link is stored once, as an undirected edge carrying the ports of both sides. Therefore,
/// the adjacency is always symmetric: if `(B, p, q)` is in the adjacency of `A`, then `(A, q, p)`
/// is in the adjacency of `B`. The adjacency of a switch is ordered by the position of the link
/// in the list from which the graph was built.
///
/// The graph cannot be changed after it is built.
#[derive(Debug, Clone)]
pub struct SwitchGraph {
    g: LinkGraph,
    lut: HashMap<SwitchId, NodeIndex<u32>>,
}

impl SwitchGraph {
    /// Build the graph from a list of links. Parallel links are kept.
    pub fn from_links<'a>(links: impl IntoIterator<Item = &'a Link>) -> Self {
        let mut g = LinkGraph::default();
        let mut lut: HashMap<SwitchId, NodeIndex<u32>> = HashMap::new();
        for link in links {
            let a = *lut
                .entry(link.src.switch.clone())
                .or_insert_with(|| g.add_node(link.src.switch.clone()));
            let b = *lut
                .entry(link.dst.switch.clone())
                .or_insert_with(|| g.add_node(link.dst.switch.clone()));
            g.add_edge(a, b, LinkPorts { a: link.src.port, b: link.dst.port });
        }
        trace!("Built switch graph with {} switches and {} links", g.node_count(), g.edge_count());
        Self { g, lut }
    }

    /// Returns all switches that appear in any link, in the order in which they first appeared.
    pub fn switches(&self) -> Vec<SwitchId> {
        self.g.node_weights().cloned().collect()
    }

    /// Returns the number of switches
    pub fn num_switches(&self) -> usize {
        self.g.node_count()
    }

    /// Returns the number of links
    pub fn num_links(&self) -> usize {
        self.g.edge_count()
    }

    /// Returns true if the switch appears in any link
    pub fn contains(&self, switch: &SwitchId) -> bool {
        self.lut.contains_key(switch)
    }

    /// Returns the adjacency of a switch, ordered by link insertion. Unknown switches have no
    /// neighbors.
    pub fn adjacency(&self, switch: &SwitchId) -> Vec<Adjacency> {
        match self.lut.get(switch) {
            Some(idx) => {
                self.adjacent(*idx).into_iter().map(|(n, l, r)| self.entry(n, l, r)).collect()
            }
            None => Vec::new(),
        }
    }

    /// Returns the local port of the first link from `switch` towards `neighbor`. Returns `None` if
    /// both are not adjacent, or if the port of that link is unknown.
    pub fn port_towards(&self, switch: &SwitchId, neighbor: &SwitchId) -> Option<PortNumber> {
        self.adjacency(switch).into_iter().find(|adj| &adj.neighbor == neighbor)?.local_port
    }

    /// # Shortest path
    ///
    /// Computes a path with the minimal number of hops from `src` to `dst`, using breadth-first
    /// search. Neighbors are expanded in the order of the adjacency, so among several shortest
    /// paths, the first one discovered in link insertion order is returned.
    ///
    /// If `src == dst`, the path is `[src]`, no matter if the switch appears in the graph or not.
    pub fn shortest_path(&self, src: &SwitchId, dst: &SwitchId) -> Result<Vec<SwitchId>, Error> {
        if src == dst {
            return Ok(vec![src.clone()]);
        }

        let not_found = || Error::PathNotFound {
            src: src.clone(),
            dst: dst.clone(),
            known: self.switches(),
        };
        let source = *self.lut.get(src).ok_or_else(not_found)?;
        let target = *self.lut.get(dst).ok_or_else(not_found)?;

        let mut visited: HashSet<NodeIndex<u32>> = HashSet::new();
        let mut parent: HashMap<NodeIndex<u32>, NodeIndex<u32>> = HashMap::new();
        let mut queue: VecDeque<NodeIndex<u32>> = VecDeque::new();
        visited.insert(source);
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            for (nbr, _, _) in self.adjacent(node) {
                if !visited.insert(nbr) {
                    continue;
                }
                parent.insert(nbr, node);
                if nbr == target {
                    let path = self.trace_back(&parent, source, target);
                    debug!(
                        "Found a path with {} hops: {}",
                        path.len(),
                        path.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" -> ")
                    );
                    return Ok(path);
                }
                queue.push_back(nbr);
            }
        }

        Err(not_found())
    }

    /// Returns `(neighbor, local port, neighbor port)` of all links of `node`, ordered by the edge
    /// index. A link from a switch to itself appears twice, once for each direction.
    fn adjacent(&self, node: NodeIndex<u32>) -> Vec<Neighbor> {
        let mut edges: Vec<EdgeIndex<u32>> = self.g.edges(node).map(|e| e.id()).collect();
        edges.sort();
        edges.dedup();
        let mut result = Vec::with_capacity(edges.len());
        for e in edges {
            let (a, b) = match self.g.edge_endpoints(e) {
                Some(ends) => ends,
                None => continue,
            };
            let ports = self.g[e];
            if a == node {
                result.push((b, ports.a, ports.b));
            }
            if b == node {
                result.push((a, ports.b, ports.a));
            }
        }
        result
    }

    fn entry(
        &self,
        neighbor: NodeIndex<u32>,
        local_port: Option<PortNumber>,
        neighbor_port: Option<PortNumber>,
    ) -> Adjacency {
        Adjacency { neighbor: self.g[neighbor].clone(), local_port, neighbor_port }
    }

    fn trace_back(
        &self,
        parent: &HashMap<NodeIndex<u32>, NodeIndex<u32>>,
        source: NodeIndex<u32>,
        target: NodeIndex<u32>,
    ) -> Vec<SwitchId> {
        let mut path = vec![self.g[target].clone()];
        let mut current = target;
        while current != source {
            current = match parent.get(&current) {
                Some(p) => *p,
                None => break,
            };
            path.push(self.g[current].clone());
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn s(id: &str) -> SwitchId {
        SwitchId::from(id)
    }

    /// ```text
    /// s1 --- s2 --- s3
    ///  |             |
    ///  s4 --------- s5 --- s6
    /// ```
    fn ring() -> SwitchGraph {
        SwitchGraph::from_links(&[
            Link::new("s1", Some(2), "s2", Some(1)),
            Link::new("s2", Some(2), "s3", Some(1)),
            Link::new("s1", Some(3), "s4", Some(1)),
            Link::new("s4", Some(2), "s5", Some(1)),
            Link::new("s5", Some(2), "s3", Some(3)),
            Link::new("s5", Some(3), "s6", Some(1)),
        ])
    }

    #[test]
    fn adjacency_order_and_ports() {
        let g = ring();
        assert_eq!(
            g.adjacency(&s("s1")),
            vec![
                Adjacency { neighbor: s("s2"), local_port: Some(2), neighbor_port: Some(1) },
                Adjacency { neighbor: s("s4"), local_port: Some(3), neighbor_port: Some(1) },
            ]
        );
        assert_eq!(
            g.adjacency(&s("s5")),
            vec![
                Adjacency { neighbor: s("s4"), local_port: Some(1), neighbor_port: Some(2) },
                Adjacency { neighbor: s("s3"), local_port: Some(2), neighbor_port: Some(3) },
                Adjacency { neighbor: s("s6"), local_port: Some(3), neighbor_port: Some(1) },
            ]
        );
        assert!(g.adjacency(&s("unknown")).is_empty());
        assert_eq!(g.switches(), vec![s("s1"), s("s2"), s("s3"), s("s4"), s("s5"), s("s6")]);
        assert_eq!(g.num_links(), 6);
    }

    #[test]
    fn port_towards() {
        let g = ring();
        assert_eq!(g.port_towards(&s("s3"), &s("s5")), Some(3));
        assert_eq!(g.port_towards(&s("s5"), &s("s3")), Some(2));
        assert_eq!(g.port_towards(&s("s1"), &s("s6")), None);
    }

    #[test]
    fn shortest_paths() {
        let g = ring();
        assert_eq!(g.shortest_path(&s("s1"), &s("s3")).unwrap(), vec![s("s1"), s("s2"), s("s3")]);
        assert_eq!(
            g.shortest_path(&s("s1"), &s("s6")).unwrap(),
            vec![s("s1"), s("s4"), s("s5"), s("s6")]
        );
        assert_eq!(g.shortest_path(&s("s6"), &s("s2")).unwrap().len(), 4);
    }

    #[test]
    fn same_switch() {
        let g = ring();
        assert_eq!(g.shortest_path(&s("s4"), &s("s4")).unwrap(), vec![s("s4")]);
        let empty = SwitchGraph::from_links(&[]);
        assert_eq!(empty.shortest_path(&s("x"), &s("x")).unwrap(), vec![s("x")]);
    }

    #[test]
    fn no_path() {
        let g = SwitchGraph::from_links(&[
            Link::new("s1", Some(1), "s2", Some(1)),
            Link::new("s3", Some(1), "s4", Some(1)),
        ]);
        match g.shortest_path(&s("s1"), &s("s4")) {
            Err(Error::PathNotFound { src, dst, known }) => {
                assert_eq!(src, s("s1"));
                assert_eq!(dst, s("s4"));
                assert_eq!(known, vec![s("s1"), s("s2"), s("s3"), s("s4")]);
            }
            r => panic!("Unexpected result: {:?}", r),
        }
        assert!(matches!(
            g.shortest_path(&s("s1"), &s("s9")),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn self_loops_and_parallel_links() {
        let g = SwitchGraph::from_links(&[
            Link::new("s1", Some(5), "s1", Some(6)),
            Link::new("s1", Some(1), "s2", Some(1)),
            Link::new("s2", Some(2), "s1", Some(2)),
        ]);
        assert_eq!(
            g.adjacency(&s("s1")),
            vec![
                Adjacency { neighbor: s("s1"), local_port: Some(5), neighbor_port: Some(6) },
                Adjacency { neighbor: s("s1"), local_port: Some(6), neighbor_port: Some(5) },
                Adjacency { neighbor: s("s2"), local_port: Some(1), neighbor_port: Some(1) },
                Adjacency { neighbor: s("s2"), local_port: Some(2), neighbor_port: Some(2) },
            ]
        );
        assert_eq!(g.port_towards(&s("s2"), &s("s1")), Some(1));
        assert_eq!(g.shortest_path(&s("s1"), &s("s2")).unwrap(), vec![s("s1"), s("s2")]);
    }
}
