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

//! # Port Resolver
//!
//! Computes the ingress and egress port of every switch along a path. The reverse direction is
//! resolved by calling [`resolve_hops`] again on the reversed path, with the host ports swapped.
//! Simply reversing the forward hops would be wrong, since ingress and egress swap their roles.

use crate::graph::SwitchGraph;
use crate::types::{Hop, PortNumber, SwitchId};

/// Resolve the ports of every hop along `path`. The ingress port of the first hop is `src_port`,
/// and the egress port of the last hop is `dst_port` (the ports towards the hosts). All other
/// ports are taken from the first link connecting two consecutive switches, and are `None` if the
/// topology does not report them.
pub fn resolve_hops(
    graph: &SwitchGraph,
    path: &[SwitchId],
    src_port: PortNumber,
    dst_port: PortNumber,
) -> Vec<Hop> {
    let last = path.len().saturating_sub(1);
    path.iter()
        .enumerate()
        .map(|(i, sw)| Hop {
            switch: sw.clone(),
            ingress: if i == 0 { Some(src_port) } else { graph.port_towards(sw, &path[i - 1]) },
            egress: if i == last { Some(dst_port) } else { graph.port_towards(sw, &path[i + 1]) },
        })
        .collect()
}

/// Resolve the reverse direction of `path`, from the destination host back to the source host.
pub fn resolve_reverse_hops(
    graph: &SwitchGraph,
    path: &[SwitchId],
    src_port: PortNumber,
    dst_port: PortNumber,
) -> Vec<Hop> {
    let reversed: Vec<SwitchId> = path.iter().rev().cloned().collect();
    resolve_hops(graph, &reversed, dst_port, src_port)
}
