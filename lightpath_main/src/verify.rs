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

//! Checks on the controller after installation. Nothing in here is fatal.

use floodlight::FloodlightServer;
use lightpath::RunReport;

use log::*;
use serde_json::Value;

/// Log the number of connected switches, and the number of flow entries on every switch of the
/// path.
pub fn verify_installation(server: &FloodlightServer, report: &RunReport) {
    match server.get_switches() {
        Ok(switches) => {
            info!("{} switches are connected to the controller", count_switches(&switches))
        }
        Err(e) => warn!("Could not query the switches: {}", e),
    }

    let flows = match server.get_flows() {
        Ok(flows) => count_flows(&flows),
        Err(e) => {
            warn!("Could not query the flow tables: {}", e);
            return;
        }
    };

    for switch in report.path.iter() {
        match flows.iter().find(|(s, _)| s == switch.as_str()) {
            Some((_, n)) => info!("Switch {} has {} flow entries", switch, n),
            None => warn!("Switch {} does not appear in the flow table dump", switch),
        }
    }
}

/// Number of switches in the response of the switch query
fn count_switches(switches: &Value) -> usize {
    match switches {
        Value::Array(a) => a.len(),
        Value::Object(o) => o.len(),
        _ => 0,
    }
}

/// Number of flow entries per switch in the flow table dump. Depending on the release, every
/// switch maps either to a list of flows, or to an object containing that list under `flows`.
fn count_flows(dump: &Value) -> Vec<(String, usize)> {
    let tables = match dump.as_object() {
        Some(t) => t,
        None => return Vec::new(),
    };
    tables
        .iter()
        .map(|(switch, table)| {
            let n = match table {
                Value::Array(flows) => flows.len(),
                Value::Object(o) => o.get("flows").and_then(Value::as_array).map_or(0, Vec::len),
                _ => 0,
            };
            (switch.clone(), n)
        })
        .collect()
}
