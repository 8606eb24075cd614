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

#![cfg(test)]

use crate::endpoint::ControlEndpoint;
use crate::installer::FlowDefaults;
use crate::types::FlowRule;

use floodlight::{PushResponse, StaticFlowEntry};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

mod test_scenarios;

/// In-memory controller, recording every rule it receives.
#[derive(Debug, Default)]
pub(crate) struct MockEndpoint {
    pub devices_payload: Value,
    pub links_payload: Value,
    reject: HashSet<String>,
    fail: HashSet<String>,
    offline: bool,
    queries: AtomicUsize,
    installed: Mutex<Vec<StaticFlowEntry>>,
}

impl MockEndpoint {
    pub fn new(devices_payload: Value, links_payload: Value) -> Self {
        Self { devices_payload, links_payload, ..Default::default() }
    }

    /// Three switches in a line, as reported by Floodlight for `mn --topo linear,3`, with `h1` on
    /// port 1 of the first switch, and `h3` on port 1 of the last switch.
    pub fn line() -> Self {
        Self::new(
            json!({"devices": [
                {
                    "entityClass": "DefaultEntityClass",
                    "mac": ["00:00:00:00:00:01"],
                    "ipv4": ["10.0.0.1"],
                    "ipv6": [],
                    "vlan": ["0x0"],
                    "attachmentPoint": [{"switch": dpid(1), "port": "1"}],
                    "lastSeen": 1612345678901u64
                },
                {
                    "entityClass": "DefaultEntityClass",
                    "mac": ["00:00:00:00:00:03"],
                    "ipv4": ["10.0.0.3"],
                    "ipv6": [],
                    "vlan": ["0x0"],
                    "attachmentPoint": [{"switch": dpid(3), "port": "1"}],
                    "lastSeen": 1612345678902u64
                }
            ]}),
            json!([
                {
                    "src-switch": dpid(1),
                    "src-port": 2,
                    "dst-switch": dpid(2),
                    "dst-port": 2,
                    "type": "internal",
                    "direction": "bidirectional",
                    "latency": 0
                },
                {
                    "src-switch": dpid(2),
                    "src-port": 3,
                    "dst-switch": dpid(3),
                    "dst-port": 2,
                    "type": "internal",
                    "direction": "bidirectional",
                    "latency": 0
                }
            ]),
        )
    }

    /// Controller that does not answer any request
    pub fn offline() -> Self {
        Self { offline: true, ..Self::line() }
    }

    /// Reject every rule for `switch` with status 400
    pub fn reject_on(mut self, switch: &str) -> Self {
        self.reject.insert(switch.to_string());
        self
    }

    /// Fail every request for `switch` with a transport error
    pub fn fail_on(mut self, switch: &str) -> Self {
        self.fail.insert(switch.to_string());
        self
    }

    /// All entries that reached the controller, in the order they arrived
    pub fn installed(&self) -> Vec<StaticFlowEntry> {
        self.installed.lock().unwrap().clone()
    }

    /// Number of topology and device queries
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn query(&self, payload: &Value) -> floodlight::Result<Value> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            Err(timeout())
        } else {
            Ok(payload.clone())
        }
    }
}

impl ControlEndpoint for MockEndpoint {
    fn devices(&self) -> floodlight::Result<Value> {
        self.query(&self.devices_payload)
    }

    fn links(&self) -> floodlight::Result<Value> {
        self.query(&self.links_payload)
    }

    fn install(
        &self,
        rule: &FlowRule,
        defaults: &FlowDefaults,
    ) -> floodlight::Result<PushResponse> {
        if self.offline || self.fail.contains(rule.switch.as_str()) {
            return Err(timeout());
        }
        self.installed.lock().unwrap().push(rule.to_entry(defaults));
        if self.reject.contains(rule.switch.as_str()) {
            Ok(PushResponse {
                status: 400,
                body: String::from("{\"status\" : \"Error! Could not parse flow mod\"}"),
            })
        } else {
            Ok(PushResponse {
                status: 200,
                body: String::from("{\"status\" : \"Entry pushed\"}"),
            })
        }
    }
}

/// Datapath id of switch `n`, as Floodlight reports it
pub(crate) fn dpid(n: u8) -> String {
    format!("00:00:00:00:00:00:00:{:02x}", n)
}

fn timeout() -> floodlight::Error {
    floodlight::Error::IoError(io::Error::new(io::ErrorKind::TimedOut, "request timed out"))
}
