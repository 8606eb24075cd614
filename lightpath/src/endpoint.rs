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

//! # Control Endpoint
//!
//! Interface to the network controller. The pipeline only needs three operations, which are
//! implemented for [`FloodlightServer`].

use crate::installer::FlowDefaults;
use crate::types::FlowRule;

use floodlight::{FloodlightServer, PushResponse, StaticFlowEntry};
use serde_json::Value;

/// Interface to the controller, providing the device directory and the topology, and accepting
/// flow rules. Every call is a single request; implementations must not retry on their own.
pub trait ControlEndpoint: Sync {
    /// Query the device directory
    fn devices(&self) -> floodlight::Result<Value>;

    /// Query the inter-switch links
    fn links(&self) -> floodlight::Result<Value>;

    /// Install a single flow rule. A rejection by the controller is an `Ok` response with an
    /// error status. `Err` is only returned if no response was received.
    fn install(&self, rule: &FlowRule, defaults: &FlowDefaults) -> floodlight::Result<PushResponse>;
}

impl ControlEndpoint for FloodlightServer {
    fn devices(&self) -> floodlight::Result<Value> {
        self.get_devices()
    }

    fn links(&self) -> floodlight::Result<Value> {
        self.get_links()
    }

    fn install(
        &self,
        rule: &FlowRule,
        defaults: &FlowDefaults,
    ) -> floodlight::Result<PushResponse> {
        self.push_flow(&rule.to_entry(defaults))
    }
}

impl FlowRule {
    /// Build the static flow entry for this rule
    pub fn to_entry(&self, defaults: &FlowDefaults) -> StaticFlowEntry {
        StaticFlowEntry::new(
            self.switch.as_str(),
            self.name.as_str(),
            self.priority,
            self.in_port,
            self.out_port,
        )
        .with_cookie(defaults.cookie.as_str())
        .with_active(defaults.active)
    }
}
