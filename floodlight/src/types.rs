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

//! # Floodlight Types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static flow entry, as understood by the static flow pusher. The pusher expects every value as
/// a string, including the numbers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StaticFlowEntry {
    /// Datapath ID of the switch on which the entry is installed
    pub switch: String,
    /// Name of the entry, unique per controller
    pub name: String,
    /// Cookie
    pub cookie: String,
    /// Priority of the entry
    pub priority: String,
    /// Whether the entry is active
    pub active: String,
    /// Match on the ingress port (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_port: Option<String>,
    /// Action list, e.g. `output=2`
    pub actions: String,
}

impl StaticFlowEntry {
    /// Create a new active entry with cookie `0`, which outputs all packets to `out_port`.
    pub fn new(
        switch: impl Into<String>,
        name: impl Into<String>,
        priority: u32,
        in_port: Option<u32>,
        out_port: u32,
    ) -> Self {
        Self {
            switch: switch.into(),
            name: name.into(),
            cookie: String::from("0"),
            priority: priority.to_string(),
            active: String::from("true"),
            in_port: in_port.map(|p| p.to_string()),
            actions: format!("output={}", out_port),
        }
    }

    /// Change the cookie of the entry
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = cookie.into();
        self
    }

    /// Change whether the entry is active
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active.to_string();
        self
    }
}

impl fmt::Display for StaticFlowEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.in_port.as_ref() {
            Some(in_port) => write!(
                f,
                "{} @ {}: in_port={} -> {}",
                self.name, self.switch, in_port, self.actions
            ),
            None => write!(f, "{} @ {}: * -> {}", self.name, self.switch, self.actions),
        }
    }
}

/// Raw answer of the static flow pusher. The pusher answers with a status code and a short
/// message, like `{"status" : "Entry pushed"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushResponse {
    /// HTTP status code
    pub status: u16,
    /// Body of the response
    pub body: String,
}

impl PushResponse {
    /// Returns true if the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the message of the pusher, if the body contains the `status` field. Otherwise, the
    /// trimmed body is returned.
    pub fn message(&self) -> String {
        #[derive(Deserialize)]
        struct Status {
            status: String,
        }
        match serde_json::from_str::<Status>(&self.body) {
            Ok(s) => s.status,
            Err(_) => self.body.trim().to_string(),
        }
    }
}
