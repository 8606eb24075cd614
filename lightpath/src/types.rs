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

//! Module containing all type definitions

use serde::Serialize;
use std::fmt;

/// Switch identifier, exactly as reported by the controller (usually the colon-hex datapath id,
/// like `00:00:00:00:00:00:00:01`). Two identifiers are equal only if the strings are equal.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct SwitchId(pub String);

impl SwitchId {
    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SwitchId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SwitchId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Switch-local port number. An unknown port is always represented as `None`.
pub type PortNumber = u32;

/// One side of an inter-switch link
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize)]
pub struct LinkEnd {
    /// Switch on this side of the link
    pub switch: SwitchId,
    /// Port on `switch`, if known
    pub port: Option<PortNumber>,
}

/// Normalized inter-switch link. The link itself is undirected; `src` and `dst` only reflect the
/// naming used by the controller.
#[derive(PartialEq, Eq, Hash, Debug, Clone, Serialize)]
pub struct Link {
    /// Side reported as source
    pub src: LinkEnd,
    /// Side reported as destination
    pub dst: LinkEnd,
}

impl Link {
    /// Create a new link between `(src, src_port)` and `(dst, dst_port)`.
    pub fn new(
        src: impl Into<SwitchId>,
        src_port: Option<PortNumber>,
        dst: impl Into<SwitchId>,
        dst_port: Option<PortNumber>,
    ) -> Self {
        Self {
            src: LinkEnd { switch: src.into(), port: src_port },
            dst: LinkEnd { switch: dst.into(), port: dst_port },
        }
    }
}

/// How an attachment point was obtained
#[derive(PartialEq, Eq, Debug, Clone, Copy, Serialize)]
pub enum AttachmentSource {
    /// Reported by the device directory of the controller
    Directory,
    /// Synthesized by a fallback heuristic
    Fallback,
}

/// Location where a host is connected to the switch fabric
#[derive(PartialEq, Eq, Debug, Clone, Serialize)]
pub struct AttachmentPoint {
    /// Switch to which the host is attached
    pub switch: SwitchId,
    /// Port of `switch` towards the host
    pub port: PortNumber,
    /// Where the information comes from
    pub source: AttachmentSource,
}

impl AttachmentPoint {
    /// Create an attachment point reported by the device directory
    pub fn new(switch: impl Into<SwitchId>, port: PortNumber) -> Self {
        Self { switch: switch.into(), port, source: AttachmentSource::Directory }
    }
}

impl fmt::Display for AttachmentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "switch {}, port {}", self.switch, self.port)
    }
}

/// Ingress and egress port of one switch along a path
#[derive(PartialEq, Eq, Debug, Clone, Serialize)]
pub struct Hop {
    /// Switch of this hop
    pub switch: SwitchId,
    /// Port on which traffic enters the switch
    pub ingress: Option<PortNumber>,
    /// Port on which traffic leaves the switch
    pub egress: Option<PortNumber>,
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ({}, {})", self.switch, fmt_port(self.ingress), fmt_port(self.egress))
    }
}

/// Direction of the traffic, for which a rule is installed
#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy, Serialize)]
pub enum Direction {
    /// From the source host to the destination host
    Forward,
    /// From the destination host back to the source host
    Reverse,
}

impl Direction {
    /// Short prefix used in rule names
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Forward => "fwd",
            Self::Reverse => "rev",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Reverse => f.write_str("reverse"),
        }
    }
}

/// Flow rule to be installed on a single switch: match on the (optional) ingress port, and
/// output on the egress port.
#[derive(PartialEq, Eq, Debug, Clone, Serialize)]
pub struct FlowRule {
    /// Switch on which the rule is installed
    pub switch: SwitchId,
    /// Name of the rule, encoding direction and hop index
    pub name: String,
    /// Priority of the rule
    pub priority: u32,
    /// Match on the ingress port. If `None`, the rule matches all ports.
    pub in_port: Option<PortNumber>,
    /// Output port
    pub out_port: PortNumber,
    /// Direction this rule belongs to
    pub direction: Direction,
    /// Index of the hop along the path (starting at 1)
    pub hop: usize,
}

impl fmt::Display for FlowRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}: in_port={}, out={}",
            self.name,
            self.switch,
            fmt_port(self.in_port),
            self.out_port
        )
    }
}

/// Outcome of a single rule installation
#[derive(PartialEq, Eq, Debug, Clone, Serialize)]
pub enum InstallOutcome {
    /// The control endpoint accepted the rule
    Accepted {
        /// HTTP status code
        status: u16,
        /// Message of the control endpoint
        detail: String,
    },
    /// The control endpoint answered, but rejected the rule
    Rejected {
        /// HTTP status code
        status: u16,
        /// Message of the control endpoint
        detail: String,
    },
    /// The request could not be completed (connection error, timeout, ...)
    Failed(String),
}

impl InstallOutcome {
    /// Returns true if the rule was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { status, detail } => write!(f, "accepted ({}): {}", status, detail),
            Self::Rejected { status, detail } => write!(f, "rejected ({}): {}", status, detail),
            Self::Failed(e) => write!(f, "failed: {}", e),
        }
    }
}

/// Rule together with the outcome of its installation
#[derive(PartialEq, Eq, Debug, Clone, Serialize)]
pub struct Installation {
    /// The installed rule
    pub rule: FlowRule,
    /// Outcome of the request
    pub outcome: InstallOutcome,
}

pub(crate) fn fmt_port(port: Option<PortNumber>) -> String {
    port.map(|p| p.to_string()).unwrap_or_else(|| "None".to_string())
}
