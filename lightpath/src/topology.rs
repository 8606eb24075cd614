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

//! # Topology Normalizer
//!
//! Different controller releases report links with different field names. Some wrap the switch
//! identifier in a nested object, and some report the port numbers as strings. This module turns
//! all of them into [`Link`]s. Normalization is best-effort: records which cannot be used are
//! dropped with a diagnostic, they never abort the run.
//!
//! All field names are stored in [`Aliases`] tables, which are probed in order. Supporting a new
//! controller release only requires extending a table.

use crate::types::{Link, PortNumber, SwitchId};

use log::*;
use serde_json::{Map, Value};
use std::convert::TryFrom;

/// Ordered list of field names that may contain the same information. The first name present in
/// a record wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aliases(pub &'static [&'static str]);

/// Fields wrapping the list of links in the top-level payload
pub const LINK_LIST: Aliases = Aliases(&["links"]);
/// Fields containing the source switch of a link
pub const LINK_SRC_SWITCH: Aliases =
    Aliases(&["src", "src-switch", "srcSwitch", "source", "src_switch", "src_switch_dpid"]);
/// Fields containing the destination switch of a link
pub const LINK_DST_SWITCH: Aliases = Aliases(&[
    "dst",
    "dst-switch",
    "dstSwitch",
    "destination",
    "dst_switch",
    "dst_switch_dpid",
]);
/// Fields containing the source port of a link
pub const LINK_SRC_PORT: Aliases =
    Aliases(&["src-port", "src_port", "srcPort", "port1", "srcPortNumber"]);
/// Fields containing the destination port of a link
pub const LINK_DST_PORT: Aliases =
    Aliases(&["dst-port", "dst_port", "dstPort", "port2", "dstPortNumber"]);
/// Fields of a nested switch object containing the switch identifier
pub const NESTED_SWITCH_ID: Aliases = Aliases(&["switchDPID", "dpid", "id"]);

impl Aliases {
    /// Returns the value of the first alias which is present in the record. Values that are
    /// `null`, or empty strings, arrays or objects count as absent.
    pub fn probe<'a>(&self, record: &'a Map<String, Value>) -> Option<&'a Value> {
        self.0.iter().filter_map(|k| record.get(*k)).find(|v| is_present(v))
    }

    /// Returns the first value which can be parsed as a port number. Values which are present but
    /// cannot be parsed are skipped.
    pub fn probe_port(&self, record: &Map<String, Value>) -> Option<PortNumber> {
        self.0.iter().filter_map(|k| record.get(*k)).find_map(parse_port)
    }

    /// Returns the switch identifier of the first present alias. If the value is a nested object,
    /// the identifier is extracted from it using [`NESTED_SWITCH_ID`].
    pub fn probe_switch(&self, record: &Map<String, Value>) -> Option<SwitchId> {
        match self.probe(record)? {
            Value::Object(nested) => NESTED_SWITCH_ID.probe(nested).and_then(switch_id),
            v => switch_id(v),
        }
    }
}

/// Normalize the response of the topology link query. The payload is either a list of link
/// records, or an object containing such a list (see [`LINK_LIST`]). Any other shape results in
/// an empty list.
pub fn normalize_links(payload: &Value) -> Vec<Link> {
    let records = match record_list(payload, &LINK_LIST) {
        Some(r) => r,
        None => {
            warn!(
                "Topology query returned an unexpected format (not a list). Raw content:\n{}",
                pretty(payload)
            );
            return Vec::new();
        }
    };

    let links: Vec<Link> = records.iter().filter_map(normalize_link).collect();
    debug!("Normalized {} of {} link records", links.len(), records.len());
    links
}

/// Normalize a single link record. Returns `None` if the record is not an object, or if either
/// switch identifier is missing.
pub fn normalize_link(record: &Value) -> Option<Link> {
    let entry = match record.as_object() {
        Some(e) => e,
        None => {
            debug!("Skipping non-object topology entry: {}", record);
            return None;
        }
    };

    let src = LINK_SRC_SWITCH.probe_switch(entry);
    let dst = LINK_DST_SWITCH.probe_switch(entry);
    match (src, dst) {
        (Some(src), Some(dst)) => Some(Link::new(
            src,
            LINK_SRC_PORT.probe_port(entry),
            dst,
            LINK_DST_PORT.probe_port(entry),
        )),
        _ => {
            debug!("Skipping link entry due to missing src/dst. Entry:\n{}", pretty(record));
            None
        }
    }
}

/// Extract the list of records from the payload. Returns `None` if the payload is neither a list
/// nor an object containing a list under one of the `wrappers`.
pub(crate) fn record_list<'a>(payload: &'a Value, wrappers: &Aliases) -> Option<&'a Vec<Value>> {
    match payload {
        Value::Array(records) => Some(records),
        Value::Object(o) => wrappers.0.iter().filter_map(|k| o.get(*k)).find_map(Value::as_array),
        _ => None,
    }
}

/// Parses a port number from either a JSON number or a numeric string.
pub(crate) fn parse_port(value: &Value) -> Option<PortNumber> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(p) => PortNumber::try_from(p).ok(),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= PortNumber::MAX as f64)
                .map(|f| f as PortNumber),
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Renders a switch identifier without changing it. Strings are kept verbatim, numbers are
/// rendered as their JSON text.
pub(crate) fn switch_id(value: &Value) -> Option<SwitchId> {
    match value {
        Value::String(s) if !s.is_empty() => Some(SwitchId(s.clone())),
        Value::Number(n) => Some(SwitchId(n.to_string())),
        _ => None,
    }
}

pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => true,
    }
}

pub(crate) fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
