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

//! # Device Locator
//!
//! Resolves a host name (like `h3`) to the switch and port where the host is attached. The host is
//! looked up in the device directory of the controller by its ordinal number (the trailing number
//! of its name), which must appear in the low-order position of its IPv4 or MAC address. If the
//! directory does not know the host, an [`AttachmentFallback`] may synthesize the attachment point.

use crate::topology::{parse_port, pretty, record_list, switch_id, Aliases};
use crate::types::{AttachmentPoint, AttachmentSource, PortNumber};
use crate::Error;

use lazy_static::lazy_static;
use log::*;
use regex::Regex;
use serde_json::{json, Value};
use std::fmt;

/// Fields wrapping the list of devices in the top-level payload
pub const DEVICE_LIST: Aliases = Aliases(&["devices"]);
/// Fields containing the IPv4 address(es) of a device
pub const DEVICE_IPV4: Aliases = Aliases(&["ipv4", "ipv4Address", "ip", "ipv4Addresses"]);
/// Fields containing the MAC address(es) of a device
pub const DEVICE_MAC: Aliases = Aliases(&["mac", "macAddress", "macs"]);
/// Fields containing the attachment point(s) of a device
pub const DEVICE_ATTACHMENT: Aliases =
    Aliases(&["attachmentPoint", "attachmentPoints", "attachment_point", "attachment"]);
/// Fields of an attachment point containing the switch identifier
pub const ATTACHMENT_SWITCH: Aliases = Aliases(&["switchDPID", "switch", "switchId", "dpid"]);
/// Fields of an attachment point containing the port number
pub const ATTACHMENT_PORT: Aliases = Aliases(&["port", "portNumber", "port_no"]);

lazy_static! {
    static ref ORDINAL_RE: Regex = Regex::new(r"(\d+)$").unwrap();
}

/// Normalize the response of the device directory query to a list of device objects. A list
/// wrapped in [`DEVICE_LIST`] is unwrapped, and a single object becomes a list with one element.
/// Strings in the list are treated as device ids, and other non-object entries are wrapped as
/// `{"raw": x}`.
pub fn normalize_devices(payload: &Value) -> Vec<Value> {
    let records = match (payload, record_list(payload, &DEVICE_LIST)) {
        (_, Some(records)) => records,
        (Value::Object(_), None) => return vec![payload.clone()],
        _ => {
            warn!("Device query returned an unexpected format. Raw content:\n{}", pretty(payload));
            return Vec::new();
        }
    };
    records
        .iter()
        .map(|d| match d {
            Value::Object(_) => d.clone(),
            Value::String(id) => json!({ "id": id }),
            x => json!({ "raw": x }),
        })
        .collect()
}

/// Returns the ordinal number of a host, which is the trailing decimal number of its name.
pub fn host_ordinal(host: impl AsRef<str>) -> Option<u32> {
    ORDINAL_RE.captures(host.as_ref())?.get(1)?.as_str().parse().ok()
}

/// Find the device of a host in the directory. A device matches if any of its IPv4 addresses
/// ends with `.<ordinal>`, or if the last octet of any of its MAC addresses equals the ordinal.
pub fn find_device<'a>(devices: &'a [Value], host: impl AsRef<str>) -> Option<&'a Value> {
    let ordinal = host_ordinal(host.as_ref())?;
    let ip_suffix = format!(".{}", ordinal);
    let mac_octet = format!("{:02x}", ordinal);

    devices.iter().find(|dev| {
        let dev = match dev.as_object() {
            Some(d) => d,
            None => return false,
        };
        let ip_match = DEVICE_IPV4
            .probe(dev)
            .map(|ips| string_values(ips).any(|ip| ip.trim().ends_with(&ip_suffix)))
            .unwrap_or(false);
        let mac_match = || {
            DEVICE_MAC
                .probe(dev)
                .map(|macs| {
                    string_values(macs).any(|mac| {
                        mac.trim()
                            .rsplit(|c: char| c == ':' || c == '-')
                            .next()
                            .map(|octet| octet.eq_ignore_ascii_case(&mac_octet))
                            .unwrap_or(false)
                    })
                })
                .unwrap_or(false)
        };
        ip_match || mac_match()
    })
}

/// Extract the attachment point of a device. If the device reports a list of attachment points,
/// the first one is used. Both, the switch and the port must be present.
pub fn attachment_of(device: &Value) -> Option<AttachmentPoint> {
    let point = match DEVICE_ATTACHMENT.probe(device.as_object()?)? {
        Value::Array(points) => points.first()?,
        p => p,
    }
    .as_object()?;
    let switch = ATTACHMENT_SWITCH.probe(point).and_then(switch_id)?;
    let port = ATTACHMENT_PORT.probe(point).and_then(parse_port)?;
    Some(AttachmentPoint { switch, port, source: AttachmentSource::Directory })
}

/// Strategy to synthesize an attachment point, when the device directory does not know the host.
pub trait AttachmentFallback: fmt::Debug + Send + Sync {
    /// Name of the strategy, used for logging
    fn name(&self) -> &'static str;

    /// Returns the attachment point of the host, if the strategy can determine it.
    fn attachment(&self, host: &str) -> Option<AttachmentPoint>;
}

/// # Ordinal-to-datapath heuristic
///
/// Assumes a lab layout where host `hN` is the only host on switch `N`, connected to port 1 (this
/// is the case for a Mininet `linear` topology). The switch identifier is built as
/// `00:00:00:00:00:00:00:NN`, where `NN` is the ordinal in *decimal*, padded to two digits.
///
/// This heuristic is only correct for this specific layout, and only for hosts 1 to 9 if the
/// controller reports the identifiers in hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdinalDatapathHeuristic {
    /// Port on which every host is attached
    pub port: PortNumber,
}

impl Default for OrdinalDatapathHeuristic {
    fn default() -> Self {
        Self { port: 1 }
    }
}

impl AttachmentFallback for OrdinalDatapathHeuristic {
    fn name(&self) -> &'static str {
        "ordinal-to-datapath heuristic"
    }

    fn attachment(&self, host: &str) -> Option<AttachmentPoint> {
        let n = host_ordinal(host)?;
        Some(AttachmentPoint {
            switch: format!("00:00:00:00:00:00:00:{:02}", n).into(),
            port: self.port,
            source: AttachmentSource::Fallback,
        })
    }
}

/// Fallback which never resolves anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoFallback;

impl AttachmentFallback for NoFallback {
    fn name(&self) -> &'static str {
        "no fallback"
    }

    fn attachment(&self, _host: &str) -> Option<AttachmentPoint> {
        None
    }
}

/// # Device Locator
///
/// Resolves hosts using the device directory first, and the configured fallback second.
#[derive(Debug)]
pub struct DeviceLocator {
    fallback: Box<dyn AttachmentFallback>,
}

impl Default for DeviceLocator {
    fn default() -> Self {
        Self::new(OrdinalDatapathHeuristic::default())
    }
}

impl DeviceLocator {
    /// Create a locator with the given fallback strategy
    pub fn new(fallback: impl AttachmentFallback + 'static) -> Self {
        Self { fallback: Box::new(fallback) }
    }

    /// Create a locator that only uses the device directory
    pub fn without_fallback() -> Self {
        Self::new(NoFallback)
    }

    /// Resolve the attachment point of `host`, using the normalized device list.
    pub fn locate(&self, devices: &[Value], host: &str) -> Result<AttachmentPoint, Error> {
        if let Some(ap) = find_device(devices, host).and_then(attachment_of) {
            debug!("Found {} in the device directory: {}", host, ap);
            return Ok(ap);
        }

        info!("Could not find the attachment of {} in the device directory", host);
        match self.fallback.attachment(host) {
            Some(ap) => {
                warn!(
                    "Inferred the attachment of {} using the {}: {}",
                    host,
                    self.fallback.name(),
                    ap
                );
                Ok(ap)
            }
            None => Err(Error::AttachmentUnresolved(host.to_string())),
        }
    }
}

/// Iterate over all strings in a value which is either a single string or a list.
fn string_values(value: &Value) -> Box<dyn Iterator<Item = &str> + '_> {
    match value {
        Value::String(s) => Box::new(std::iter::once(s.as_str())),
        Value::Array(a) => Box::new(a.iter().filter_map(Value::as_str)),
        _ => Box::new(std::iter::empty()),
    }
}
