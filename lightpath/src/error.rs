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

//! Module containing all error types

use crate::types::SwitchId;
use thiserror::Error;

/// Main error type. Every variant aborts the run before any rule is installed. Malformed records
/// and failed rule installations are not errors; they are reported as diagnostics and outcomes.
#[derive(Debug, Error)]
pub enum Error {
    /// Error propagated from the controller while querying its state
    #[error("Controller Error: {0}")]
    ControllerError(#[from] floodlight::Error),
    /// The attachment point of a host cannot be determined
    #[error("Cannot determine the attachment point of host {0}")]
    AttachmentUnresolved(String),
    /// The topology contains no usable link
    #[error("Topology contains no usable link entries. Raw response:\n{raw}")]
    EmptyTopology {
        /// Raw response of the topology query
        raw: String,
    },
    /// There exists no path between both switches
    #[error("No path from switch {src} to switch {dst} found. Known switches: {known:?}")]
    PathNotFound {
        /// Switch of the source host
        src: SwitchId,
        /// Switch of the destination host
        dst: SwitchId,
        /// All switches present in the topology
        known: Vec<SwitchId>,
    },
}
