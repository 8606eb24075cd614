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

#![deny(missing_docs)]

//! # Lightpath: Explicit Path Installation on SDN Controllers
//!
//! This library computes a path between two hosts of a software-defined network, and installs
//! explicit forwarding rules on every switch along that path, using the REST interface of the
//! [Floodlight](http://www.projectfloodlight.org/floodlight/) controller.
//!
//! ## Structure
//!
//! The pipeline consists of the following stages. Each stage only consumes the output of the
//! previous one.
//!
//! - **[`Topology`](topology)**: Normalizes the link records reported by the controller into
//!   [`Link`](types::Link)s. Different controller releases use different field names, which are
//!   stored in [`Aliases`](topology::Aliases) tables.
//!
//! - **[`Locator`](locator)**: Resolves a host name (like `h1`) to its
//!   [`AttachmentPoint`](types::AttachmentPoint), using the device directory of the controller.
//!   If the host is unknown, an [`AttachmentFallback`](locator::AttachmentFallback) may
//!   synthesize it.
//!
//! - **[`Graph`](graph)**: Undirected adjacency of the switches, and the breadth-first search for
//!   the shortest path.
//!
//! - **[`Ports`](ports)**: Resolves the ingress and egress port of every [`Hop`](types::Hop)
//!   along the path, in both directions.
//!
//! - **[`Installer`](installer)**: Turns the hops into [`FlowRule`](types::FlowRule)s, and pushes
//!   them to the controller using a pool of worker threads.
//!
//! The controller is accessed through the [`ControlEndpoint`] trait, which is implemented for
//! [`floodlight::FloodlightServer`].
//!
//! ## Usage
//!
//! ```no_run
//! use lightpath::{run, Error, RunConfig};
//! use floodlight::FloodlightServer;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Error> {
//!     let server = FloodlightServer::new("http://127.0.0.1:8080", Duration::from_secs(5))?;
//!
//!     let mut config = RunConfig::new("h1", "h3");
//!     config.bidirectional = true;
//!
//!     let report = run(&server, &config)?;
//!     for installation in report.installations.iter() {
//!         println!("{}: {}", installation.rule, installation.outcome);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod endpoint;
mod error;
pub mod graph;
pub mod installer;
pub mod locator;
pub mod ports;
mod run;
pub mod topology;
pub mod types;

pub use endpoint::ControlEndpoint;
pub use error::Error;
pub use run::{plan, run, RunConfig, RunReport};

// test modules
mod test;
