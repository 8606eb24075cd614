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

//! # Floodlight REST API
//!
//! This is a very simple crate to interact with the REST interface of a Floodlight controller. It
//! reads the device directory and the topology links, and pushes static flow entries.
//!
//! The controller reports devices and links in a schema that changed between releases. Therefore,
//! all queries return the raw [`serde_json::Value`], and it is up to the caller to normalize them.
//!
//! ```
//! use floodlight::{FloodlightServer, StaticFlowEntry};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = FloodlightServer::new("http://127.0.0.1:8080", Duration::from_secs(5))?;
//!
//!     // read the topology
//!     let links = match server.get_links() {
//!         Ok(l) => l,
//!         Err(e) => {
//!             eprintln!("Cannot reach the controller: {}", e);
//! # return Ok(());
//!             return Err(e.into());
//!         }
//!     };
//!     println!("{}", links);
//!
//!     // forward everything from port 1 to port 2 on the first switch
//!     let switch = "00:00:00:00:00:00:00:01";
//!     let entry = StaticFlowEntry::new(switch, "doc_example", 32768, Some(1), 2);
//!     let response = server.push_flow(&entry)?;
//!     println!("{}: {}", response.status, response.body);
//!     Ok(())
//! }
//! ```
#![deny(missing_docs)]

mod server;
mod types;
pub use server::{FloodlightServer, DEFAULT_PUSHER_PATH};
pub use types::*;

use thiserror::Error;

/// # Floodlight Error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error during handling of the HTTP request
    #[allow(clippy::upper_case_acronyms)]
    #[error("HTTP Error: {0}")]
    HTTPError(#[from] isahc::Error),
    /// The HTTP request could not be assembled
    #[error("Cannot build the HTTP request: {0}")]
    HttpBuildError(#[from] isahc::http::Error),
    /// Cannot deserialize the response
    #[error("Cannot parse JSON response: {0}")]
    JsonError(#[from] serde_json::error::Error),
    /// IO Error
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// HTTP Response Error
    #[error("HTTP Response Error: {0}. Message:\n{1}")]
    ResponseError(u16, String),
}

/// Floodlight Result type
pub type Result<T> = core::result::Result<T, Error>;
