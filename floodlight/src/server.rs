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

//! # Floodlight Server

use crate::types::*;
use crate::{Error, Result};

use isahc::http::{Request, Response};
use isahc::prelude::*;
use isahc::{Body, HttpClient};
use log::*;
use serde_json::Value;
use std::time::Duration;

/// Path of the static flow pusher on Floodlight up to version 1.2. Later versions renamed it to
/// `/wm/staticentrypusher/json`.
pub const DEFAULT_PUSHER_PATH: &str = "/wm/staticflowpusher/json";

/// # Floodlight Server Handle
///
/// Every request is sent exactly once, and is aborted after the configured timeout.
#[derive(Debug, Clone)]
pub struct FloodlightServer {
    address: String,
    pusher_path: String,
    client: HttpClient,
}

impl FloodlightServer {
    /// Create a new instance of a server handle. No request is sent to the controller.
    pub fn new(address: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            address: address.as_ref().trim_end_matches('/').to_string(),
            pusher_path: DEFAULT_PUSHER_PATH.to_string(),
            client,
        })
    }

    /// Use a different path for the static flow pusher.
    pub fn with_pusher_path(mut self, path: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        self.pusher_path =
            if path.starts_with('/') { path.to_string() } else { format!("/{}", path) };
        self
    }

    /// Base address of the controller, without trailing slash
    pub fn address(&self) -> &str {
        self.address.as_ref()
    }

    /// Returns the device directory, as reported by the device manager
    pub fn get_devices(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.request_get("/wm/device/")?)?)
    }

    /// Returns all switches connected to the controller
    pub fn get_switches(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.request_get("/wm/core/controller/switches/json")?)?)
    }

    /// Returns all inter-switch links discovered by the controller
    pub fn get_links(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.request_get("/wm/topology/links/json")?)?)
    }

    /// Returns the flow tables of all switches
    pub fn get_flows(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.request_get("/wm/core/switch/all/flow/json")?)?)
    }

    /// Push a static flow entry. A response with an error code is not treated as an error, but
    /// returned to the caller. Only if the request cannot be sent, an error is returned.
    pub fn push_flow(&self, entry: &StaticFlowEntry) -> Result<PushResponse> {
        let data = serde_json::to_string(entry)?;
        let mut response = self.request_post(&self.pusher_path, data)?;
        Ok(PushResponse { status: response.status().as_u16(), body: response.text()? })
    }

    fn request_get(&self, key: impl AsRef<str>) -> Result<String> {
        let addr = format!("{}{}", self.address, key.as_ref());
        debug!("GET  {}", addr);
        self.handle_response(self.client.get(addr)?)
    }

    fn request_post(&self, key: impl AsRef<str>, data: String) -> Result<Response<Body>> {
        let addr = format!("{}{}", self.address, key.as_ref());
        debug!("POST {} {}", addr, data);
        let request =
            Request::post(addr).header("Content-Type", "application/json").body(data)?;
        Ok(self.client.send(request)?)
    }

    fn handle_response(&self, mut response: Response<Body>) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ResponseError(status.as_u16(), response.text()?));
        }
        Ok(response.text()?)
    }
}
