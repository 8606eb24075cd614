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

//! # Run
//!
//! Drives the whole pipeline against a [`ControlEndpoint`]. All fatal errors are raised before
//! the first rule is sent to the controller.

use crate::endpoint::ControlEndpoint;
use crate::graph::SwitchGraph;
use crate::installer::{build_rules, FlowDefaults, FlowInstaller};
use crate::locator::{normalize_devices, DeviceLocator};
use crate::ports::{resolve_hops, resolve_reverse_hops};
use crate::topology::{normalize_links, pretty};
use crate::types::{AttachmentPoint, Direction, FlowRule, Hop, Installation, SwitchId};
use crate::Error;

use log::*;
use serde::Serialize;
use serde_json::Value;

/// Configuration of a single run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Source host, like `h1`
    pub src_host: String,
    /// Destination host, like `h3`
    pub dst_host: String,
    /// Also install the rules from the destination back to the source
    pub bidirectional: bool,
    /// Compute and log the rules, but do not install them
    pub dry_run: bool,
    /// Values shared by all rules
    pub flow: FlowDefaults,
    /// Installer used to push the rules
    pub installer: FlowInstaller,
    /// Use the ordinal-to-datapath heuristic if a host is missing in the device directory
    pub fallback: bool,
}

impl RunConfig {
    /// Create a unidirectional configuration with default values
    pub fn new(src_host: impl Into<String>, dst_host: impl Into<String>) -> Self {
        Self {
            src_host: src_host.into(),
            dst_host: dst_host.into(),
            bidirectional: false,
            dry_run: false,
            flow: FlowDefaults::default(),
            installer: FlowInstaller::default(),
            fallback: true,
        }
    }

    /// Returns the device locator for this configuration
    pub fn locator(&self) -> DeviceLocator {
        if self.fallback {
            DeviceLocator::default()
        } else {
            DeviceLocator::without_fallback()
        }
    }
}

/// Result of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Attachment point of the source host
    pub src: AttachmentPoint,
    /// Attachment point of the destination host
    pub dst: AttachmentPoint,
    /// Switches from the source to the destination host
    pub path: Vec<SwitchId>,
    /// Ports along the path from the source to the destination
    pub forward: Vec<Hop>,
    /// Ports along the path from the destination back to the source
    pub reverse: Option<Vec<Hop>>,
    /// All rules, forward rules first
    pub rules: Vec<FlowRule>,
    /// Outcome of every rule. Empty if the rules were not installed.
    pub installations: Vec<Installation>,
}

impl RunReport {
    /// Number of rules accepted by the controller
    pub fn num_accepted(&self) -> usize {
        self.installations.iter().filter(|i| i.outcome.is_accepted()).count()
    }

    /// Number of rules which were rejected or could not be sent
    pub fn num_failed(&self) -> usize {
        self.installations.len() - self.num_accepted()
    }

    /// Returns true if every rule was installed successfully
    pub fn all_accepted(&self) -> bool {
        self.installations.len() == self.rules.len() && self.num_failed() == 0
    }
}

/// Compute the path between both hosts and install the rules. Returns an error if either host
/// cannot be located, if the topology is empty, or if both switches are disconnected. In these
/// cases, no rule is sent to the controller. Rules rejected by the controller are reported in
/// [`RunReport::installations`].
pub fn run<E>(endpoint: &E, config: &RunConfig) -> Result<RunReport, Error>
where
    E: ControlEndpoint + ?Sized,
{
    let devices = endpoint.devices()?;
    let (src, dst) = locate_hosts(&devices, config)?;

    let links = endpoint.links()?;
    let mut report = route(&links, src, dst, config)?;

    if config.dry_run {
        info!("Dry run: {} rules are not installed", report.rules.len());
        report.rules.iter().for_each(|r| info!("{}", r));
        return Ok(report);
    }

    info!("Installing {} rules", report.rules.len());
    report.installations = config.installer.install(endpoint, &report.rules, &config.flow);
    Ok(report)
}

/// Compute the path and the rules from already queried payloads, without contacting the
/// controller. The returned report contains no installations.
pub fn plan(devices: &Value, links: &Value, config: &RunConfig) -> Result<RunReport, Error> {
    let (src, dst) = locate_hosts(devices, config)?;
    route(links, src, dst, config)
}

/// Find the attachment points of both hosts.
fn locate_hosts(
    devices: &Value,
    config: &RunConfig,
) -> Result<(AttachmentPoint, AttachmentPoint), Error> {
    let devices = normalize_devices(devices);
    debug!("Device directory contains {} entries", devices.len());
    let locator = config.locator();
    let src = locator.locate(&devices, &config.src_host)?;
    let dst = locator.locate(&devices, &config.dst_host)?;
    info!("{} is attached to {}", config.src_host, src);
    info!("{} is attached to {}", config.dst_host, dst);
    Ok((src, dst))
}

/// Build the graph, compute the path and resolve the rules of both directions.
fn route(
    links: &Value,
    src: AttachmentPoint,
    dst: AttachmentPoint,
    config: &RunConfig,
) -> Result<RunReport, Error> {
    let normalized = normalize_links(links);
    if normalized.is_empty() {
        return Err(Error::EmptyTopology { raw: pretty(links) });
    }

    let graph = SwitchGraph::from_links(&normalized);
    info!(
        "Topology contains {} switches and {} links",
        graph.num_switches(),
        graph.num_links()
    );
    for ap in [&src, &dst].iter() {
        if !graph.contains(&ap.switch) {
            warn!("Switch {} is not part of the topology", ap.switch);
        }
    }

    let path = graph.shortest_path(&src.switch, &dst.switch)?;
    info!(
        "Path from {} to {}: {}",
        config.src_host,
        config.dst_host,
        path.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" -> ")
    );

    let forward = resolve_hops(&graph, &path, src.port, dst.port);
    let mut rules = build_rules(
        &forward,
        Direction::Forward,
        &config.src_host,
        &config.dst_host,
        dst.port,
        &config.flow,
    );

    let reverse = if config.bidirectional {
        let hops = resolve_reverse_hops(&graph, &path, src.port, dst.port);
        rules.extend(build_rules(
            &hops,
            Direction::Reverse,
            &config.dst_host,
            &config.src_host,
            src.port,
            &config.flow,
        ));
        Some(hops)
    } else {
        None
    };

    Ok(RunReport { src, dst, path, forward, reverse, rules, installations: Vec::new() })
}
