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

use super::{dpid, MockEndpoint};
use crate::types::{AttachmentSource, Direction, Hop, InstallOutcome, SwitchId};
use crate::{run, Error, RunConfig};

use maplit::hashmap;
use serde_json::json;
use std::collections::HashMap;

fn sw(n: u8) -> SwitchId {
    SwitchId::from(dpid(n))
}

fn hop(n: u8, ingress: u32, egress: u32) -> Hop {
    Hop { switch: sw(n), ingress: Some(ingress), egress: Some(egress) }
}

#[test]
fn line_topology() {
    let _ = pretty_env_logger::try_init();
    let endpoint = MockEndpoint::line();
    let report = run(&endpoint, &RunConfig::new("h1", "h3")).unwrap();

    assert_eq!(report.src.switch, sw(1));
    assert_eq!(report.src.port, 1);
    assert_eq!(report.src.source, AttachmentSource::Directory);
    assert_eq!(report.dst.switch, sw(3));
    assert_eq!(report.path, vec![sw(1), sw(2), sw(3)]);
    assert_eq!(report.forward, vec![hop(1, 1, 2), hop(2, 2, 3), hop(3, 2, 1)]);
    assert!(report.all_accepted());

    let installed = endpoint.installed();
    assert_eq!(installed.len(), 3);
    let by_name: HashMap<&str, (&str, Option<&str>, &str)> = installed
        .iter()
        .map(|e| (e.name.as_str(), (e.switch.as_str(), e.in_port.as_deref(), e.actions.as_str())))
        .collect();
    let (s1, s2, s3) = (dpid(1), dpid(2), dpid(3));
    assert_eq!(
        by_name,
        hashmap! {
            "fwd_h1_to_h3_1" => (s1.as_str(), Some("1"), "output=2"),
            "fwd_h1_to_h3_2" => (s2.as_str(), Some("2"), "output=3"),
            "fwd_h1_to_h3_3" => (s3.as_str(), Some("2"), "output=1"),
        }
    );
    for entry in installed.iter() {
        assert_eq!(entry.priority, "32768");
        assert_eq!(entry.cookie, "0");
        assert_eq!(entry.active, "true");
    }
}

#[test]
fn bidirectional() {
    let endpoint = MockEndpoint::line();
    let mut config = RunConfig::new("h1", "h3");
    config.bidirectional = true;
    let report = run(&endpoint, &config).unwrap();

    assert_eq!(
        report.reverse,
        Some(vec![hop(3, 1, 2), hop(2, 3, 2), hop(1, 2, 1)])
    );
    assert_eq!(report.rules.len(), 6);
    let reverse: Vec<&str> = report
        .rules
        .iter()
        .filter(|r| r.direction == Direction::Reverse)
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(reverse, vec!["rev_h3_to_h1_1", "rev_h3_to_h1_2", "rev_h3_to_h1_3"]);
    assert_eq!(endpoint.installed().len(), 6);
    assert_eq!(report.num_accepted(), 6);
}

#[test]
fn hosts_on_same_switch() {
    let endpoint = MockEndpoint::new(
        json!([
            {"ipv4": ["10.0.0.1"], "attachmentPoint": [{"switchDPID": dpid(1), "port": 1}]},
            {"ipv4": ["10.0.0.2"], "attachmentPoint": [{"switchDPID": dpid(1), "port": 2}]},
        ]),
        json!([{"src-switch": dpid(1), "src-port": 3, "dst-switch": dpid(2), "dst-port": 3}]),
    );
    let report = run(&endpoint, &RunConfig::new("h1", "h2")).unwrap();
    assert_eq!(report.path, vec![sw(1)]);
    assert_eq!(report.forward, vec![hop(1, 1, 2)]);

    let installed = endpoint.installed();
    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].name, "fwd_h1_to_h2_1");
    assert_eq!(installed[0].in_port.as_deref(), Some("1"));
    assert_eq!(installed[0].actions, "output=2");
}

#[test]
fn empty_topology() {
    for links in vec![json!([]), json!({"links": []}), json!({"error": "not ready"})] {
        let mut endpoint = MockEndpoint::line();
        endpoint.links_payload = links;
        match run(&endpoint, &RunConfig::new("h1", "h3")) {
            Err(Error::EmptyTopology { raw }) => assert!(!raw.is_empty()),
            r => panic!("expected an empty topology, got {:?}", r),
        }
        assert!(endpoint.installed().is_empty());
    }
}

#[test]
fn empty_topology_same_switch() {
    // the topology is checked even if no link is needed
    let endpoint = MockEndpoint::new(
        json!([
            {"ipv4": "10.0.0.1", "attachmentPoint": {"switch": dpid(1), "port": 1}},
            {"ipv4": "10.0.0.2", "attachmentPoint": {"switch": dpid(1), "port": 2}},
        ]),
        json!([{"src-switch": null, "dst-switch": dpid(2)}]),
    );
    match run(&endpoint, &RunConfig::new("h1", "h2")) {
        Err(Error::EmptyTopology { raw }) => assert!(raw.contains("dst-switch")),
        r => panic!("expected an empty topology, got {:?}", r),
    }
    assert!(endpoint.installed().is_empty());
}

#[test]
fn disconnected() {
    let mut endpoint = MockEndpoint::line();
    endpoint.links_payload = json!([
        {"src-switch": dpid(1), "src-port": 2, "dst-switch": dpid(2), "dst-port": 2},
        {"src-switch": dpid(3), "src-port": 3, "dst-switch": dpid(4), "dst-port": 2},
    ]);
    match run(&endpoint, &RunConfig::new("h1", "h3")) {
        Err(Error::PathNotFound { src, dst, known }) => {
            assert_eq!(src, sw(1));
            assert_eq!(dst, sw(3));
            assert_eq!(known, vec![sw(1), sw(2), sw(3), sw(4)]);
        }
        r => panic!("expected no path, got {:?}", r),
    }
    assert!(endpoint.installed().is_empty());
}

#[test]
fn unknown_host() {
    let endpoint = MockEndpoint::line();
    let mut config = RunConfig::new("h1", "h7");
    config.fallback = false;
    match run(&endpoint, &config) {
        Err(Error::AttachmentUnresolved(host)) => assert_eq!(host, "h7"),
        r => panic!("expected an unresolved host, got {:?}", r),
    }
    // the topology is not even queried
    assert_eq!(endpoint.queries(), 1);
    assert!(endpoint.installed().is_empty());
}

#[test]
fn fallback_attachment() {
    // h2 is not in the directory, and is assumed to be on port 1 of switch 2
    let endpoint = MockEndpoint::line();
    let report = run(&endpoint, &RunConfig::new("h1", "h2")).unwrap();
    assert_eq!(report.dst.source, AttachmentSource::Fallback);
    assert_eq!(report.path, vec![sw(1), sw(2)]);
    assert_eq!(report.forward, vec![hop(1, 1, 2), hop(2, 2, 1)]);
}

#[test]
fn controller_offline() {
    let endpoint = MockEndpoint::offline();
    match run(&endpoint, &RunConfig::new("h1", "h3")) {
        Err(Error::ControllerError(_)) => {}
        r => panic!("expected a controller error, got {:?}", r),
    }
    assert!(endpoint.installed().is_empty());
}

#[test]
fn dry_run() {
    let endpoint = MockEndpoint::line();
    let mut config = RunConfig::new("h1", "h3");
    config.dry_run = true;
    config.bidirectional = true;
    let report = run(&endpoint, &config).unwrap();
    assert_eq!(report.rules.len(), 6);
    assert!(report.installations.is_empty());
    assert!(!report.all_accepted());
    assert!(endpoint.installed().is_empty());
}

#[test]
fn rejected_rules_are_not_fatal() {
    let endpoint = MockEndpoint::line().reject_on(&dpid(1)).fail_on(&dpid(3));
    let report = run(&endpoint, &RunConfig::new("h1", "h3")).unwrap();
    assert_eq!(report.installations.len(), 3);
    match &report.installations[0].outcome {
        InstallOutcome::Rejected { status, detail } => {
            assert_eq!(*status, 400);
            assert!(detail.starts_with("Error!"));
        }
        o => panic!("expected a rejection, got {:?}", o),
    }
    assert!(report.installations[1].outcome.is_accepted());
    assert!(matches!(report.installations[2].outcome, InstallOutcome::Failed(_)));
    // the failed request never reached the controller
    assert_eq!(endpoint.installed().len(), 2);
}

#[test]
fn custom_flow_defaults() {
    let endpoint = MockEndpoint::line();
    let mut config = RunConfig::new("h1", "h3");
    config.flow.priority = 100;
    config.flow.cookie = String::from("42");
    config.flow.active = false;
    run(&endpoint, &config).unwrap();
    for entry in endpoint.installed() {
        assert_eq!(entry.priority, "100");
        assert_eq!(entry.cookie, "42");
        assert_eq!(entry.active, "false");
    }
}

#[test]
fn tie_break_follows_link_order() {
    // square: 1 - 2 - 4 and 1 - 3 - 4
    let square = |first: u8, second: u8| {
        json!([
            {"src-switch": dpid(1), "src-port": first, "dst-switch": dpid(first), "dst-port": 1},
            {"src-switch": dpid(1), "src-port": second, "dst-switch": dpid(second), "dst-port": 1},
            {"src-switch": dpid(2), "src-port": 2, "dst-switch": dpid(4), "dst-port": 2},
            {"src-switch": dpid(3), "src-port": 2, "dst-switch": dpid(4), "dst-port": 3},
        ])
    };
    let devices = json!([
        {"ipv4": ["10.0.0.1"], "attachmentPoint": [{"switch": dpid(1), "port": 1}]},
        {"ipv4": ["10.0.0.4"], "attachmentPoint": [{"switch": dpid(4), "port": 1}]},
    ]);

    let endpoint = MockEndpoint::new(devices.clone(), square(2, 3));
    let report = run(&endpoint, &RunConfig::new("h1", "h4")).unwrap();
    assert_eq!(report.path, vec![sw(1), sw(2), sw(4)]);

    let endpoint = MockEndpoint::new(devices, square(3, 2));
    let report = run(&endpoint, &RunConfig::new("h1", "h4")).unwrap();
    assert_eq!(report.path, vec![sw(1), sw(3), sw(4)]);
}
