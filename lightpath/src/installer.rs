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

//! # Flow Installer
//!
//! Turns resolved hops into [`FlowRule`]s, and installs them using a pool of worker threads. Each
//! rule is an independent request: a failing rule neither aborts the other requests, nor rolls
//! back rules that were already installed. Requests are never retried.

use crate::endpoint::ControlEndpoint;
use crate::types::{Direction, FlowRule, Hop, InstallOutcome, Installation, PortNumber};

use log::*;
use std::collections::VecDeque;
use std::sync::mpsc::channel;
use std::sync::Mutex;
use std::thread;

/// Default priority of the installed rules
pub const DEFAULT_PRIORITY: u32 = 32768;

/// Values shared by all rules of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDefaults {
    /// Priority of every rule
    pub priority: u32,
    /// Cookie of every rule
    pub cookie: String,
    /// Whether the rules are installed as active
    pub active: bool,
}

impl Default for FlowDefaults {
    fn default() -> Self {
        Self { priority: DEFAULT_PRIORITY, cookie: String::from("0"), active: true }
    }
}

/// Build one rule for every hop. The rule of hop `i` (starting at 1) is named
/// `<fwd|rev>_<from_host>_to_<to_host>_<i>`. If the egress port of a hop is unknown,
/// `fallback_egress` (the port towards the destination host of this direction) is used instead.
pub fn build_rules(
    hops: &[Hop],
    direction: Direction,
    from_host: &str,
    to_host: &str,
    fallback_egress: PortNumber,
    defaults: &FlowDefaults,
) -> Vec<FlowRule> {
    hops.iter()
        .enumerate()
        .map(|(i, hop)| {
            let out_port = match hop.egress {
                Some(p) => p,
                None => {
                    warn!(
                        "Egress port of {} is unknown ({} direction). Using port {} instead.",
                        hop.switch, direction, fallback_egress
                    );
                    fallback_egress
                }
            };
            FlowRule {
                switch: hop.switch.clone(),
                name: format!("{}_{}_to_{}_{}", direction.prefix(), from_host, to_host, i + 1),
                priority: defaults.priority,
                in_port: hop.ingress,
                out_port,
                direction,
                hop: i + 1,
            }
        })
        .collect()
}

/// # Flow Installer
///
/// Installs rules in parallel, using at most `workers` threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowInstaller {
    workers: usize,
}

impl Default for FlowInstaller {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FlowInstaller {
    /// Create a new installer. If `workers` is `None`, one worker per CPU is used.
    pub fn new(workers: Option<usize>) -> Self {
        Self { workers: workers.unwrap_or_else(num_cpus::get).max(1) }
    }

    /// Maximum number of concurrent requests
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Install all rules, and return the outcome of every rule, in the same order as `rules`.
    pub fn install<E>(
        &self,
        endpoint: &E,
        rules: &[FlowRule],
        defaults: &FlowDefaults,
    ) -> Vec<Installation>
    where
        E: ControlEndpoint + ?Sized,
    {
        if rules.is_empty() {
            return Vec::new();
        }
        let n_workers = self.workers.min(rules.len());
        debug!("Installing {} rules using {} workers", rules.len(), n_workers);

        let jobs: Mutex<VecDeque<(usize, &FlowRule)>> =
            Mutex::new(rules.iter().enumerate().collect());
        let (sender, receiver) = channel::<(usize, InstallOutcome)>();

        thread::scope(|s| {
            for _ in 0..n_workers {
                let tx = sender.clone();
                let jobs = &jobs;
                s.spawn(move || loop {
                    let job = match jobs.lock() {
                        Ok(mut queue) => queue.pop_front(),
                        Err(_) => None,
                    };
                    let (idx, rule) = match job {
                        Some(j) => j,
                        None => break,
                    };
                    let outcome = install_rule(endpoint, rule, defaults);
                    if tx.send((idx, outcome)).is_err() {
                        break;
                    }
                });
            }
        });
        drop(sender);

        let mut outcomes: Vec<Option<InstallOutcome>> = vec![None; rules.len()];
        for (idx, outcome) in receiver {
            outcomes[idx] = Some(outcome);
        }

        rules
            .iter()
            .zip(outcomes)
            .map(|(rule, outcome)| Installation {
                rule: rule.clone(),
                outcome: outcome.unwrap_or_else(|| {
                    InstallOutcome::Failed(String::from("request was not sent"))
                }),
            })
            .collect()
    }
}

/// Send a single rule to the endpoint, and log the outcome.
fn install_rule<E>(endpoint: &E, rule: &FlowRule, defaults: &FlowDefaults) -> InstallOutcome
where
    E: ControlEndpoint + ?Sized,
{
    let outcome = match endpoint.install(rule, defaults) {
        Ok(response) if response.is_success() => {
            InstallOutcome::Accepted { status: response.status, detail: response.message() }
        }
        Ok(response) => {
            InstallOutcome::Rejected { status: response.status, detail: response.message() }
        }
        Err(e) => InstallOutcome::Failed(e.to_string()),
    };
    if outcome.is_accepted() {
        info!("Pushed {}: {}", rule, outcome);
    } else {
        warn!("Could not push {}: {}", rule, outcome);
    }
    outcome
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::MockEndpoint;
    use crate::types::SwitchId;

    fn hops() -> Vec<Hop> {
        vec![
            Hop { switch: SwitchId::from("s1"), ingress: Some(1), egress: Some(2) },
            Hop { switch: SwitchId::from("s2"), ingress: Some(3), egress: None },
            Hop { switch: SwitchId::from("s3"), ingress: None, egress: Some(1) },
        ]
    }

    fn forward_rules() -> Vec<FlowRule> {
        build_rules(&hops(), Direction::Forward, "h1", "h3", 9, &FlowDefaults::default())
    }

    #[test]
    fn rule_names_and_ports() {
        let rules = forward_rules();
        assert_eq!(
            rules.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["fwd_h1_to_h3_1", "fwd_h1_to_h3_2", "fwd_h1_to_h3_3"]
        );
        assert_eq!(rules[0].in_port, Some(1));
        assert_eq!(rules[0].out_port, 2);
        // unknown egress falls back to the host port
        assert_eq!(rules[1].out_port, 9);
        // unknown ingress does not match on the port
        assert_eq!(rules[2].in_port, None);
        assert!(rules.iter().all(|r| r.priority == DEFAULT_PRIORITY));
        assert_eq!(rules.iter().map(|r| r.hop).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn reverse_rule_names() {
        let defaults = FlowDefaults { priority: 100, ..Default::default() };
        let rules = build_rules(&hops(), Direction::Reverse, "h3", "h1", 1, &defaults);
        assert_eq!(rules[0].name, "rev_h3_to_h1_1");
        assert_eq!(rules[0].priority, 100);
        assert!(rules.iter().all(|r| r.direction == Direction::Reverse));
    }

    #[test]
    fn outcomes_keep_rule_order() {
        let rules = forward_rules();
        let endpoint = MockEndpoint::line().reject_on("s2");
        let installer = FlowInstaller::new(Some(2));
        let result = installer.install(&endpoint, &rules, &FlowDefaults::default());
        assert_eq!(result.len(), 3);
        for (installation, rule) in result.iter().zip(rules.iter()) {
            assert_eq!(&installation.rule, rule);
        }
        assert!(result[0].outcome.is_accepted());
        assert!(matches!(result[1].outcome, InstallOutcome::Rejected { status: 400, .. }));
        assert!(result[2].outcome.is_accepted());
        assert_eq!(endpoint.installed().len(), 3);
    }

    #[test]
    fn transport_errors_are_reported() {
        let rules = forward_rules();
        let endpoint = MockEndpoint::line().fail_on("s1");
        let installer = FlowInstaller::new(Some(8));
        let result = installer.install(&endpoint, &rules, &FlowDefaults::default());
        assert!(matches!(result[0].outcome, InstallOutcome::Failed(_)));
        assert!(result[1].outcome.is_accepted());
        assert!(result[2].outcome.is_accepted());
    }

    #[test]
    fn no_rules() {
        let endpoint = MockEndpoint::line();
        let result = FlowInstaller::default().install(&endpoint, &[], &FlowDefaults::default());
        assert!(result.is_empty());
        assert!(endpoint.installed().is_empty());
    }

    #[test]
    fn at_least_one_worker() {
        assert_eq!(FlowInstaller::new(Some(0)).workers(), 1);
        assert!(FlowInstaller::default().workers() >= 1);
    }
}
