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

use floodlight::{FloodlightServer, DEFAULT_PUSHER_PATH};
use lightpath::installer::{FlowInstaller, DEFAULT_PRIORITY};
use lightpath::{run, RunConfig};

use clap::Parser;
use log::*;
use std::error::Error;
use std::time::Duration;

mod verify;
use verify::verify_installation;

fn main() -> Result<(), Box<dyn Error>> {
    // run clap
    let args = CommandLineArguments::parse();

    // initialize the env logger, showing info messages if nothing else is configured
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| String::from("info"));
    pretty_env_logger::formatted_builder().parse_filters(&filters).init();

    let server = FloodlightServer::new(&args.floodlight, Duration::from_secs(args.timeout))?
        .with_pusher_path(&args.pusher_path);
    info!("Using the controller at {}", server.address());

    let config = args.run_config();
    let report = run(&server, &config)?;

    if config.dry_run {
        info!("Computed {} rules, nothing was installed", report.rules.len());
    } else if report.all_accepted() {
        info!("Installed all {} rules", report.rules.len());
    } else {
        warn!(
            "Installed {} of {} rules. {} rules could not be installed:\n    {}",
            report.num_accepted(),
            report.rules.len(),
            report.num_failed(),
            report
                .installations
                .iter()
                .filter(|i| !i.outcome.is_accepted())
                .map(|i| format!("{}: {}", i.rule.name, i.outcome))
                .collect::<Vec<_>>()
                .join("\n    "),
        );
    }

    if args.verify && !config.dry_run {
        verify_installation(&server, &report);
    }

    if let Some(json_filename) = args.json_filename {
        let data_string = serde_json::to_string_pretty(&report)?;
        std::fs::write(&json_filename, data_string)?;
        info!("Stored the report in {}", json_filename);
    }

    Ok(())
}

/// Compute the shortest path between two hosts of a Mininet network, and install explicit
/// forwarding rules for it using the static flow pusher of the Floodlight controller.
#[derive(Parser, Debug)]
#[command(name = "lightpath", author = "Tibor Schneider", version, about)]
struct CommandLineArguments {
    /// Source host, like h1
    #[arg(short, long)]
    src: String,
    /// Destination host, like h3
    #[arg(short, long)]
    dst: String,
    /// Base URL of the Floodlight REST API
    #[arg(short = 'c', long, default_value = "http://127.0.0.1:8080")]
    floodlight: String,
    /// Also install the rules for the reverse direction
    #[arg(short, long)]
    bidirectional: bool,
    /// Priority of the installed rules
    #[arg(short, long, default_value_t = DEFAULT_PRIORITY)]
    priority: u32,
    /// Timeout of every request, in seconds
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,
    /// Number of rules pushed concurrently. Defaults to the number of CPUs.
    #[arg(short, long)]
    workers: Option<usize>,
    /// Fail if a host is missing in the device directory, instead of guessing its location
    #[arg(long)]
    no_fallback: bool,
    /// Path of the static flow pusher
    #[arg(long, default_value = DEFAULT_PUSHER_PATH)]
    pusher_path: String,
    /// Only compute and print the rules, without installing them
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Query the switches and the flow tables after installing the rules
    #[arg(long)]
    verify: bool,
    /// Store the report in a json file
    #[arg(long = "json")]
    json_filename: Option<String>,
}

impl CommandLineArguments {
    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new(self.src.as_str(), self.dst.as_str());
        config.bidirectional = self.bidirectional;
        config.dry_run = self.dry_run;
        config.flow.priority = self.priority;
        config.installer = FlowInstaller::new(self.workers);
        config.fallback = !self.no_fallback;
        config
    }
}
