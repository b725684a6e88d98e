//! Runs the Kinetic simulator until interrupted.
//!
//! Exits 0 after an interrupt or a client disconnect once the simulator has
//! been shut down.

use std::process::ExitCode;

use clap::Parser;
use kinetic_devtools::{CommonArgs, setup_tracing, supervise};
use kinetic_devtools_simulator::{PollIntervals, ProcessSimulator, Supervisor, SupervisorOutcome};

#[derive(Parser, Debug)]
#[command(name = "kinetic-simulator")]
#[command(about = "Start and supervise the Kinetic simulator")]
struct Args {
	#[command(flatten)]
	common: CommonArgs,

	/// Port to listen on (overrides the configuration)
	#[arg(short, long)]
	port: Option<u16>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
	let args = Args::parse();
	setup_tracing("kinetic-simulator", args.common.verbose);

	let mut config = args.common.project()?.config.simulator;
	if let Some(port) = args.port {
		config.port = port;
	}

	let server = ProcessSimulator::spawn(&config)?;
	println!("Kinetic simulator waiting for a connection on port {}...", config.port);

	let supervisor = Supervisor::new(server, PollIntervals::from(&config));
	let outcome = supervise(supervisor, tokio::signal::ctrl_c()).await?;
	if outcome == SupervisorOutcome::Disconnected {
		println!("Client disconnected, simulator stopped.");
	}
	tracing::info!(?outcome, "simulator.exit");
	Ok(ExitCode::SUCCESS)
}
