//! Generates CMock mocks for every public kinetic-c header.

use std::process::ExitCode;

use clap::Parser;
use kinetic_devtools::{CommonArgs, setup_tracing};
use kinetic_devtools_mocks::create_mocks;

#[derive(Parser, Debug)]
#[command(name = "create-mocks")]
#[command(about = "Generate CMock mocks from the kinetic-c headers")]
struct Args {
	#[command(flatten)]
	common: CommonArgs,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
	let args = Args::parse();
	setup_tracing("create-mocks", args.common.verbose);

	let project = args.common.project()?;
	println!("Creating mocks from header files...");

	let headers = project.header_set()?;
	let report = create_mocks(&project.mock_generator(), &headers, &project.mock_dir())?;

	println!("{report}");
	Ok(ExitCode::SUCCESS)
}
