//! Regenerates `kinetic_version_info.h` when the project version, protocol
//! version or commit hash changed.

use std::process::ExitCode;

use clap::Parser;
use kinetic_devtools::{CommonArgs, setup_tracing};
use kinetic_devtools_vcs::Git;
use kinetic_devtools_version_info::synthesize;

#[derive(Parser, Debug)]
#[command(name = "generate-version-info")]
#[command(about = "Generate the kinetic-c version info header")]
struct Args {
	#[command(flatten)]
	common: CommonArgs,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
	let args = Args::parse();
	setup_tracing("generate-version-info", args.common.verbose);

	let project = args.common.project()?;
	let revision = Git::new(&project.root).head_revision()?;
	let report = synthesize(&project.version_inputs(revision)?)?;

	tracing::info!(outcome = ?report.outcome, output = %report.output.display(), "version_info.done");
	println!("{report}");
	Ok(ExitCode::SUCCESS)
}
