//! One-shot migration of CamelCase source files to snake_case names.

use std::process::ExitCode;

use clap::Parser;
use kinetic_devtools::{CommonArgs, setup_tracing};
use kinetic_devtools_rename::normalize;
use kinetic_devtools_vcs::Git;

#[derive(Parser, Debug)]
#[command(name = "rename-sources")]
#[command(about = "Rename CamelCase C sources to snake_case with git mv")]
struct Args {
	#[command(flatten)]
	common: CommonArgs,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
	let args = Args::parse();
	setup_tracing("rename-sources", args.common.verbose);

	let project = args.common.project()?;
	Git::ensure_available()?;

	let git = Git::new(&project.root);
	let report = normalize(&project.rename_roots(), &project.normalize_options(), &git)?;

	println!("{report}");
	Ok(ExitCode::SUCCESS)
}
