//! Build identity for kinetic-c.
//!
//! Combines the project version (`config/VERSION`), the protocol version
//! embedded in the generated protobuf-c source, and the git revision into
//! `kinetic_version_info.h`. The header is rewritten only when its contents
//! would change, so incremental builds keyed on mtime stay quiet.

pub mod descriptor;
pub mod error;
pub mod extract;
pub mod header;


use std::fmt;
use std::path::PathBuf;

pub use descriptor::VersionDescriptor;
pub use error::{Result, VersionInfoError};
pub use extract::{ProtocolVersionPattern, extract_protocol_version, read_project_version};
pub use header::{WriteOutcome, write_if_changed};

/// Everything [`synthesize`] needs for one run.
#[derive(Debug, Clone)]
pub struct VersionInputs {
	/// File holding the project version.
	pub version_file: PathBuf,
	/// Generated source holding the protocol version declaration.
	pub protocol_source: PathBuf,
	/// Declaration pattern used to find the protocol version.
	pub pattern: ProtocolVersionPattern,
	/// Full revision hash of the working tree.
	pub revision: String,
	/// Header to generate.
	pub output: PathBuf,
}

/// Outcome of one synthesis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfoReport {
	pub output: PathBuf,
	pub descriptor: VersionDescriptor,
	pub outcome: WriteOutcome,
}

/// Derives the version descriptor and writes the header if it changed.
///
/// Extraction happens before anything is written; a missing protocol version
/// aborts the run and leaves the existing header untouched.
pub fn synthesize(inputs: &VersionInputs) -> Result<VersionInfoReport> {
	let project_version = read_project_version(&inputs.version_file)?;
	let protocol_version = extract_protocol_version(&inputs.protocol_source, &inputs.pattern)?;
	let descriptor = VersionDescriptor::new(project_version, protocol_version, inputs.revision.trim())?;

	let outcome = write_if_changed(&inputs.output, &descriptor.render())?;

	Ok(VersionInfoReport {
		output: inputs.output.clone(),
		descriptor,
		outcome,
	})
}

impl fmt::Display for VersionInfoReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.outcome {
			WriteOutcome::UpToDate => write!(f, "Generated version info for kinetic-c is up to date!"),
			WriteOutcome::Written => {
				writeln!(f, "Generated version info for kinetic-c")?;
				writeln!(f, "------------------------------------")?;
				writeln!(f, "header file:       {}", self.output.display())?;
				writeln!(f, "kinetic-c version: {}", self.descriptor.project_version())?;
				writeln!(f, "protocol version:  {}", self.descriptor.protocol_version())?;
				write!(f, "commit hash:       {}", self.descriptor.revision_hash())
			}
		}
	}
}
