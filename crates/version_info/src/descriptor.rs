//! The canonical build identity and its header rendering.

use crate::error::{Result, VersionInfoError};

/// Include guard of the generated header.
pub const INCLUDE_GUARD: &str = "_KINETIC_VERSION_INFO_H";

/// Project version, protocol version and revision of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
	project_version: String,
	protocol_version: String,
	revision_hash: String,
}

impl VersionDescriptor {
	/// Builds a descriptor, rejecting empty fields.
	pub fn new(
		project_version: impl Into<String>,
		protocol_version: impl Into<String>,
		revision_hash: impl Into<String>,
	) -> Result<Self> {
		let descriptor = Self {
			project_version: project_version.into(),
			protocol_version: protocol_version.into(),
			revision_hash: revision_hash.into(),
		};

		for (field, value) in [
			("project version", &descriptor.project_version),
			("protocol version", &descriptor.protocol_version),
			("revision hash", &descriptor.revision_hash),
		] {
			if value.is_empty() {
				return Err(VersionInfoError::EmptyField { field });
			}
		}

		Ok(descriptor)
	}

	pub fn project_version(&self) -> &str {
		&self.project_version
	}

	pub fn protocol_version(&self) -> &str {
		&self.protocol_version
	}

	pub fn revision_hash(&self) -> &str {
		&self.revision_hash
	}

	/// Renders the header as newline-inclusive lines.
	///
	/// The final `#endif` carries no trailing newline.
	pub fn render(&self) -> Vec<String> {
		vec![
			format!("#ifndef {INCLUDE_GUARD}\n"),
			format!("#define {INCLUDE_GUARD}\n"),
			format!("#define KINETIC_C_VERSION \"{}\"\n", self.project_version),
			format!("#define KINETIC_C_PROTOCOL_VERSION \"{}\"\n", self.protocol_version),
			format!("#define KINETIC_C_REPO_HASH \"{}\"\n", self.revision_hash),
			"#endif".to_string(),
		]
	}
}
