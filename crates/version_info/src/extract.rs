//! Recovery of the protocol version literal from generated protobuf-c sources.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;

use crate::error::{Result, VersionInfoError};

/// Any C identifier, used when no symbol is pinned.
const ANY_SYMBOL: &str = r"[A-Za-z_][A-Za-z0-9_]*";

/// Declaration pattern of the form `char <symbol>[] = "<value>"`.
#[derive(Debug, Clone)]
pub struct ProtocolVersionPattern {
	regex: Regex,
}

impl ProtocolVersionPattern {
	/// Matches a `char` array declaration with any symbol name.
	pub fn any() -> Self {
		Self::with_symbol_pattern(ANY_SYMBOL).expect("identifier pattern is valid")
	}

	/// Matches only declarations of `name`.
	pub fn symbol(name: &str) -> Result<Self> {
		if name.is_empty() {
			return Ok(Self::any());
		}
		Self::with_symbol_pattern(&regex::escape(name))
	}

	fn with_symbol_pattern(symbol: &str) -> Result<Self> {
		let regex = Regex::new(&format!(r#"^char\s+{symbol}\[\]\s*=\s*"(.*)""#))?;
		Ok(Self { regex })
	}

	/// Returns the trimmed payload if `line` is a matching declaration.
	pub fn payload<'a>(&self, line: &'a str) -> Option<&'a str> {
		self.regex
			.captures(line)
			.and_then(|caps| caps.get(1))
			.map(|m| m.as_str().trim())
	}
}

/// Scans `path` line by line and returns the payload of the first matching
/// declaration.
pub fn extract_protocol_version(path: &Path, pattern: &ProtocolVersionPattern) -> Result<String> {
	let file = File::open(path).map_err(|e| VersionInfoError::io(path, e))?;

	for (index, line) in BufReader::new(file).lines().enumerate() {
		let line = line.map_err(|e| VersionInfoError::io(path, e))?;
		if let Some(version) = pattern.payload(&line) {
			tracing::debug!(path = %path.display(), line = index + 1, version, "version_info.extract");
			return Ok(version.to_string());
		}
	}

	Err(VersionInfoError::Extraction {
		path: path.to_path_buf(),
	})
}

/// Reads the project version file and returns its trimmed contents.
pub fn read_project_version(path: &Path) -> Result<String> {
	let contents = std::fs::read_to_string(path).map_err(|e| VersionInfoError::io(path, e))?;
	let version = contents.trim();
	if version.is_empty() {
		return Err(VersionInfoError::EmptyField {
			field: "project version",
		});
	}
	Ok(version.to_string())
}
