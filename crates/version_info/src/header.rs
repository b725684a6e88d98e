//! Compare-then-write persistence of generated headers.

use std::fs;
use std::path::Path;

use crate::error::{Result, VersionInfoError};

/// Result of [`write_if_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
	/// The file was created or its contents replaced.
	Written,
	/// The file already held exactly these lines and was not touched.
	UpToDate,
}

/// Writes `lines` to `path` unless the file already contains them.
///
/// Existing contents are split into newline-inclusive lines and compared with
/// `lines`; an absent file compares as empty. An unchanged file keeps its
/// modification time.
pub fn write_if_changed(path: &Path, lines: &[String]) -> Result<WriteOutcome> {
	let current = match fs::read(path) {
		Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
		Err(e) => return Err(VersionInfoError::io(path, e)),
	};

	if current.split_inclusive('\n').eq(lines.iter().map(String::as_str)) {
		tracing::debug!(path = %path.display(), "version_info.up_to_date");
		return Ok(WriteOutcome::UpToDate);
	}

	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		fs::create_dir_all(parent).map_err(|e| VersionInfoError::io(parent, e))?;
	}
	fs::write(path, lines.concat()).map_err(|e| VersionInfoError::io(path, e))?;
	tracing::info!(path = %path.display(), "version_info.write");
	Ok(WriteOutcome::Written)
}
