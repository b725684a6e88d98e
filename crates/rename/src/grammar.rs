//! The legacy filename grammar.
//!
//! A legacy name is an optional `test` marker (optionally followed by `_`),
//! two or more capitalized segments, and a `.c` or `.h` suffix:
//! `test_KineticApi.c`, `testFooBarBaz.c`, `KineticSocket.h`.
//!
//! A segment is either a capitalized word (`Kinetic`, `Sha1`) or an acronym of
//! two or more capitals with optional trailing digits (`PDU`, `NBO2`). An
//! acronym ends where the next word begins, so `KineticHMACKey.c` splits into
//! `Kinetic`, `HMAC`, `Key`.

use std::sync::LazyLock;

use regex::Regex;

static LEGACY_NAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(test_?)?([A-Z][A-Za-z0-9]+)(\.[ch])$").expect("legacy name grammar is valid")
});

static SEGMENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^(?:[A-Z][a-z0-9]+|[A-Z]{2,}[0-9]*)$").expect("segment grammar is valid"));

/// Result of matching a file name against the legacy grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyName {
	Matched {
		/// Whether the name started with a `test` marker.
		test_marker: bool,
		/// Capitalized segments, lowercased, in order.
		segments: Vec<String>,
		/// File type suffix including the dot.
		suffix: String,
	},
	Unmatched,
}

/// Matches `file_name` against the legacy grammar.
pub fn parse_legacy_name(file_name: &str) -> LegacyName {
	let Some(caps) = LEGACY_NAME.captures(file_name) else {
		return LegacyName::Unmatched;
	};

	let parts = split_camel(&caps[2]);
	if parts.len() < 2 || !parts.iter().all(|part| SEGMENT.is_match(part)) {
		return LegacyName::Unmatched;
	}

	LegacyName::Matched {
		test_marker: caps.get(1).is_some(),
		segments: parts.iter().map(|part| part.to_ascii_lowercase()).collect(),
		suffix: caps[3].to_string(),
	}
}

/// Splits an ASCII CamelCase body before every capital that follows a
/// non-capital, and before the last capital of a run that starts a word.
fn split_camel(body: &str) -> Vec<&str> {
	let bytes = body.as_bytes();
	let mut parts = Vec::new();
	let mut start = 0;
	for i in 1..bytes.len() {
		let starts_word = bytes.get(i + 1).is_some_and(u8::is_ascii_lowercase);
		if bytes[i].is_ascii_uppercase() && (!bytes[i - 1].is_ascii_uppercase() || starts_word) {
			parts.push(&body[start..i]);
			start = i;
		}
	}
	parts.push(&body[start..]);
	parts
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn segments(name: &str) -> Option<Vec<String>> {
		match parse_legacy_name(name) {
			LegacyName::Matched { segments, .. } => Some(segments),
			LegacyName::Unmatched => None,
		}
	}

	#[test]
	fn test_marker_is_recognized() {
		let parsed = parse_legacy_name("testFooBarBaz.c");
		assert_eq!(
			parsed,
			LegacyName::Matched {
				test_marker: true,
				segments: vec!["foo".into(), "bar".into(), "baz".into()],
				suffix: ".c".into(),
			}
		);
	}

	#[test]
	fn underscore_after_test_marker() {
		let parsed = parse_legacy_name("test_KineticApi.c");
		assert_eq!(
			parsed,
			LegacyName::Matched {
				test_marker: true,
				segments: vec!["kinetic".into(), "api".into()],
				suffix: ".c".into(),
			}
		);
	}

	#[test]
	fn headers_and_digits() {
		assert_eq!(segments("KineticSocket.h"), Some(vec!["kinetic".into(), "socket".into()]));
		assert_eq!(segments("Sha1Hmac.c"), Some(vec!["sha1".into(), "hmac".into()]));
	}

	#[test]
	fn acronym_segments() {
		assert_eq!(segments("KineticPDU.h"), Some(vec!["kinetic".into(), "pdu".into()]));
		assert_eq!(segments("KineticHMAC.c"), Some(vec!["kinetic".into(), "hmac".into()]));
		assert_eq!(segments("KineticNBO.h"), Some(vec!["kinetic".into(), "nbo".into()]));
		assert_eq!(
			segments("KineticHMACKey.c"),
			Some(vec!["kinetic".into(), "hmac".into(), "key".into()])
		);
		assert_eq!(segments("PDUKinetic.c"), Some(vec!["pdu".into(), "kinetic".into()]));
		assert_eq!(segments("KineticNBO2.h"), Some(vec!["kinetic".into(), "nbo2".into()]));
		assert_eq!(
			parse_legacy_name("testKineticPDU.c"),
			LegacyName::Matched {
				test_marker: true,
				segments: vec!["kinetic".into(), "pdu".into()],
				suffix: ".c".into(),
			}
		);
	}

	#[test]
	fn unparsable_names_are_unmatched() {
		for name in [
			"Readme.md",
			"Kinetic.c",
			"kinetic_api.c",
			"PDU.h",
			"KineticP.h",
			"KineticApi.cpp",
			"KineticApi.c.orig",
			"testKinetic.c",
		] {
			assert_eq!(parse_legacy_name(name), LegacyName::Unmatched, "{name}");
		}
	}
}
