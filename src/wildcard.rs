//! Compiled shell-style `*` patterns for string matching.

/// A literal pattern compiled once at parse time.
///
/// The pattern is split on `*` into fixed substrings; the two flags record
/// whether the pattern is anchored at either end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Wildcard {
	parts: Vec<String>,
	first_star: bool,
	last_star: bool,
}

impl Wildcard {
	pub(crate) fn compile(pattern: &str) -> Self {
		if pattern.is_empty() {
			return Self {
				parts: Vec::new(),
				first_star: false,
				last_star: false,
			};
		}

		let first_star = pattern.starts_with('*');
		let last_star = pattern.ends_with('*');
		let mut parts: Vec<String> = pattern.split('*').map(str::to_owned).collect();
		if first_star && !parts.is_empty() {
			parts.remove(0);
		}
		if last_star && !parts.is_empty() {
			parts.pop();
		}

		Self {
			parts,
			first_star,
			last_star,
		}
	}

	/// True for the bare `*` pattern, which matches any candidate of any
	/// type without further dispatch. An empty pattern still matches every
	/// string but is not a universal match: other scalar lanes must try to
	/// convert it and report the failure.
	pub(crate) fn matches_any(&self) -> bool {
		self.first_star && self.last_star && self.parts.is_empty()
	}

	pub(crate) fn matches(&self, candidate: &str) -> bool {
		if self.parts.is_empty() {
			return true;
		}

		let mut parts: &[String] = &self.parts;
		let mut cursor = 0usize;

		if !self.first_star {
			let first = parts[0].as_str();
			if !candidate.starts_with(first) {
				return false;
			}
			cursor = first.len();
			parts = &parts[1..];
		}

		if parts.is_empty() {
			return self.last_star || cursor == candidate.len();
		}

		let last = parts[parts.len() - 1].as_str();
		let middle = if self.last_star {
			parts
		} else {
			&parts[..parts.len() - 1]
		};

		// Leftmost occurrence for every unanchored part, advancing the
		// cursor past each match.
		for part in middle {
			match candidate[cursor..].find(part.as_str()) {
				Some(found) => cursor += found + part.len(),
				None => return false,
			}
		}

		if self.last_star {
			true
		} else {
			candidate[cursor..].ends_with(last)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn check(candidate: &str, pattern: &str, expected: bool) {
		let wildcard = Wildcard::compile(pattern);
		assert_eq!(
			wildcard.matches(candidate),
			expected,
			"candidate '{}' against pattern '{}'",
			candidate,
			pattern
		);
	}

	#[test]
	fn test_empty_pattern_matches_everything() {
		check("asd", "", true);
		check("", "", true);
	}

	#[test]
	fn test_bare_star_matches_everything() {
		check("", "*", true);
		check("asd", "*", true);
		assert!(Wildcard::compile("*").matches_any());
		assert!(!Wildcard::compile("a*").matches_any());
		assert!(!Wildcard::compile("").matches_any());
		// "**" keeps an empty middle part; it still matches everything
		// through the normal scan.
		assert!(!Wildcard::compile("**").matches_any());
		check("anything", "**", true);
	}

	#[test]
	fn test_exact_match() {
		check("asd", "asd", true);
		check("asd", "asc", false);
	}

	#[test]
	fn test_anchored_prefix_and_suffix() {
		check("asd", "asd*", true);
		check("asd", "*asd", true);
		check("asd", "*asd*", true);
		check("asd", "*eee*", false);
	}

	#[test]
	fn test_inner_stars() {
		check("asd", "a*d", true);
		check("asd", "a**d", true);
		check("aaa-bbbccc", "aaa*bbb", false);
		check("aaa-bbbccc", "aaa*bbb*", true);
		check("aaa-bbbccc", "aaa*bbb*c", true);
	}

	#[test]
	fn test_middle_part_must_leave_room_for_suffix() {
		// The middle scan may consume the whole candidate; the suffix
		// anchor must still be honoured.
		check("axb", "a*b*c", false);
		check("axbxc", "a*b*c", true);
	}

	#[test]
	fn test_prefix_contains_suffix_overlap() {
		check("ab", "a*b", true);
		check("ab", "a*ab", false);
	}
}
