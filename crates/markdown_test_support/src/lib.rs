//! Shared helpers for the markdown integration tests: fixture loading, line
//! diffs and string escaping for failure messages.

use serde::Deserialize;
use std::env;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// Quote-safe rendering of arbitrary text for one-line failure messages.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Describe the first differing line with two lines of context either side.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    const MISSING: &str = "<missing>";
    let max = expected.len().max(actual.len());
    let line = |lines: &[String], index: usize| {
        lines
            .get(index)
            .map_or(MISSING, String::as_str)
            .to_string()
    };
    let mut out = String::new();
    let mismatch = (0..max).find(|&index| line(expected, index) != line(actual, index));
    if let Some(index) = mismatch {
        let start = index.saturating_sub(2);
        let end = (index + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            index + 1,
            start + 1,
            end
        );
        for shown in start..end {
            let marker = if shown == index { ">" } else { " " };
            let _ = writeln!(
                &mut out,
                "{marker} {:>4}  expected: {}",
                shown + 1,
                line(expected, shown)
            );
            let _ = writeln!(
                &mut out,
                "{marker} {:>4}    actual: {}",
                shown + 1,
                line(actual, shown)
            );
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    #[default]
    Active,
    Xfail,
    Skip,
}

/// Contents of a fixture's `expected.toml`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expected {
    #[serde(default)]
    pub status: FixtureStatus,
    pub reason: Option<String>,
    pub html: String,
    /// Token snapshot lines, when the fixture pins the tokenizer output too.
    pub tokens: Option<Vec<String>>,
    /// Tree outline lines, when the fixture pins the tree shape.
    pub dom: Option<Vec<String>>,
}

#[derive(Clone, Debug)]
pub struct Fixture {
    pub name: String,
    pub dir: PathBuf,
    pub input: String,
    pub expected: Expected,
}

/// Load every `<root>/<name>/{input.md, expected.toml}` pair, sorted by name.
///
/// Panics on unreadable or malformed fixtures; `xfail` and `skip` require a
/// reason.
pub fn load_fixtures(root: &Path) -> Vec<Fixture> {
    let mut entries: Vec<_> = fs::read_dir(root)
        .unwrap_or_else(|err| panic!("failed to read fixture root {root:?}: {err}"))
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut fixtures = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let dir = entry.path();
        let input_path = dir.join("input.md");
        let expected_path = dir.join("expected.toml");
        let input = fs::read_to_string(&input_path)
            .unwrap_or_else(|err| panic!("failed to read input {input_path:?}: {err}"));
        let raw = fs::read_to_string(&expected_path)
            .unwrap_or_else(|err| panic!("failed to read {expected_path:?}: {err}"));
        let expected: Expected = toml::from_str(&raw)
            .unwrap_or_else(|err| panic!("malformed {expected_path:?}: {err}"));
        if expected.status != FixtureStatus::Active && expected.reason.is_none() {
            panic!("fixture '{name}' is {:?} without a reason", expected.status);
        }
        fixtures.push(Fixture {
            name,
            dir,
            input,
            expected,
        });
    }
    fixtures
}

/// Substring filter over fixture names, read from an environment variable.
#[derive(Clone, Debug, Default)]
pub struct FixtureFilter {
    raw: Option<String>,
}

impl FixtureFilter {
    pub fn from_env(key: &str) -> Self {
        Self {
            raw: env::var(key).ok().filter(|value| !value.is_empty()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.raw.as_deref().is_none_or(|filter| name.contains(filter))
    }
}

#[cfg(feature = "dom-snapshot")]
pub mod snapshot {
    //! Line views of pipeline stages.

    use markdown::dom_snapshot::DomSnapshot;
    use markdown::{Document, Token, format_tokens};

    pub fn token_lines(tokens: &[Token]) -> Vec<String> {
        format_tokens(tokens)
    }

    pub fn dom_lines(document: &Document) -> Vec<String> {
        DomSnapshot::new(document).as_lines().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_points_at_first_mismatch() {
        let expected = vec!["a".to_string(), "b".to_string()];
        let actual = vec!["a".to_string(), "c".to_string(), "d".to_string()];
        let diff = diff_lines(&expected, &actual);
        assert!(diff.contains("first mismatch at line 2"));
        assert!(diff.contains("     3  expected: <missing>"));
        assert!(diff.ends_with("expected 2 lines, actual 3 lines\n"));
    }

    #[test]
    fn expected_toml_defaults_to_active() {
        let expected: Expected = toml::from_str("html = \"<p>a</p>\"").unwrap();
        assert_eq!(expected.status, FixtureStatus::Active);
        assert!(expected.tokens.is_none());
    }

    #[test]
    fn escape_text_handles_controls() {
        assert_eq!(escape_text("a\"\n\u{1}"), "a\\\"\\n\\u{01}");
    }
}
