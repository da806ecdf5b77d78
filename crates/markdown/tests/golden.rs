use markdown::Markdown;
use markdown_test_support::snapshot::{dom_lines, token_lines};
use markdown_test_support::{
    Fixture, FixtureFilter, FixtureStatus, diff_lines, escape_text, load_fixtures,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
struct Actual {
    html: String,
    tokens: Vec<String>,
    dom: Vec<String>,
}

#[test]
fn markdown_golden_fixtures() {
    let filter = FixtureFilter::from_env("MARKDOWN_FIXTURE");
    let mut ran = 0usize;
    for fixture in load_fixtures(&fixture_root()) {
        if !filter.matches(&fixture.name) {
            continue;
        }
        ran += 1;
        if fixture.expected.status == FixtureStatus::Skip {
            continue;
        }
        let actual = run_fixture(&fixture);
        enforce_expected(&fixture, &actual);
    }
    assert!(ran > 0, "no fixtures matched filter");
}

fn run_fixture(fixture: &Fixture) -> Actual {
    let markdown = match Markdown::new(fixture.input.as_str(), None) {
        Ok(markdown) => markdown,
        Err(err) => panic!("fixture '{}' rejected: {err}", fixture.name),
    };
    let converted = markdown.tokens().and_then(|tokens| {
        let html = markdown.to_html()?;
        let document = markdown.document()?;
        Ok(Actual {
            html,
            tokens: token_lines(&tokens),
            dom: dom_lines(&document),
        })
    });
    converted.unwrap_or_else(|err| {
        panic!(
            "fixture '{}' failed with {:?}: {err}\ninput: \"{}\"",
            fixture.name,
            err.kind(),
            escape_text(&fixture.input)
        )
    })
}

/// Lines that differ from the fixture's expectations, rendered as a diff.
fn mismatches(fixture: &Fixture, actual: &Actual) -> Vec<String> {
    let expected = &fixture.expected;
    let mut out = Vec::new();
    if actual.html != expected.html {
        out.push(format!(
            "html:\n{}",
            diff_lines(&[expected.html.clone()], &[actual.html.clone()])
        ));
    }
    if let Some(tokens) = &expected.tokens
        && tokens != &actual.tokens
    {
        out.push(format!("tokens:\n{}", diff_lines(tokens, &actual.tokens)));
    }
    if let Some(dom) = &expected.dom
        && dom != &actual.dom
    {
        out.push(format!("dom:\n{}", diff_lines(dom, &actual.dom)));
    }
    out
}

fn enforce_expected(fixture: &Fixture, actual: &Actual) {
    let mismatches = mismatches(fixture, actual);
    match fixture.expected.status {
        FixtureStatus::Active => {
            if !mismatches.is_empty() {
                panic!(
                    "mismatch in fixture '{}'\npath: {}\ninput: \"{}\"\n{}",
                    fixture.name,
                    fixture.dir.display(),
                    escape_text(&fixture.input),
                    mismatches.join("\n")
                );
            }
        }
        FixtureStatus::Xfail => {
            if mismatches.is_empty() {
                panic!(
                    "fixture '{}' matched its expectations but is marked xfail; reason: {}\npath: {}",
                    fixture.name,
                    fixture
                        .expected
                        .reason
                        .as_deref()
                        .unwrap_or("<missing reason>"),
                    fixture.dir.display()
                );
            }
        }
        FixtureStatus::Skip => {}
    }
}

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}
