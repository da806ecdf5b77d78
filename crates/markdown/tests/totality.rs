//! Every input converts; errors only ever signal an engine bug.

use markdown::{Markdown, TokenizerConfig, TreeBuilderConfig};

const ALPHABET: &[&str] = &[
    "a", "b", " ", "  ", "\n", "\n\n", "\t", "*", "**", "_", "#", "# ", ">", "> ", "-", "- ",
    "* ", "1. ", "`", "``", "[", "]", "(", ")", "![", "](", "\"", "\\", "&", "<", "é", "    ",
    "---", "\r\n",
];

/// Deterministic linear congruential generator; no external randomness.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

fn random_input(rng: &mut Lcg) -> String {
    let pieces = rng.below(40);
    (0..pieces)
        .map(|_| ALPHABET[rng.below(ALPHABET.len())])
        .collect()
}

#[test]
fn random_inputs_never_fail() {
    let mut rng = Lcg(0x5EED_CAFE);
    for case in 0..4000 {
        let input = random_input(&mut rng);
        let result = Markdown::new(input.as_str(), None).and_then(|markdown| markdown.to_html());
        if let Err(err) = result {
            panic!("case {case} failed with {:?}: {err}\ninput: {input:?}", err.kind());
        }
    }
}

#[test]
fn long_marker_runs_stay_within_the_loop_guard() {
    for marker in ["*", "_", "`", "#", ">", "[", "\\", " "] {
        let input = format!("x{}y", marker.repeat(500));
        let markdown = Markdown::with_config(
            input.as_str(),
            TokenizerConfig::default(),
            TreeBuilderConfig::default(),
        );
        if let Err(err) = markdown.to_html() {
            panic!("run of {marker:?} failed: {err}");
        }
    }
}

#[test]
fn very_long_marker_run_converts() {
    let input = format!("x{}", "*".repeat(200_000));
    let html = Markdown::new(input.as_str(), None)
        .and_then(|markdown| markdown.to_html())
        .expect("long runs convert");
    assert_eq!(html, "<p>x</p>");
}

#[test]
fn deep_nesting_converts() {
    let quotes = format!("{} a", ">".repeat(300));
    let lists: String = (0..60)
        .map(|depth| format!("{}* item\n", "    ".repeat(depth)))
        .collect();
    for input in [quotes, lists] {
        assert!(Markdown::new(input.as_str(), None)
            .and_then(|markdown| markdown.to_html())
            .is_ok());
    }
}
