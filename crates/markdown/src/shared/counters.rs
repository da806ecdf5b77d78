//! Per-conversion counters.

/// Summary counters collected by one `Markdown::to_html` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub tokens_emitted: u64,
    pub nodes_created: u64,
    pub nodes_pruned: u64,
    pub max_open_depth: u32,
}
