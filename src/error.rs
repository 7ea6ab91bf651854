use thiserror::Error;

/// Failures that can occur while parsing a textual instance file.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing header line (expected `n_stacks n_tiers n_blocks`)")]
    MissingHeaderLine,

    #[error("malformed header line {line}: {text:?}")]
    MalformedHeader { line: usize, text: String },

    #[error("missing row for stack {stack} (expected {n_stacks} stacks)")]
    MissingRow { stack: usize, n_stacks: usize },

    #[error("malformed row for stack {stack} at line {line}: {text:?}")]
    MalformedRow {
        stack: usize,
        line: usize,
        text: String,
    },

    #[error("stack {stack} has height {height}, which exceeds n_tiers = {n_tiers}")]
    HeightOutOfRange {
        stack: usize,
        height: usize,
        n_tiers: usize,
    },

    #[error("expected at least 2 stacks, got {0}")]
    TooFewStacks(usize),

    #[error("expected at least 1 tier, got {0}")]
    TooFewTiers(usize),
}

/// Top-level error surfaced by the CLI binary.
#[derive(Debug, Error)]
pub enum BrpError {
    #[error(transparent)]
    Instance(#[from] InstanceError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
