//! Assembly of streamed fragments into the final answer.

use crate::chunk::{parse_line, LineOutcome};
use crate::line_stream::LineStreamExt;
use crate::Error;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::{debug, trace};

/// Why aggregation stopped reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The end-of-stream sentinel was seen.
    Sentinel,
    /// The body ended without a sentinel.
    Exhausted,
}

/// Accumulates fragments, in arrival order, into one answer.
#[derive(Debug, Default)]
pub struct Aggregator {
    content: String,
    fragments: usize,
    skipped: usize,
    termination: Option<Termination>,
}

impl Aggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one classified line. Returns `false` once no more lines should be read.
    pub fn process(&mut self, outcome: LineOutcome) -> bool {
        if self.termination.is_some() {
            return false;
        }

        match outcome {
            LineOutcome::Fragment(fragment) => {
                self.content.push_str(&fragment);
                self.fragments += 1;
                true
            }
            LineOutcome::Skip => {
                self.skipped += 1;
                true
            }
            LineOutcome::Done => {
                self.termination = Some(Termination::Sentinel);
                false
            }
        }
    }

    /// Record that the body ended. Has no effect after the sentinel.
    pub fn end_of_body(&mut self) {
        self.termination.get_or_insert(Termination::Exhausted);
    }

    /// Text accumulated so far.
    pub fn current_content(&self) -> &str {
        &self.content
    }

    /// Number of fragments appended, empty ones included.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Number of lines that contributed nothing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Finalize and return the aggregated answer.
    pub fn finish(self) -> String {
        self.content
    }
}

/// Consume a streamed body and return the assembled answer.
///
/// Reading stops at the sentinel; the rest of the body is never polled.
/// Any read failure discards what was accumulated and is returned as-is.
pub async fn aggregate_lines<S, E>(body: S) -> Result<String, Error>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Error>,
{
    let mut lines = body.split_lines();
    let mut aggregator = Aggregator::new();

    while let Some(line) = lines.next().await {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let outcome = parse_line(&line);
        if outcome == LineOutcome::Skip {
            trace!(line = %String::from_utf8_lossy(&line), "skipping undecodable stream line");
        }
        if !aggregator.process(outcome) {
            break;
        }
    }

    aggregator.end_of_body();
    debug!(
        fragments = aggregator.fragments(),
        skipped = aggregator.skipped(),
        termination = ?aggregator.termination(),
        "stream aggregation finished"
    );

    Ok(aggregator.finish())
}
