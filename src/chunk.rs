//! Classification of single stream lines.

use serde::Deserialize;

/// Framing prefix in front of every data line.
pub const DATA_PREFIX: &str = "data:";

/// Payload that marks the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// What a single line of the streamed body contributes to the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A decoded delta; may be empty when the delta carries no text.
    Fragment(String),
    /// Blank, undecodable or unrelated line. Contributes nothing.
    Skip,
    /// End-of-stream sentinel. Nothing after it is read.
    Done,
}

/// One streamed chat-completion chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionChunk {
    /// Text carried by the first choice, if the chunk has any choices.
    pub fn first_fragment(self) -> Option<String> {
        let choice = self.choices.into_iter().next()?;
        Some(
            choice
                .delta
                .and_then(|delta| delta.content)
                .unwrap_or_default(),
        )
    }
}

/// Classify one raw line of the body.
pub fn parse_line(line: &[u8]) -> LineOutcome {
    let Ok(text) = std::str::from_utf8(line) else {
        return LineOutcome::Skip;
    };
    parse_text_line(text)
}

/// Classify one decoded line of the body.
pub fn parse_text_line(line: &str) -> LineOutcome {
    let payload = strip_data_prefix(line.trim());
    if payload.is_empty() {
        return LineOutcome::Skip;
    }
    if payload == DONE_SENTINEL {
        return LineOutcome::Done;
    }

    match serde_json::from_str::<CompletionChunk>(payload) {
        Ok(chunk) => chunk
            .first_fragment()
            .map_or(LineOutcome::Skip, LineOutcome::Fragment),
        Err(_) => LineOutcome::Skip,
    }
}

fn strip_data_prefix(line: &str) -> &str {
    match line.strip_prefix(DATA_PREFIX) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim(),
        None => line,
    }
}
