//! Stream adapter that splits a byte stream into lines.

use crate::Error;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Upper bound on a single unterminated line.
pub const MAX_LINE_BYTES: usize = 1_000_000;

/// A stream adapter that yields the lines of a byte stream.
///
/// Lines are split on `\n` and a trailing `\r` is removed. Line content is
/// yielded as raw bytes; decoding is left to the consumer so that a line
/// that is not UTF-8 can be skipped rather than failing the stream.
/// The inner stream is only polled when no complete line is buffered, so a
/// consumer that stops early never reads past the line it stopped on.
pub struct LineStream<S> {
    /// The underlying byte stream
    inner: S,
    /// Bytes of the line currently being assembled
    buffer: Vec<u8>,
    /// Complete lines ready to be yielded
    lines: VecDeque<Bytes>,
    /// Set once the inner stream has ended or failed
    finished: bool,
}

impl<S> LineStream<S> {
    /// Create a new line stream from a byte stream.
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            buffer: Vec::new(),
            lines: VecDeque::new(),
            finished: false,
        }
    }

    /// Move every complete line out of the buffer.
    fn split_buffer(&mut self) {
        let mut start = 0;

        while let Some(pos) = memchr::memchr(b'\n', &self.buffer[start..]) {
            let end = start + pos;
            let line = strip_cr(&self.buffer[start..end]);
            self.lines.push_back(Bytes::copy_from_slice(line));
            start = end + 1;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    match line.last() {
        Some(b'\r') => &line[..line.len() - 1],
        _ => line,
    }
}

impl<S, E> Stream for LineStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Into<Error>,
{
    type Item = Result<Bytes, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(line) = self.lines.pop_front() {
                return Poll::Ready(Some(Ok(line)));
            }

            // Only reached once every complete line has been handed out
            if self.buffer.len() > MAX_LINE_BYTES {
                self.finished = true;
                self.buffer.clear();
                return Poll::Ready(Some(Err(Error::streaming(
                    "line exceeded maximum buffer size",
                ))));
            }

            if self.finished {
                return Poll::Ready(None);
            }

            let chunk = match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Poll::Ready(Some(Err(e.into())));
                }
                None => {
                    self.finished = true;
                    // Final line without a terminating newline
                    if !self.buffer.is_empty() {
                        let rest = std::mem::take(&mut self.buffer);
                        return Poll::Ready(Some(Ok(Bytes::copy_from_slice(strip_cr(&rest)))));
                    }
                    return Poll::Ready(None);
                }
            };

            self.buffer.extend_from_slice(&chunk);
            self.split_buffer();
        }
    }
}

/// Extension trait to add line splitting to byte streams.
pub trait LineStreamExt: Stream {
    /// Split this byte stream into lines.
    fn split_lines(self) -> LineStream<Self>
    where
        Self: Sized,
    {
        LineStream::new(self)
    }
}

impl<S: Stream> LineStreamExt for S {}
