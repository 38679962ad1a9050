//! Incremental frame decoder.
//!
//! Turns arbitrarily aligned byte chunks into complete, blank-line delimited
//! frames. Two pieces of state survive between calls to [`FrameDecoder::feed`]:
//!
//! - `partial`: trailing bytes of a UTF-8 sequence cut by a chunk boundary
//! - `buffer`: decoded text that does not yet end in a frame separator
//!
//! After every `feed` the buffer holds at most one incomplete frame.

/// Separator between two frames on the wire.
pub const FRAME_SEPARATOR: &str = "\n\n";

/// A complete frame, split out of the stream exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFrame(String);

impl EventFrame {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EventFrame {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stateful decoder that accumulates chunks and emits complete frames.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes of a multi-byte character still waiting for its continuation
    partial: Vec<u8>,
    /// Decoded text not yet terminated by a separator
    buffer: String,
}

impl FrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and drain every frame whose separator has now arrived.
    ///
    /// Frames are returned in arrival order. Invalid UTF-8 sequences are
    /// replaced with U+FFFD rather than failing the stream.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<EventFrame> {
        self.decode_into_buffer(chunk);

        let mut frames = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = self.buffer[consumed..].find(FRAME_SEPARATOR) {
            let end = consumed + pos;
            frames.push(EventFrame::new(&self.buffer[consumed..end]));
            consumed = end + FRAME_SEPARATOR.len();
        }
        if consumed > 0 {
            self.buffer.drain(..consumed);
        }

        frames
    }

    /// Text (and undecoded bytes) held back waiting for a separator.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// True when no partial frame or partial character is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.partial.is_empty()
    }

    /// Drop all buffered state.
    pub fn reset(&mut self) {
        self.partial.clear();
        self.buffer.clear();
    }

    /// Consume the decoder at end of stream, returning the unterminated tail.
    ///
    /// The tail is never a confirmed frame; callers only use it for diagnostics.
    pub fn finish(mut self) -> Option<String> {
        if !self.partial.is_empty() {
            self.buffer.push(char::REPLACEMENT_CHARACTER);
            self.partial.clear();
        }
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer)
        }
    }

    fn decode_into_buffer(&mut self, chunk: &[u8]) {
        let owned;
        let mut input: &[u8] = if self.partial.is_empty() {
            chunk
        } else {
            let mut joined = std::mem::take(&mut self.partial);
            joined.extend_from_slice(chunk);
            owned = joined;
            &owned
        };

        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    self.buffer.push_str(text);
                    return;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    // valid_up_to guarantees this prefix is well formed
                    if let Ok(text) = std::str::from_utf8(valid) {
                        self.buffer.push_str(text);
                    }
                    match err.error_len() {
                        Some(bad) => {
                            self.buffer.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[bad..];
                        }
                        None => {
                            // Incomplete sequence at the end of the chunk
                            self.partial.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(frames: Vec<EventFrame>) -> Vec<String> {
        frames.into_iter().map(EventFrame::into_inner).collect()
    }

    fn feed_all(decoder: &mut FrameDecoder, chunks: &[&[u8]]) -> Vec<String> {
        chunks
            .iter()
            .flat_map(|chunk| texts(decoder.feed(chunk)))
            .collect()
    }

    #[test]
    fn test_single_complete_frame() {
        let mut decoder = FrameDecoder::new();
        let frames = texts(decoder.feed(b"data: {\"line\":\"a\"}\n\n"));
        assert_eq!(frames, vec!["data: {\"line\":\"a\"}"]);
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_frame_not_emitted_before_separator() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"data: {\"line\":\"a\"}\n").is_empty());
        assert_eq!(decoder.pending(), "data: {\"line\":\"a\"}\n");

        let frames = texts(decoder.feed(b"\n"));
        assert_eq!(frames, vec!["data: {\"line\":\"a\"}"]);
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_multiple_frames_in_one_chunk_keep_order() {
        let mut decoder = FrameDecoder::new();
        let frames = texts(decoder.feed(b"data: 1\n\ndata: 2\n\ndata: 3"));
        assert_eq!(frames, vec!["data: 1", "data: 2"]);
        assert_eq!(decoder.pending(), "data: 3");
    }

    #[test]
    fn test_multibyte_character_split_across_chunks() {
        let text = "data: {\"line\":\"héllo ✓\"}\n\n";
        let bytes = text.as_bytes();
        // Split inside the three-byte check mark
        let check = text.find('✓').unwrap();
        let mut decoder = FrameDecoder::new();
        let mut frames = texts(decoder.feed(&bytes[..check + 1]));
        assert!(frames.is_empty());
        frames.extend(texts(decoder.feed(&bytes[check + 1..check + 2])));
        frames.extend(texts(decoder.feed(&bytes[check + 2..])));
        assert_eq!(frames, vec!["data: {\"line\":\"héllo ✓\"}"]);
    }

    #[test]
    fn test_every_partition_matches_single_feed() {
        let stream = "data: {\"line\":\"step 1\"}\n\n: keepalive\n\ndata: {\"line\":\"ünï\"}\n\ndata: {\"done\":true}\n\n";
        let bytes = stream.as_bytes();
        let expected = texts(FrameDecoder::new().feed(bytes));
        assert_eq!(expected.len(), 4);

        for split in 0..=bytes.len() {
            let mut decoder = FrameDecoder::new();
            let got = feed_all(&mut decoder, &[&bytes[..split], &bytes[split..]]);
            assert_eq!(got, expected, "split at {}", split);
        }

        let mut decoder = FrameDecoder::new();
        let single_bytes: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(feed_all(&mut decoder, &single_bytes), expected);
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let mut decoder = FrameDecoder::new();
        let frames = texts(decoder.feed(b"data: \xffok\n\n"));
        assert_eq!(frames, vec!["data: \u{FFFD}ok"]);
    }

    #[test]
    fn test_empty_frames_are_emitted() {
        let mut decoder = FrameDecoder::new();
        let frames = texts(decoder.feed(b"\n\ndata: x\n\n"));
        assert_eq!(frames, vec!["", "data: x"]);
    }

    #[test]
    fn test_finish_returns_unterminated_tail() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(b"data: {\"line\":\"cut");
        assert_eq!(decoder.finish(), Some("data: {\"line\":\"cut".to_string()));

        let decoder = FrameDecoder::new();
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_finish_with_dangling_partial_character() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(&"é".as_bytes()[..1]);
        assert!(!decoder.is_empty());
        assert_eq!(decoder.finish(), Some("\u{FFFD}".to_string()));
    }

    #[test]
    fn test_reset() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(b"data: partial");
        decoder.reset();
        assert!(decoder.is_empty());
        assert!(decoder.feed(b"\n\n") == vec![EventFrame::new("")]);
    }
}
