//! Frame classification.
//!
//! A frame may hold several lines (`event:`, `id:`, comments); only the first
//! line carrying the `data:` prefix is considered. Parsing never fails: any
//! frame that cannot be classified comes back as [`StreamEvent::Malformed`].

use crate::sse::decoder::EventFrame;
use crate::sse::events::{StreamEvent, StreamPayload};

/// Marker that introduces the payload sub-line.
pub const DATA_PREFIX: &str = "data:";

/// Locate the payload sub-line of a frame and return the text after the marker.
pub fn extract_data_payload(frame: &str) -> Option<&str> {
    frame
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .find_map(|line| line.strip_prefix(DATA_PREFIX))
        .map(str::trim)
}

/// Classify a frame.
pub fn parse_frame(frame: &EventFrame) -> StreamEvent {
    parse_frame_text(frame.as_str())
}

/// Classify raw frame text.
pub fn parse_frame_text(frame: &str) -> StreamEvent {
    let Some(data) = extract_data_payload(frame) else {
        return StreamEvent::Malformed;
    };

    let payload = match serde_json::from_str::<StreamPayload>(data) {
        Ok(payload) => payload,
        Err(_) => return StreamEvent::Malformed,
    };

    classify(payload)
}

fn classify(payload: StreamPayload) -> StreamEvent {
    if payload.is_done() {
        return StreamEvent::Terminal(payload.status);
    }

    match payload.line {
        Some(line) => StreamEvent::Line(line),
        None => StreamEvent::Malformed,
    }
}
