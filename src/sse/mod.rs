//! Wire layer for operation streams.
//!
//! The server sends UTF-8 text frames separated by a blank line. Each frame
//! carries one `data:` sub-line holding a JSON object:
//! - `line` - one log line (incremental event)
//! - `done` - set on the final frame
//! - `status` - outcome label on the final frame
//!
//! # Module structure
//! - `decoder` - chunk accumulation and frame splitting (FrameDecoder)
//! - `events` - StreamEvent and the wire payload
//! - `parser` - frame classification (parse_frame)

mod decoder;
mod events;
mod parser;

// Re-export public types
pub use decoder::{EventFrame, FrameDecoder, FRAME_SEPARATOR};
pub use events::{StreamEvent, StreamPayload};
pub use parser::{extract_data_payload, parse_frame, parse_frame_text, DATA_PREFIX};
