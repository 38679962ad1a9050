//! Error handling for operation streams.
//!
//! | Fault | Variant | Surfaced |
//! |-------|---------|----------|
//! | Non-success open response | `HttpStatus` | yes |
//! | Open response without body | `MissingBody` | yes |
//! | Open or read failure | `Transport` | yes |
//! | Caller cancellation | `Cancelled` | never |
//! | Unparseable frame | (dropped in the session) | never |

mod stream;

pub use stream::StreamError;

/// Type alias for Results using StreamError.
pub type StreamResult<T> = Result<T, StreamError>;
