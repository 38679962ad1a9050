//! opstream - live progress streams for remote operations
//!
//! Turns the chunked event stream served for server provisioning, application
//! deployments and container log tails into an observable, cancellable
//! session.
//!
//! ```ignore
//! use opstream::{StreamClient, StreamConfig};
//! use opstream::session::TailParams;
//!
//! let client = StreamClient::from_config(StreamConfig::from_env());
//! let mut tail = client.tail();
//! tail.set_params(Some(TailParams::new("web").with_lines(200)));
//! let mut updates = tail.subscribe();
//! while updates.changed().await.is_ok() {
//!     println!("{} lines", updates.borrow().line_count);
//! }
//! ```

pub mod adapters;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod sse;
pub mod traits;

pub use client::StreamClient;
pub use config::StreamConfig;
pub use error::{StreamError, StreamResult};
pub use session::{
    CancelHandle, SessionSnapshot, SessionState, SessionUpdate, StreamSession, TailSnapshot,
};
