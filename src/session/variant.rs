//! Per-variant session configuration.

use std::fmt;

use crate::config::StreamConfig;

/// What distinguishes one kind of stream from another.
///
/// The decode/parse loop is shared; a variant only decides where to connect
/// and whether a terminal frame ends the stream.
pub struct VariantSpec<P> {
    /// Name used in log output
    pub name: &'static str,
    /// Finite streams end on a terminal frame; unbounded ones ignore it
    pub finite: bool,
    /// Build the stream address from the config and identifying parameters
    pub address: fn(&StreamConfig, &P) -> String,
    /// Outcome labels the server is known to send. Informational only.
    pub statuses: &'static [&'static str],
}

impl<P> VariantSpec<P> {
    pub fn address_for(&self, config: &StreamConfig, params: &P) -> String {
        (self.address)(config, params)
    }

    pub fn is_known_status(&self, status: &str) -> bool {
        self.statuses.contains(&status)
    }
}

impl<P> Clone for VariantSpec<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for VariantSpec<P> {}

impl<P> fmt::Debug for VariantSpec<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantSpec")
            .field("name", &self.name)
            .field("finite", &self.finite)
            .field("statuses", &self.statuses)
            .finish()
    }
}

/// Percent-encode one path segment or query value.
pub(crate) fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
