// siphon-rs - The Siphon SIP Stack
// Copyright (C) 2025 James Ferris <ferrous.communications@gmail.com>
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observability hooks for header parsing.
//!
//! Provides tracing integration and a metrics sink the header dispatcher
//! reports to, for monitoring decoded, discarded, and unknown header fields.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use sip_observe::{set_parse_metrics, TracingParseMetrics};
//! set_parse_metrics(Arc::new(TracingParseMetrics));
//! // Parse events now emitted via tracing
//! ```

use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::Level;

/// Metrics sink used by the header dispatcher.
///
/// `header` is always a registered class name or a raw field name taken from
/// the wire; implementations exporting to metric backends should bound the
/// cardinality of the latter. `reason` is a short static label.
pub trait ParseMetrics: Send + Sync + 'static {
    fn on_decoded(&self, header: &str);
    fn on_decode_failed(&self, header: &str, reason: &'static str);
    fn on_duplicate(&self, header: &str);
    fn on_unknown(&self, header: &str);
    fn on_encoded(&self, header: &str, bytes: usize);
}

#[derive(Debug, Default)]
struct NoopParseMetrics;

impl ParseMetrics for NoopParseMetrics {
    fn on_decoded(&self, _header: &str) {}
    fn on_decode_failed(&self, _header: &str, _reason: &'static str) {}
    fn on_duplicate(&self, _header: &str) {}
    fn on_unknown(&self, _header: &str) {}
    fn on_encoded(&self, _header: &str, _bytes: usize) {}
}

static PARSE_METRICS: OnceCell<Arc<dyn ParseMetrics>> = OnceCell::new();
static NOOP_PARSE_METRICS: NoopParseMetrics = NoopParseMetrics;

/// Installs the global parse metrics implementation.
///
/// Returns `true` if the sink was installed, or `false` if one was already
/// configured.
pub fn set_parse_metrics(metrics: Arc<dyn ParseMetrics>) -> bool {
    PARSE_METRICS.set(metrics).is_ok()
}

/// Returns the currently configured parse metrics sink.
pub fn parse_metrics() -> &'static dyn ParseMetrics {
    PARSE_METRICS
        .get()
        .map(|arc| arc.as_ref())
        .unwrap_or(&NOOP_PARSE_METRICS)
}

/// Creates a tracing span for a header operation (`"decode"`, `"encode"`).
pub fn span_with_header(op: &'static str, header: &str) -> tracing::Span {
    tracing::span!(Level::DEBUG, "header", op = op, header = header)
}

/// Metrics implementation that logs via `tracing`.
#[derive(Debug, Default)]
pub struct TracingParseMetrics;

impl ParseMetrics for TracingParseMetrics {
    fn on_decoded(&self, header: &str) {
        tracing::trace!(header, "header decoded");
    }

    fn on_decode_failed(&self, header: &str, reason: &'static str) {
        tracing::debug!(header, reason, "header discarded");
    }

    fn on_duplicate(&self, header: &str) {
        tracing::debug!(header, "duplicate single header");
    }

    fn on_unknown(&self, header: &str) {
        tracing::trace!(header, "no codec registered");
    }

    fn on_encoded(&self, header: &str, bytes: usize) {
        tracing::trace!(header, bytes, "header encoded");
    }
}
