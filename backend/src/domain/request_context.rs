//! Per-request context threaded from handlers into the domain.

use tracing::Span;

use super::TraceId;

/// Trace identifier and logging span for one request.
///
/// The request pipeline installs one of these before any handler runs.
/// Services log through [`RequestContext::span`] so every event carries the
/// request's trace id.
#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: TraceId,
    span: Span,
}

impl RequestContext {
    pub fn new(trace_id: TraceId, span: Span) -> Self {
        Self { trace_id, span }
    }

    /// Context with a fresh trace id and a disabled span, for tests and tools.
    pub fn detached() -> Self {
        Self::new(TraceId::generate(), Span::none())
    }

    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}
