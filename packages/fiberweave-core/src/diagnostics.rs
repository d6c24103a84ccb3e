//! Diagnostics emitted while reconciling.
//!
//! The reconciler reports through a [`DiagnosticSink`]. Every method defaults
//! to a no-op and none of them can fail, so reporting never changes the
//! outcome of a pass. [`TracingSink`] forwards to `tracing`, [`RecordingSink`]
//! keeps events around for assertions, [`NoopSink`] drops them.

use crate::classify::SpecShape;
use crate::config::{DiagnosticLevel, DiagnosticsConfig};
use crate::fiber::FiberKind;
use crate::ids::FiberId;
use crate::matcher::MatchDecision;

/// Which call shape hit the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildPosition {
    /// No fiber has been placed in the chain yet.
    First,
    /// The item would have been linked after an existing tail.
    Subsequent,
}

/// A child value the reconciler could not place.
#[derive(Clone, Debug, PartialEq)]
pub struct UnrecognizedChild {
    pub parent: FiberId,
    pub position: ChildPosition,
    pub shape: SpecShape,
    /// Human-readable rendering of the value.
    pub detail: String,
}

/// A fiber placed into a new chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub parent: FiberId,
    pub fiber: FiberId,
    pub kind: FiberKind,
    pub decision: MatchDecision,
}

pub trait DiagnosticSink {
    fn unrecognized_child(&mut self, _event: &UnrecognizedChild) {}
    fn placement(&mut self, _event: &Placement) {}
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for &mut D {
    fn unrecognized_child(&mut self, event: &UnrecognizedChild) {
        (**self).unrecognized_child(event);
    }

    fn placement(&mut self, event: &Placement) {
        (**self).placement(event);
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {}

/// Forwards diagnostics to the `tracing` subscriber installed by the host.
#[derive(Clone, Debug, Default)]
pub struct TracingSink {
    config: DiagnosticsConfig,
}

impl TracingSink {
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }
}

macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            DiagnosticLevel::Off => {}
            DiagnosticLevel::Error => tracing::error!($($arg)+),
            DiagnosticLevel::Warn => tracing::warn!($($arg)+),
            DiagnosticLevel::Info => tracing::info!($($arg)+),
            DiagnosticLevel::Debug => tracing::debug!($($arg)+),
            DiagnosticLevel::Trace => tracing::trace!($($arg)+),
        }
    };
}

impl DiagnosticSink for TracingSink {
    fn unrecognized_child(&mut self, event: &UnrecognizedChild) {
        event_at!(
            self.config.unrecognized_level,
            parent = %event.parent,
            position = ?event.position,
            shape = ?event.shape,
            detail = %event.detail,
            "unknown child"
        );
    }

    fn placement(&mut self, event: &Placement) {
        if !self.config.trace_placements {
            return;
        }
        tracing::trace!(
            parent = %event.parent,
            fiber = %event.fiber,
            kind = ?event.kind,
            decision = ?event.decision,
            "placed fiber"
        );
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticEvent {
    Unrecognized(UnrecognizedChild),
    Placement(Placement),
}

/// Keeps every event in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Vec<DiagnosticEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = &UnrecognizedChild> {
        self.events.iter().filter_map(|e| match e {
            DiagnosticEvent::Unrecognized(u) => Some(u),
            DiagnosticEvent::Placement(_) => None,
        })
    }

    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.events.iter().filter_map(|e| match e {
            DiagnosticEvent::Placement(p) => Some(p),
            DiagnosticEvent::Unrecognized(_) => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn unrecognized_child(&mut self, event: &UnrecognizedChild) {
        self.events.push(DiagnosticEvent::Unrecognized(event.clone()));
    }

    fn placement(&mut self, event: &Placement) {
        self.events.push(DiagnosticEvent::Placement(*event));
    }
}
