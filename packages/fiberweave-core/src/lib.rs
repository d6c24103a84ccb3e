#![forbid(unsafe_code)]
//! Incremental child reconciliation for a double-buffered fiber tree.
//! Given a parent fiber, the child chain it produced last pass and a new
//! description of its children, build the new chain, cloning prior fibers
//! whose type and key still line up so their subtrees carry over.
//! Node storage and diagnostics are pluggable through the traits defined here.

pub mod child_fiber;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fiber;
pub mod ids;
#[cfg(feature = "serde")]
mod json;
pub mod matcher;
pub mod reified;
pub mod spec;
pub mod traits;
pub mod tree;

pub use child_fiber::{reconcile_child_fibers, ChildReconciler};
pub use classify::{classify, Classified, SpecKind, SpecShape};
pub use config::{DiagnosticLevel, DiagnosticsConfig};
pub use diagnostics::{
    ChildPosition, DiagnosticEvent, DiagnosticSink, NoopSink, Placement, RecordingSink,
    TracingSink, UnrecognizedChild,
};
pub use error::{Error, Result};
pub use fiber::{Fiber, FiberKind, FiberOutput};
pub use ids::{ElementType, FiberId, Key, PriorityLevel};
pub use matcher::{can_reuse, decide, LeafSpec, MatchDecision};
pub use reified::{create_reified_yield, ReifiedYield};
pub use spec::{ChildSpec, CoroutineSpec, ElementSpec, PropValue, Props, YieldSpec};
pub use traits::FiberStore;
pub use tree::{FiberTree, Siblings};
