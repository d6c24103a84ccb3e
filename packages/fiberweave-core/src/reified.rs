use crate::ids::{ElementType, Key};
use crate::spec::{Props, YieldSpec};

/// The captured form of a yield: what the enclosing coroutine resumes with.
///
/// Stored as the `output` of the fragment fiber created for the yield.
#[derive(Clone, Debug, PartialEq)]
pub struct ReifiedYield {
    pub continuation: ElementType,
    pub key: Option<Key>,
    pub props: Props,
}

/// Capture a yield spec. Pure; the spec is not retained.
pub fn create_reified_yield(spec: &YieldSpec) -> ReifiedYield {
    ReifiedYield {
        continuation: spec.continuation.clone(),
        key: spec.key.clone(),
        props: spec.props.clone(),
    }
}
