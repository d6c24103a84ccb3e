use crate::spec::{ChildSpec, CoroutineSpec, ElementSpec, YieldSpec};

/// What an unrecognized child value looked like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecShape {
    Empty,
    Bool,
    Number,
    Text,
    Opaque,
}

/// Discriminant of a classified child value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpecKind {
    Element,
    Coroutine,
    Continuation,
    List,
    Unrecognized,
}

/// A child value sorted into the shapes the reconciler handles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Classified<'a> {
    Element(&'a ElementSpec),
    Coroutine(&'a CoroutineSpec),
    Continuation(&'a YieldSpec),
    List(&'a [ChildSpec]),
    Unrecognized(SpecShape),
}

impl Classified<'_> {
    pub fn kind(&self) -> SpecKind {
        match self {
            Classified::Element(_) => SpecKind::Element,
            Classified::Coroutine(_) => SpecKind::Coroutine,
            Classified::Continuation(_) => SpecKind::Continuation,
            Classified::List(_) => SpecKind::List,
            Classified::Unrecognized(_) => SpecKind::Unrecognized,
        }
    }
}

pub fn classify(spec: &ChildSpec) -> Classified<'_> {
    match spec {
        ChildSpec::Element(element) => Classified::Element(element),
        ChildSpec::Coroutine(coroutine) => Classified::Coroutine(coroutine),
        ChildSpec::Yield(yield_spec) => Classified::Continuation(yield_spec),
        ChildSpec::List(items) => Classified::List(items),
        ChildSpec::Empty => Classified::Unrecognized(SpecShape::Empty),
        ChildSpec::Bool(_) => Classified::Unrecognized(SpecShape::Bool),
        ChildSpec::Number(_) => Classified::Unrecognized(SpecShape::Number),
        ChildSpec::Text(_) => Classified::Unrecognized(SpecShape::Text),
        ChildSpec::Opaque(_) => Classified::Unrecognized(SpecShape::Opaque),
    }
}

/// Short rendering of a child value for diagnostics.
pub(crate) fn describe(spec: &ChildSpec) -> String {
    match spec {
        ChildSpec::Element(e) => format!("<{}>", e.element_type),
        ChildSpec::Coroutine(c) => format!("coroutine <{}>", c.handler),
        ChildSpec::Yield(y) => format!("yield <{}>", y.continuation),
        ChildSpec::List(items) => format!("list of {}", items.len()),
        ChildSpec::Empty => "null".to_owned(),
        ChildSpec::Bool(b) => b.to_string(),
        ChildSpec::Number(n) => n.to_string(),
        ChildSpec::Text(t) => format!("{t:?}"),
        ChildSpec::Opaque(rendered) => rendered.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Props;

    #[test]
    fn tagged_values_classify_by_tag() {
        let element = ChildSpec::element("div", None, Props::new());
        assert_eq!(classify(&element).kind(), SpecKind::Element);
        assert_eq!(
            classify(&CoroutineSpec::new("h").into()).kind(),
            SpecKind::Coroutine
        );
        assert_eq!(
            classify(&YieldSpec::new("k").into()).kind(),
            SpecKind::Continuation
        );
        let list = ChildSpec::list([element.clone(), element]);
        assert!(matches!(classify(&list), Classified::List(items) if items.len() == 2));
    }

    #[test]
    fn primitives_are_unrecognized() {
        let cases = [
            (ChildSpec::Empty, SpecShape::Empty),
            (ChildSpec::Bool(true), SpecShape::Bool),
            (ChildSpec::Number(4.0), SpecShape::Number),
            (ChildSpec::Text("hi".into()), SpecShape::Text),
            (ChildSpec::Opaque("{}".into()), SpecShape::Opaque),
        ];
        for (spec, shape) in cases {
            assert_eq!(classify(&spec), Classified::Unrecognized(shape));
        }
    }

    #[test]
    fn empty_list_is_still_a_list() {
        assert_eq!(classify(&ChildSpec::List(Vec::new())).kind(), SpecKind::List);
    }
}
