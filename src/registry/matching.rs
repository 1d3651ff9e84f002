use crate::predicate::constraint::ConstraintRef;
use crate::predicate::weight::Weight;
use crate::registry::node::{ImplementationList, ImplementationNode};

pub(crate) enum SingleMatch<'a, D, W> {
    Found(&'a ImplementationNode<D, W>),
    Ambiguous(&'a ImplementationNode<D, W>, &'a ImplementationNode<D, W>),
    None,
}

/// Every matching node, heaviest first.
pub(crate) fn select_all<'a, D, W: Weight>(
    list: &'a ImplementationList<D, W>,
    constraints: &[ConstraintRef],
) -> Vec<&'a ImplementationNode<D, W>> {
    list.nodes()
        .iter()
        .filter(|node| node.matches(constraints))
        .collect()
}

/// The heaviest matching node, unless a node tied with it also matches.
pub(crate) fn select_single<'a, D, W: Weight>(
    list: &'a ImplementationList<D, W>,
    constraints: &[ConstraintRef],
) -> SingleMatch<'a, D, W> {
    let nodes = list.nodes();
    let Some(index) = nodes.iter().position(|node| node.matches(constraints)) else {
        return SingleMatch::None;
    };

    let found = &nodes[index];
    for tied in nodes[index + 1..].iter().take_while(|n| n.same_weight_as_left()) {
        if tied.matches(constraints) {
            return SingleMatch::Ambiguous(found, tied);
        }
    }
    SingleMatch::Found(found)
}

pub(crate) fn describe(constraints: &[ConstraintRef]) -> String {
    format!("{constraints:?}")
}
