use std::any::Any;

use crate::predicate::constraint::ConstraintRef;
use crate::predicate::predicate::PredicateRef;
use crate::predicate::weight::{same_weight, Weight};
use crate::types::PredicateType;

/// One candidate implementation of an interface.
#[derive(Debug, Clone)]
pub struct ImplementationNode<D, W> {
    dependency: D,
    /// At most one predicate per concrete type.
    predicates: Vec<PredicateRef<W>>,
    weight: W,
    same_weight_as_left: bool,
}

impl<D, W: Weight> ImplementationNode<D, W> {
    pub(crate) fn new(dependency: D, predicates: Vec<PredicateRef<W>>, weight: W) -> Self {
        Self {
            dependency,
            predicates,
            weight,
            same_weight_as_left: false,
        }
    }

    pub fn dependency(&self) -> &D {
        &self.dependency
    }

    pub fn weight(&self) -> &W {
        &self.weight
    }

    /// Whether the node ties with the one ranked right before it.
    pub fn same_weight_as_left(&self) -> bool {
        self.same_weight_as_left
    }

    pub fn predicate_types(&self) -> impl Iterator<Item = PredicateType> + '_ {
        self.predicates.iter().map(|p| p.predicate_type())
    }

    fn predicate_of(&self, tpe: PredicateType) -> Option<&dyn Any> {
        self.predicates
            .iter()
            .find(|p| p.predicate_type() == tpe)
            .map(|p| p.as_any())
    }

    /// Every constraint must accept the node's predicate of its target type,
    /// or `None` if the node has none.
    pub fn matches(&self, constraints: &[ConstraintRef]) -> bool {
        constraints
            .iter()
            .all(|constraint| constraint.evaluate_any(self.predicate_of(constraint.target())))
    }
}

/// Sum of the predicates' weights, in order.
///
/// Stops at the first predicate without weight: later predicates are not
/// evaluated. No predicates at all weigh `W::of_neutral(None)`.
pub(crate) fn combined_weight<W: Weight>(predicates: &[PredicateRef<W>]) -> Option<W> {
    if predicates.is_empty() {
        return Some(W::of_neutral(None));
    }

    let mut total: Option<W> = None;
    for predicate in predicates {
        let weight = predicate.erased_weight()?;
        total = Some(match total {
            Some(sum) => sum + weight,
            None => weight,
        });
    }
    total
}

/// Implementations of one interface, ordered by non-increasing weight.
/// Equal weights keep registration order.
#[derive(Debug, Clone)]
pub struct ImplementationList<D, W> {
    nodes: Vec<ImplementationNode<D, W>>,
    /// Declared but without weight; never matched.
    excluded: Vec<D>,
}

impl<D, W> Default for ImplementationList<D, W> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            excluded: Vec::new(),
        }
    }
}

impl<D, W: Weight> ImplementationList<D, W> {
    pub fn nodes(&self) -> &[ImplementationNode<D, W>] {
        &self.nodes
    }

    pub fn excluded(&self) -> &[D] {
        &self.excluded
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert after every node that is not strictly lighter and return the position.
    pub(crate) fn insert(&mut self, mut node: ImplementationNode<D, W>) -> usize {
        let pos = self.nodes.partition_point(|n| !(n.weight < node.weight));

        node.same_weight_as_left = pos > 0 && same_weight(&self.nodes[pos - 1].weight, &node.weight);
        let right_tied = self
            .nodes
            .get(pos)
            .map(|right| same_weight(&node.weight, &right.weight));

        self.nodes.insert(pos, node);
        if let Some(tied) = right_tied {
            self.nodes[pos + 1].same_weight_as_left = tied;
        }

        debug_assert!(self.nodes.windows(2).all(|w| !(w[0].weight < w[1].weight)));
        pos
    }

    pub(crate) fn exclude(&mut self, dependency: D) {
        self.excluded.push(dependency);
    }
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;
    use std::sync::Arc;

    use super::*;
    use crate::predicate::qualifier::{QualifiedBy, Qualifier};
    use crate::predicate::weight::QualifierWeight;

    fn node(name: &'static str, weight: usize) -> ImplementationNode<&'static str, QualifierWeight> {
        ImplementationNode::new(name, Vec::new(), QualifierWeight(weight))
    }

    fn order(list: &ImplementationList<&'static str, QualifierWeight>) -> Vec<(&'static str, bool)> {
        list.nodes()
            .iter()
            .map(|n| (*n.dependency(), n.same_weight_as_left()))
            .collect()
    }

    #[test]
    fn insertion_keeps_non_increasing_order_and_registration_order_on_ties() {
        let mut list = ImplementationList::default();
        assert_eq!(list.insert(node("a", 1)), 0);
        assert_eq!(list.insert(node("b", 3)), 0);
        assert_eq!(list.insert(node("c", 1)), 2);
        assert_eq!(list.insert(node("d", 2)), 1);
        assert_eq!(list.insert(node("e", 3)), 1);

        assert_eq!(
            order(&list),
            vec![("b", false), ("e", true), ("d", false), ("a", false), ("c", true)]
        );
    }

    #[test]
    fn inserting_between_ties_recomputes_the_right_neighbour() {
        let mut list = ImplementationList::default();
        list.insert(node("low", 0));
        list.insert(node("high", 2));
        list.insert(node("mid", 1));

        assert_eq!(order(&list), vec![("high", false), ("mid", false), ("low", false)]);
    }

    #[test]
    fn node_exposes_its_predicate_types() {
        let qualified: PredicateRef<QualifierWeight> =
            Arc::new(QualifiedBy::new([Qualifier::named("x")]).unwrap());
        let qualified_node = ImplementationNode::new("q", vec![qualified], QualifierWeight(1));

        let types: Vec<PredicateType> = qualified_node.predicate_types().collect();
        assert_eq!(types, vec![PredicateType::of::<QualifiedBy>()]);
        assert_eq!(types[0].type_id(), TypeId::of::<QualifiedBy>());
        assert_eq!(node("bare", 0).predicate_types().count(), 0);
    }

    #[test]
    fn empty_predicates_weigh_neutral() {
        let weight: Option<QualifierWeight> = combined_weight(&[]);
        assert_eq!(weight, Some(QualifierWeight(0)));
    }
}
