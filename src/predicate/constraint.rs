use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::ConstraintMerges;
use crate::predicate::qualifier::{QualifiedBy, Qualifier};
use crate::types::{ConfigurationError, PredicateType};

/// Query-time filter over one predicate type.
///
/// `evaluate` receives the implementation's predicate of type `Target`, or
/// `None` when the implementation has none. For a given predicate it must
/// always give the same answer. It runs on a detached copy of the
/// implementation list, so it may call back into the resolver.
pub trait Constraint: Any + fmt::Debug + Send + Sync {
    type Target: Any;

    fn evaluate(&self, predicate: Option<&Self::Target>) -> bool;
}

/// Object-safe view of a [`Constraint`].
pub trait ErasedConstraint: fmt::Debug + Send + Sync {
    /// Predicate type the constraint inspects.
    fn target(&self) -> PredicateType;

    fn constraint_type(&self) -> PredicateType;

    fn evaluate_any(&self, predicate: Option<&dyn Any>) -> bool;

    fn as_any(&self) -> &dyn Any;
}

impl<C: Constraint> ErasedConstraint for C {
    fn target(&self) -> PredicateType {
        PredicateType::of::<C::Target>()
    }

    fn constraint_type(&self) -> PredicateType {
        PredicateType::of::<C>()
    }

    fn evaluate_any(&self, predicate: Option<&dyn Any>) -> bool {
        match predicate {
            None => self.evaluate(None),
            Some(any) => match any.downcast_ref::<C::Target>() {
                Some(target) => self.evaluate(Some(target)),
                None => false,
            },
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub type ConstraintRef = Arc<dyn ErasedConstraint>;

/// Constraints of a query. All of them must hold for an implementation to match.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    items: Vec<ConstraintRef>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<C: Constraint>(mut self, constraint: C) -> Self {
        self.push(constraint);
        self
    }

    pub fn push<C: Constraint>(&mut self, constraint: C) {
        self.items.push(Arc::new(constraint));
    }

    /// The implementation must be qualified by every one of `qualifiers`.
    pub fn qualified_by(
        self,
        qualifiers: impl IntoIterator<Item = Qualifier>,
    ) -> Result<Self, ConfigurationError> {
        Ok(self.with(QualifiedBy::new(qualifiers)?))
    }

    /// The implementation must be qualified by at least one of `qualifiers`.
    pub fn qualified_by_one_of(
        self,
        qualifiers: impl IntoIterator<Item = Qualifier>,
    ) -> Result<Self, ConfigurationError> {
        Ok(self.with(QualifiedBy::one_of(qualifiers)?))
    }

    /// The implementation must carry a qualifier whose value is a `T`.
    pub fn qualified_by_instance_of<T: Any>(self) -> Self {
        self.with(QualifiedBy::instance_of::<T>())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Group constraints by concrete type and fold each group with its merge
    /// function when one is registered. Groups keep first-occurrence order.
    pub(crate) fn combine(
        &self,
        merges: &ConstraintMerges,
    ) -> Result<Vec<ConstraintRef>, ConfigurationError> {
        let mut groups: Vec<(PredicateType, Vec<ConstraintRef>)> = Vec::new();

        for constraint in &self.items {
            let key = constraint.constraint_type();
            let merge = merges.get(key)?;
            let index = match groups.iter().position(|(k, _)| *k == key) {
                Some(index) => index,
                None => {
                    groups.push((key, Vec::new()));
                    groups.len() - 1
                }
            };
            let group = &mut groups[index].1;
            match merge {
                Some(merge) if !group.is_empty() => {
                    let merged = merge.apply(group[0].as_ref(), constraint.as_ref())?;
                    group[0] = merged;
                }
                _ => group.push(Arc::clone(constraint)),
            }
        }

        Ok(groups.into_iter().flat_map(|(_, group)| group).collect())
    }
}

