use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::PredicateMerges;
use crate::predicate::qualifier::{QualifiedBy, Qualifier};
use crate::predicate::weight::Weight;
use crate::types::{ConfigurationError, PredicateType};

/// Condition attached to an implementation.
///
/// `weight` is called once, when the implementation is declared. Returning
/// `None` excludes the implementation from every query.
///
/// At most one predicate of a given type ends up on an implementation; several
/// of the same type are merged with the function registered for it.
///
/// No registry lock is held while `weight` runs: it may query the resolver.
pub trait Predicate<W: Weight>: Any + fmt::Debug + Send + Sync {
    fn weight(&self) -> Option<W>;
}

/// Object-safe view of a [`Predicate`], implemented for every predicate.
pub trait ErasedPredicate<W>: fmt::Debug + Send + Sync {
    fn erased_weight(&self) -> Option<W>;

    fn as_any(&self) -> &dyn Any;

    fn predicate_type(&self) -> PredicateType;
}

impl<W: Weight, P: Predicate<W>> ErasedPredicate<W> for P {
    fn erased_weight(&self) -> Option<W> {
        <P as Predicate<W>>::weight(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn predicate_type(&self) -> PredicateType {
        PredicateType::of::<P>()
    }
}

pub type PredicateRef<W> = Arc<dyn ErasedPredicate<W>>;

/// Predicates declared for one implementation, in declaration order.
#[derive(Debug, Clone)]
pub struct Predicates<W> {
    items: Vec<PredicateRef<W>>,
}

impl<W: Weight> Default for Predicates<W> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<W: Weight> Predicates<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<P: Predicate<W>>(mut self, predicate: P) -> Self {
        self.push(predicate);
        self
    }

    pub fn push<P: Predicate<W>>(&mut self, predicate: P) {
        self.items.push(Arc::new(predicate));
    }

    /// Shorthand for `with(QualifiedBy::new(qualifiers)?)`.
    pub fn qualified_by(
        self,
        qualifiers: impl IntoIterator<Item = Qualifier>,
    ) -> Result<Self, ConfigurationError> {
        Ok(self.with(QualifiedBy::new(qualifiers)?))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Collapse predicates sharing a concrete type into one, keeping the
    /// position of the first occurrence.
    pub(crate) fn into_distinct(
        self,
        merges: &PredicateMerges<W>,
    ) -> Result<Vec<PredicateRef<W>>, ConfigurationError> {
        let mut distinct: Vec<PredicateRef<W>> = Vec::with_capacity(self.items.len());
        let mut positions: HashMap<PredicateType, usize> = HashMap::new();

        for predicate in self.items {
            let key = predicate.predicate_type();
            match positions.get(&key) {
                Some(&index) => {
                    let merge = merges.get(key)?.ok_or_else(|| ConfigurationError::MissingMerge {
                        predicate: key.name().to_string(),
                    })?;
                    distinct[index] = merge.apply(distinct[index].as_ref(), predicate.as_ref())?;
                }
                None => {
                    positions.insert(key, distinct.len());
                    distinct.push(predicate);
                }
            }
        }

        Ok(distinct)
    }
}
