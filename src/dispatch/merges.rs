use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::lazy::LazyDispatch;
use crate::predicate::constraint::{Constraint, ConstraintRef, ErasedConstraint};
use crate::predicate::predicate::{ErasedPredicate, Predicate, PredicateRef};
use crate::predicate::weight::Weight;
use crate::types::{ConfigurationError, PredicateType};

/// Type-erased binary merge function, tagged with the type it merges.
pub struct MergeFunction<T: ?Sized> {
    input: PredicateType,
    func: Arc<dyn Fn(&dyn Any, &dyn Any) -> Option<Arc<T>> + Send + Sync>,
}

impl<T: ?Sized> MergeFunction<T> {
    pub fn input(&self) -> PredicateType {
        self.input
    }

    fn merge_any(&self, a: &dyn Any, b: &dyn Any) -> Result<Arc<T>, ConfigurationError> {
        (self.func)(a, b).ok_or_else(|| ConfigurationError::MergeFailed {
            key: self.input.name().to_string(),
        })
    }
}

impl<T: ?Sized> Clone for MergeFunction<T> {
    fn clone(&self) -> Self {
        Self {
            input: self.input,
            func: Arc::clone(&self.func),
        }
    }
}

impl<T: ?Sized> fmt::Debug for MergeFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MergeFunction({})", self.input)
    }
}

pub type PredicateMerge<W> = MergeFunction<dyn ErasedPredicate<W>>;
pub type ConstraintMerge = MergeFunction<dyn ErasedConstraint>;

impl<W: Weight> PredicateMerge<W> {
    pub(crate) fn apply(
        &self,
        a: &dyn ErasedPredicate<W>,
        b: &dyn ErasedPredicate<W>,
    ) -> Result<PredicateRef<W>, ConfigurationError> {
        self.merge_any(a.as_any(), b.as_any())
    }
}

impl ConstraintMerge {
    pub(crate) fn apply(
        &self,
        a: &dyn ErasedConstraint,
        b: &dyn ErasedConstraint,
    ) -> Result<ConstraintRef, ConfigurationError> {
        self.merge_any(a.as_any(), b.as_any())
    }
}

fn input_of<T: ?Sized>(f: &MergeFunction<T>) -> PredicateType {
    f.input
}

/// Merge functions for predicates sharing a type on one implementation.
pub struct PredicateMerges<W> {
    dispatch: LazyDispatch<PredicateType, PredicateMerge<W>>,
}

impl<W: Weight> Default for PredicateMerges<W> {
    fn default() -> Self {
        Self {
            dispatch: LazyDispatch::new("predicate_merge"),
        }
    }
}

impl<W: Weight> PredicateMerges<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P, F>(&self, merge: F)
    where
        P: Predicate<W>,
        F: Fn(&P, &P) -> P + Send + Sync + 'static,
    {
        let func = move |a: &dyn Any, b: &dyn Any| -> Option<PredicateRef<W>> {
            let merged = merge(a.downcast_ref::<P>()?, b.downcast_ref::<P>()?);
            Some(Arc::new(merged))
        };
        self.dispatch.register(
            input_of,
            MergeFunction {
                input: PredicateType::of::<P>(),
                func: Arc::new(func),
            },
        );
    }

    pub fn get(&self, key: PredicateType) -> Result<Option<PredicateMerge<W>>, ConfigurationError> {
        self.dispatch.get(&key)
    }

    pub fn pending(&self) -> usize {
        self.dispatch.pending()
    }
}

impl<W> fmt::Debug for PredicateMerges<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dispatch.fmt(f)
    }
}

/// Merge functions for constraints sharing a type in one query.
///
/// Unlike predicates, several constraints of one type are allowed without
/// a merge function; merging only shortens evaluation.
pub struct ConstraintMerges {
    dispatch: LazyDispatch<PredicateType, ConstraintMerge>,
}

impl Default for ConstraintMerges {
    fn default() -> Self {
        Self {
            dispatch: LazyDispatch::new("predicate_constraint_merge"),
        }
    }
}

impl ConstraintMerges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C, F>(&self, merge: F)
    where
        C: Constraint,
        F: Fn(&C, &C) -> C + Send + Sync + 'static,
    {
        let func = move |a: &dyn Any, b: &dyn Any| -> Option<ConstraintRef> {
            let merged = merge(a.downcast_ref::<C>()?, b.downcast_ref::<C>()?);
            Some(Arc::new(merged))
        };
        self.dispatch.register(
            input_of,
            MergeFunction {
                input: PredicateType::of::<C>(),
                func: Arc::new(func),
            },
        );
    }

    pub fn get(&self, key: PredicateType) -> Result<Option<ConstraintMerge>, ConfigurationError> {
        self.dispatch.get(&key)
    }

    pub fn pending(&self) -> usize {
        self.dispatch.pending()
    }
}

impl fmt::Debug for ConstraintMerges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dispatch.fmt(f)
    }
}
