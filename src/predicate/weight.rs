use std::any::Any;
use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::predicate::qualifier::QualifiedBy;

/// Ordering contribution of a predicate.
///
/// Implementations are ordered by the sum of their predicates' weights: `<`
/// orders and `+` combines. All methods run at registration time only, never
/// while querying.
pub trait Weight: PartialOrd + Add<Output = Self> + Clone + fmt::Debug + Send + Sync + 'static {
    /// Weight of a predicate with no opinion on ordering, or of an
    /// implementation without predicates when `predicate` is `None`.
    fn of_neutral(predicate: Option<&dyn Any>) -> Self;
}

/// Every implementation ranks the same. Ties are reported for single queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeutralWeight;

impl PartialOrd for NeutralWeight {
    fn partial_cmp(&self, _other: &Self) -> Option<std::cmp::Ordering> {
        Some(std::cmp::Ordering::Equal)
    }
}

impl Add for NeutralWeight {
    type Output = NeutralWeight;

    fn add(self, _other: Self) -> Self::Output {
        self
    }
}

impl Weight for NeutralWeight {
    fn of_neutral(_predicate: Option<&dyn Any>) -> Self {
        NeutralWeight
    }
}

impl fmt::Display for NeutralWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("N")
    }
}

/// Ranks implementations by how many qualifiers they carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifierWeight(pub usize);

impl Add for QualifierWeight {
    type Output = QualifierWeight;

    fn add(self, other: Self) -> Self::Output {
        QualifierWeight(self.0 + other.0)
    }
}

impl Weight for QualifierWeight {
    fn of_neutral(predicate: Option<&dyn Any>) -> Self {
        match predicate.and_then(|p| p.downcast_ref::<QualifiedBy>()) {
            Some(qualified_by) => QualifierWeight(qualified_by.qualifiers().len()),
            None => QualifierWeight(0),
        }
    }
}

/// Strictly-less comparison both ways fails: the weights tie.
pub(crate) fn same_weight<W: Weight>(a: &W, b: &W) -> bool {
    !(a < b) && !(b < a)
}
