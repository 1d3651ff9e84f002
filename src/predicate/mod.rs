pub mod constraint;
pub mod predicate;
pub mod qualifier;
pub mod weight;

pub use constraint::{Constraint, ConstraintRef, Constraints, ErasedConstraint};
pub use predicate::{ErasedPredicate, Predicate, PredicateRef, Predicates};
pub use qualifier::{QualifiedBy, QualifiedByInstanceOf, QualifiedByOneOf, Qualifier};
pub use weight::{NeutralWeight, QualifierWeight, Weight};
