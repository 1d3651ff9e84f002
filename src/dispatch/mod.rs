pub mod lazy;
pub mod merges;

pub use lazy::LazyDispatch;
pub use merges::{ConstraintMerge, ConstraintMerges, MergeFunction, PredicateMerge, PredicateMerges};
