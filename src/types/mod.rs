pub mod identifiers;
pub mod resolution;

pub use identifiers::{Dependency, DependencyHandle, InterfaceId, PredicateType};
pub use resolution::{ConfigurationError, QueryError, Resolution};
