//! Deterministic interface-to-implementation resolution.
//!
//! `interface-core` decides which registered implementation(s) back an
//! interface. Implementations carry typed predicates whose weights order
//! them; queries filter them with constraints. Ordering is fixed at
//! declaration time: identical declarations always resolve identically.
//!
//! Building and caching instances is left to the surrounding container,
//! which only hands opaque dependency handles to this crate.
//!
//! ```
//! use interface_core::predicate::{Constraints, Predicates, Qualifier, QualifierWeight};
//! use interface_core::{InterfaceId, Resolver};
//!
//! trait Storage {}
//!
//! let resolver: Resolver<&'static str, QualifierWeight> = Resolver::new();
//! let storage = resolver.declare_interface(InterfaceId::of::<dyn Storage>());
//! let aws = Qualifier::named("aws");
//!
//! resolver
//!     .declare_implementation(storage, "s3", Predicates::new().qualified_by([aws.clone()]).unwrap())
//!     .unwrap();
//! resolver.declare_implementation(storage, "local", Predicates::new()).unwrap();
//!
//! assert_eq!(resolver.query_all(&storage, &Constraints::new()).unwrap(), vec!["s3", "local"]);
//! let only_aws = Constraints::new().qualified_by([aws]).unwrap();
//! assert_eq!(resolver.query_single(&storage, &only_aws).unwrap(), "s3");
//! ```

pub mod config;
pub mod dispatch;
pub mod predicate;
pub mod registry;
pub mod resolver;
pub mod types;

pub use config::{ConfigError, RedeclarePolicy, ResolverConfig};
pub use resolver::Resolver;
pub use types::{ConfigurationError, Dependency, DependencyHandle, InterfaceId, QueryError, Resolution};
