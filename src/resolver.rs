use crate::config::ResolverConfig;
use crate::dispatch::{ConstraintMerges, PredicateMerges};
use crate::predicate::{Constraint, Constraints, NeutralWeight, Predicate, Predicates, QualifiedBy, Weight};
use crate::registry::{InterfaceRegistry, Placement, RegistrySnapshot};
use crate::types::{ConfigurationError, DependencyHandle, InterfaceId, QueryError, Resolution};

/// Entry point used by a dependency container: declares interfaces and their
/// implementations, and answers which implementation(s) back an interface.
///
/// `QualifiedBy` merge functions, for predicates and for constraints, are
/// registered on construction.
pub struct Resolver<D, W = NeutralWeight> {
    config: ResolverConfig,
    predicate_merges: PredicateMerges<W>,
    constraint_merges: ConstraintMerges,
    interfaces: InterfaceRegistry<D, W>,
}

impl<D: DependencyHandle, W: Weight> Default for Resolver<D, W> {
    fn default() -> Self {
        Self::with_config(ResolverConfig::default())
    }
}

impl<D: DependencyHandle, W: Weight> Resolver<D, W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        let resolver = Self {
            config,
            predicate_merges: PredicateMerges::new(),
            constraint_merges: ConstraintMerges::new(),
            interfaces: InterfaceRegistry::new(),
        };
        resolver.register_merge::<QualifiedBy, _>(QualifiedBy::merge);
        resolver.register_constraint_merge::<QualifiedBy, _>(QualifiedBy::merge);
        resolver
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn declare_interface(&self, interface: InterfaceId) -> InterfaceId {
        self.interfaces.register(interface, self.config.redeclare);
        interface
    }

    pub fn has_interface(&self, interface: &InterfaceId) -> bool {
        self.interfaces.has_interface(interface)
    }

    /// Declare `dependency` as a candidate implementation of `interface`.
    ///
    /// Predicates of the same type are merged first; this fails when no merge
    /// function is registered for that type. Nothing is recorded on failure.
    pub fn declare_implementation(
        &self,
        interface: InterfaceId,
        dependency: D,
        predicates: Predicates<W>,
    ) -> Result<D, ConfigurationError> {
        self.place_implementation(interface, dependency.clone(), predicates)?;
        Ok(dependency)
    }

    /// Same as [`declare_implementation`](Self::declare_implementation), also
    /// reporting where the implementation was placed.
    pub fn place_implementation(
        &self,
        interface: InterfaceId,
        dependency: D,
        predicates: Predicates<W>,
    ) -> Result<Placement, ConfigurationError> {
        if !self.interfaces.has_interface(&interface) {
            return Err(ConfigurationError::UnknownInterface(interface.name().to_string()));
        }
        if self.config.check_subtypes && dependency.is_subtype_of(&interface) == Some(false) {
            return Err(ConfigurationError::TypeMismatch {
                interface: interface.name().to_string(),
                implementation: format!("{dependency:?}"),
            });
        }

        let predicates = predicates.into_distinct(&self.predicate_merges)?;
        self.interfaces
            .register_implementation(interface, dependency, predicates)
    }

    pub fn register_merge<P, F>(&self, merge: F)
    where
        P: Predicate<W>,
        F: Fn(&P, &P) -> P + Send + Sync + 'static,
    {
        self.predicate_merges.register::<P, F>(merge);
    }

    pub fn register_constraint_merge<C, F>(&self, merge: F)
    where
        C: Constraint,
        F: Fn(&C, &C) -> C + Send + Sync + 'static,
    {
        self.constraint_merges.register::<C, F>(merge);
    }

    pub fn query(
        &self,
        interface: &InterfaceId,
        constraints: &Constraints,
        want_all: bool,
    ) -> Result<Resolution<D>, QueryError> {
        let constraints = constraints.combine(&self.constraint_merges)?;
        self.interfaces.query(interface, &constraints, want_all)
    }

    /// The highest-weight implementation matching `constraints`.
    ///
    /// Fails with [`QueryError::Ambiguous`] when another implementation of the
    /// same weight matches too.
    pub fn query_single(&self, interface: &InterfaceId, constraints: &Constraints) -> Result<D, QueryError> {
        let constraints = constraints.combine(&self.constraint_merges)?;
        self.interfaces.query_single(interface, &constraints)
    }

    /// Every implementation matching `constraints`, heaviest first. Empty if none match.
    pub fn query_all(&self, interface: &InterfaceId, constraints: &Constraints) -> Result<Vec<D>, QueryError> {
        let constraints = constraints.combine(&self.constraint_merges)?;
        self.interfaces.query_all(interface, &constraints)
    }

    pub fn implementations(&self, interface: &InterfaceId) -> Option<Vec<D>> {
        self.interfaces.implementations(interface)
    }

    pub fn excluded(&self, interface: &InterfaceId) -> Option<Vec<D>> {
        self.interfaces.excluded(interface)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.interfaces.snapshot()
    }

    pub fn predicate_merges(&self) -> &PredicateMerges<W> {
        &self.predicate_merges
    }

    pub fn constraint_merges(&self) -> &ConstraintMerges {
        &self.constraint_merges
    }
}
