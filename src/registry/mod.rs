mod matching;
pub mod node;
pub mod snapshot;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, trace};

use crate::config::RedeclarePolicy;
use crate::predicate::constraint::ConstraintRef;
use crate::predicate::predicate::PredicateRef;
use crate::predicate::weight::Weight;
use crate::types::{ConfigurationError, DependencyHandle, InterfaceId, QueryError, Resolution};
use matching::{describe, select_all, select_single, SingleMatch};
pub use node::{ImplementationList, ImplementationNode};
pub use snapshot::{InterfaceEntry, NodeEntry, RegistrySnapshot};

/// Where a declared implementation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Inserted {
        position: usize,
        same_weight_as_left: bool,
    },
    /// A predicate had no weight: never returned by queries.
    Excluded,
}

/// Ordered implementations of every declared interface.
///
/// Lists are shared copy-on-write. Registration swaps in the new list under
/// the write lock; queries clone the list handle and evaluate constraints
/// after the lock is released. Predicate weights are computed before the
/// lock is taken, so user callbacks never run while it is held.
pub struct InterfaceRegistry<D, W> {
    interfaces: RwLock<HashMap<InterfaceId, Arc<ImplementationList<D, W>>>>,
}

impl<D, W> Default for InterfaceRegistry<D, W> {
    fn default() -> Self {
        Self {
            interfaces: RwLock::new(HashMap::new()),
        }
    }
}

impl<D: Clone, W: Clone> Clone for InterfaceRegistry<D, W> {
    /// Independent copy: later declarations on either side are not shared.
    fn clone(&self) -> Self {
        Self {
            interfaces: RwLock::new(self.interfaces.read().clone()),
        }
    }
}

impl<D: DependencyHandle, W: Weight> InterfaceRegistry<D, W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether a new, empty list was created.
    pub fn register(&self, interface: InterfaceId, policy: RedeclarePolicy) -> bool {
        let mut interfaces = self.interfaces.write();
        let known = interfaces.contains_key(&interface);
        match (known, policy) {
            (true, RedeclarePolicy::Keep) => {
                debug!(%interface, "Interface already declared, keeping implementations");
                false
            }
            _ => {
                debug!(%interface, reset = known, "Declared interface");
                interfaces.insert(interface, Arc::new(ImplementationList::default()));
                true
            }
        }
    }

    pub fn has_interface(&self, interface: &InterfaceId) -> bool {
        self.interfaces.read().contains_key(interface)
    }

    /// `predicates` must already hold at most one predicate per type.
    pub fn register_implementation(
        &self,
        interface: InterfaceId,
        dependency: D,
        predicates: Vec<PredicateRef<W>>,
    ) -> Result<Placement, ConfigurationError> {
        let unknown = || ConfigurationError::UnknownInterface(interface.name().to_string());
        if !self.has_interface(&interface) {
            return Err(unknown());
        }

        let weight = node::combined_weight(&predicates);

        let mut interfaces = self.interfaces.write();
        let implementations = interfaces
            .get_mut(&interface)
            .map(Arc::make_mut)
            .ok_or_else(unknown)?;

        let Some(weight) = weight else {
            info!(%interface, ?dependency, "Implementation excluded: a predicate has no weight");
            implementations.exclude(dependency);
            return Ok(Placement::Excluded);
        };

        let node = ImplementationNode::new(dependency, predicates, weight);
        let position = implementations.insert(node);
        let inserted = &implementations.nodes()[position];
        debug!(
            %interface,
            dependency = ?inserted.dependency(),
            weight = ?inserted.weight(),
            position,
            same_weight_as_left = inserted.same_weight_as_left(),
            "Registered implementation"
        );

        Ok(Placement::Inserted {
            position,
            same_weight_as_left: inserted.same_weight_as_left(),
        })
    }

    pub fn query(
        &self,
        interface: &InterfaceId,
        constraints: &[ConstraintRef],
        want_all: bool,
    ) -> Result<Resolution<D>, QueryError> {
        if want_all {
            self.query_all(interface, constraints).map(Resolution::Multiple)
        } else {
            self.query_single(interface, constraints).map(Resolution::Single)
        }
    }

    pub fn query_all(
        &self,
        interface: &InterfaceId,
        constraints: &[ConstraintRef],
    ) -> Result<Vec<D>, QueryError> {
        let implementations = self.list(interface)?;
        trace!(%interface, constraints = constraints.len(), "Querying all implementations");

        Ok(select_all(&implementations, constraints)
            .into_iter()
            .map(|node| node.dependency().clone())
            .collect())
    }

    pub fn query_single(
        &self,
        interface: &InterfaceId,
        constraints: &[ConstraintRef],
    ) -> Result<D, QueryError> {
        let implementations = self.list(interface)?;
        trace!(%interface, constraints = constraints.len(), "Querying single implementation");

        match select_single(&implementations, constraints) {
            SingleMatch::Found(node) => Ok(node.dependency().clone()),
            SingleMatch::Ambiguous(first, second) => Err(QueryError::Ambiguous {
                interface: interface.name().to_string(),
                constraints: describe(constraints),
                first: format!("{:?}", first.dependency()),
                second: format!("{:?}", second.dependency()),
            }),
            SingleMatch::None => Err(QueryError::NoMatch {
                interface: interface.name().to_string(),
                constraints: describe(constraints),
            }),
        }
    }

    /// Ordered dependencies of every weighted implementation.
    pub fn implementations(&self, interface: &InterfaceId) -> Option<Vec<D>> {
        self.interfaces.read().get(interface).map(|list| {
            list.nodes()
                .iter()
                .map(|node| node.dependency().clone())
                .collect()
        })
    }

    /// Dependencies declared with a predicate that had no weight.
    pub fn excluded(&self, interface: &InterfaceId) -> Option<Vec<D>> {
        self.interfaces
            .read()
            .get(interface)
            .map(|list| list.excluded().to_vec())
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let interfaces = self.interfaces.read();
        let entries = interfaces
            .iter()
            .map(|(interface, list)| InterfaceEntry {
                interface: interface.name().to_string(),
                implementations: list
                    .nodes()
                    .iter()
                    .map(|node| NodeEntry {
                        dependency: format!("{:?}", node.dependency()),
                        weight: format!("{:?}", node.weight()),
                        same_weight_as_left: node.same_weight_as_left(),
                    })
                    .collect(),
                excluded: list.excluded().iter().map(|d| format!("{d:?}")).collect(),
            })
            .collect();
        RegistrySnapshot::new(entries)
    }

    /// Current list of `interface`, detached from the lock.
    fn list(&self, interface: &InterfaceId) -> Result<Arc<ImplementationList<D, W>>, QueryError> {
        self.interfaces
            .read()
            .get(interface)
            .cloned()
            .ok_or_else(|| QueryError::UnknownInterface(interface.name().to_string()))
    }
}
