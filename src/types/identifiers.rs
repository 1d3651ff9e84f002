use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Type-identity token under which implementations are grouped.
///
/// Usually created from a trait object type, e.g. `InterfaceId::of::<dyn Storage>()`.
#[derive(Clone, Copy)]
pub struct InterfaceId {
    id: TypeId,
    name: &'static str,
}

impl InterfaceId {
    pub fn of<I: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<I>(),
            name: type_name::<I>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for InterfaceId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for InterfaceId {}

impl Hash for InterfaceId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InterfaceId({})", self.name)
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Concrete type of a predicate or a constraint.
/// Used as the key for merge functions and for matching constraints to predicates.
#[derive(Clone, Copy)]
pub struct PredicateType {
    id: TypeId,
    name: &'static str,
}

impl PredicateType {
    pub fn of<P: 'static>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            name: type_name::<P>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for PredicateType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PredicateType {}

impl Hash for PredicateType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for PredicateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Opaque handle identifying how the surrounding container obtains an instance.
///
/// The registry only clones, compares and returns handles.
pub trait DependencyHandle: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Whether the handle's type implements `interface`.
    ///
    /// `None` means the relation cannot be checked and the check is skipped.
    fn is_subtype_of(&self, _interface: &InterfaceId) -> Option<bool> {
        None
    }
}

impl DependencyHandle for &'static str {}

impl DependencyHandle for String {}

/// Handle naming a concrete Rust type.
///
/// Built with [`Dependency::of`] it is unchecked. Built with
/// [`Dependency::implementing`] it carries a compile-time proof that the type
/// coerces into the interface, which enables subtype checking.
#[derive(Clone)]
pub struct Dependency {
    id: TypeId,
    name: &'static str,
    provides: Vec<InterfaceId>,
}

impl Dependency {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            provides: Vec::new(),
        }
    }

    /// `witness` only type-checks when `T` coerces into `I`, e.g. `|b| b`
    /// for `I = dyn Trait`.
    pub fn implementing<T: 'static, I: ?Sized + 'static>(witness: fn(Box<T>) -> Box<I>) -> Self {
        Self::of::<T>().also(witness)
    }

    /// Record one more interface implemented by `T`.
    pub fn also<T: 'static, I: ?Sized + 'static>(mut self, _witness: fn(Box<T>) -> Box<I>) -> Self {
        debug_assert_eq!(self.id, TypeId::of::<T>(), "witness for a different type");
        let interface = InterfaceId::of::<I>();
        if !self.provides.contains(&interface) {
            self.provides.push(interface);
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl DependencyHandle for Dependency {
    fn is_subtype_of(&self, interface: &InterfaceId) -> Option<bool> {
        if self.provides.is_empty() {
            None
        } else {
            Some(self.provides.contains(interface))
        }
    }
}
