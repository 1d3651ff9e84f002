use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::predicate::constraint::Constraint;
use crate::predicate::predicate::Predicate;
use crate::predicate::weight::Weight;
use crate::types::ConfigurationError;

/// Marker an implementation can be qualified by.
///
/// Qualifiers compare by identity, not by value: two `Qualifier::new(1)`
/// are different qualifiers, while clones of one qualifier are the same.
#[derive(Clone)]
pub struct Qualifier {
    value: Arc<dyn Any + Send + Sync>,
    value_type: TypeId,
    repr: Arc<str>,
}

impl Qualifier {
    pub fn new<T: Any + fmt::Debug + Send + Sync>(value: T) -> Self {
        let repr: Arc<str> = Arc::from(format!("{value:?}"));
        Self {
            value: Arc::new(value),
            value_type: TypeId::of::<T>(),
            repr,
        }
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            value: Arc::new(name),
            value_type: TypeId::of::<&'static str>(),
            repr: Arc::from(name),
        }
    }

    pub fn value(&self) -> &(dyn Any + Send + Sync) {
        self.value.as_ref()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value_type_id() == TypeId::of::<T>()
    }

    fn value_type_id(&self) -> TypeId {
        self.value_type
    }

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.value) as *const () as usize
    }
}

impl PartialEq for Qualifier {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Qualifier {}

impl Hash for Qualifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qualifier({})", self.repr)
    }
}

/// Predicate listing the qualifiers of an implementation, and the constraint
/// requiring all of its qualifiers to be present.
///
/// Qualifiers are kept unique and sorted by identity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QualifiedBy {
    qualifiers: Vec<Qualifier>,
}

impl QualifiedBy {
    pub fn new(qualifiers: impl IntoIterator<Item = Qualifier>) -> Result<Self, ConfigurationError> {
        let mut qualifiers: Vec<Qualifier> = qualifiers.into_iter().collect();
        if qualifiers.is_empty() {
            return Err(ConfigurationError::EmptyQualifiers);
        }
        qualifiers.sort_by_key(Qualifier::identity);
        qualifiers.dedup();
        Ok(Self { qualifiers })
    }

    /// Matches implementations qualified by at least one of `qualifiers`.
    pub fn one_of(
        qualifiers: impl IntoIterator<Item = Qualifier>,
    ) -> Result<QualifiedByOneOf, ConfigurationError> {
        Ok(QualifiedByOneOf {
            qualified_by: QualifiedBy::new(qualifiers)?,
        })
    }

    /// Matches implementations with a qualifier whose value is a `T`.
    pub fn instance_of<T: Any>() -> QualifiedByInstanceOf {
        QualifiedByInstanceOf {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Union of both qualifier sets. Registered as the merge function for
    /// `QualifiedBy` predicates and constraints.
    pub fn merge(a: &QualifiedBy, b: &QualifiedBy) -> QualifiedBy {
        let mut qualifiers = Vec::with_capacity(a.qualifiers.len() + b.qualifiers.len());
        qualifiers.extend(a.qualifiers.iter().cloned());
        qualifiers.extend(b.qualifiers.iter().cloned());
        qualifiers.sort_by_key(Qualifier::identity);
        qualifiers.dedup();
        QualifiedBy { qualifiers }
    }

    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    pub fn contains(&self, qualifier: &Qualifier) -> bool {
        self.qualifiers
            .binary_search_by_key(&qualifier.identity(), Qualifier::identity)
            .is_ok()
    }
}

impl fmt::Debug for QualifiedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QualifiedBy").field(&self.qualifiers).finish()
    }
}

impl<W: Weight> Predicate<W> for QualifiedBy {
    fn weight(&self) -> Option<W> {
        Some(W::of_neutral(Some(self)))
    }
}

impl Constraint for QualifiedBy {
    type Target = QualifiedBy;

    fn evaluate(&self, predicate: Option<&QualifiedBy>) -> bool {
        let Some(predicate) = predicate else {
            return false;
        };
        if self.qualifiers.len() > predicate.qualifiers.len() {
            return false;
        }

        // Both sides are sorted by identity: a single forward pass suffices.
        let mut required = self.qualifiers.iter().peekable();
        for candidate in &predicate.qualifiers {
            match required.peek() {
                Some(next) if next.identity() == candidate.identity() => {
                    required.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        required.peek().is_none()
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct QualifiedByOneOf {
    qualified_by: QualifiedBy,
}

impl fmt::Debug for QualifiedByOneOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("QualifiedByOneOf")
            .field(&self.qualified_by.qualifiers)
            .finish()
    }
}

impl Constraint for QualifiedByOneOf {
    type Target = QualifiedBy;

    fn evaluate(&self, predicate: Option<&QualifiedBy>) -> bool {
        let Some(predicate) = predicate else {
            return false;
        };

        let wanted = &self.qualified_by.qualifiers;
        let present = &predicate.qualifiers;
        let (mut i, mut j) = (0, 0);
        while i < wanted.len() && j < present.len() {
            let (a, b) = (wanted[i].identity(), present[j].identity());
            if a == b {
                return true;
            }
            if a < b {
                i += 1;
            } else {
                j += 1;
            }
        }
        false
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualifiedByInstanceOf {
    type_id: TypeId,
    type_name: &'static str,
}

impl fmt::Debug for QualifiedByInstanceOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedByInstanceOf({})", self.type_name)
    }
}

impl Constraint for QualifiedByInstanceOf {
    type Target = QualifiedBy;

    fn evaluate(&self, predicate: Option<&QualifiedBy>) -> bool {
        predicate.is_some_and(|predicate| {
            predicate
                .qualifiers
                .iter()
                .any(|qualifier| qualifier.value_type_id() == self.type_id)
        })
    }
}
