use thiserror::Error;

/// Successful outcome of an interface query.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<D> {
    /// Exactly one highest-weight implementation matched.
    Single(D),
    /// Every matching implementation, by non-increasing weight. May be empty.
    Multiple(Vec<D>),
}

impl<D> Resolution<D> {
    pub fn into_vec(self) -> Vec<D> {
        match self {
            Resolution::Single(dependency) => vec![dependency],
            Resolution::Multiple(dependencies) => dependencies,
        }
    }
}

/// Errors raised while declaring interfaces, implementations or merge functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Multiple implementations of {registry} declared for {key}")]
    DuplicateMerge { registry: &'static str, key: String },

    #[error("Cannot have multiple predicates of type {predicate} without declaring a reducer")]
    MissingMerge { predicate: String },

    #[error("Merge function for {key} received values of another type")]
    MergeFailed { key: String },

    #[error("Interface {0} was not declared")]
    UnknownInterface(String),

    #[error("{implementation} does not implement the interface {interface}")]
    TypeMismatch {
        interface: String,
        implementation: String,
    },

    #[error("At least one qualifier must be given")]
    EmptyQualifiers,
}

/// Errors raised while resolving an interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Interface {0} was not declared")]
    UnknownInterface(String),

    #[error("No implementation of {interface} matches the constraints {constraints}")]
    NoMatch {
        interface: String,
        constraints: String,
    },

    #[error(
        "Multiple implementations match the interface {interface} for the constraints {constraints}: {first} and {second}"
    )]
    Ambiguous {
        interface: String,
        constraints: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl QueryError {
    /// Unknown interface or no match: the expected, recoverable outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::UnknownInterface(_) | QueryError::NoMatch { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, QueryError::Ambiguous { .. })
    }
}
