use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::debug;

use crate::types::ConfigurationError;

type KeyExtractor<K, F> = Box<dyn Fn(&F) -> K + Send>;

/// Registry of functions keyed by the type they apply to.
///
/// Registration only queues the function; keys are computed and checked the
/// first time anything is looked up afterwards. A function may therefore be
/// registered after other lookups already happened, as long as its own key is
/// not requested before.
pub struct LazyDispatch<K, F> {
    name: &'static str,
    state: Mutex<DispatchState<K, F>>,
}

struct DispatchState<K, F> {
    functions: HashMap<K, F>,
    /// Keys declared more than once. Lookups for them fail for good.
    duplicates: HashSet<K>,
    pending: VecDeque<(KeyExtractor<K, F>, F)>,
}

impl<K, F> LazyDispatch<K, F>
where
    K: Eq + Hash + Clone + fmt::Display,
    F: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(DispatchState {
                functions: HashMap::new(),
                duplicates: HashSet::new(),
                pending: VecDeque::new(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn register(&self, key: impl Fn(&F) -> K + Send + 'static, func: F) {
        self.state.lock().pending.push_back((Box::new(key), func));
    }

    /// Drain pending registrations, oldest first, then look `item` up.
    ///
    /// The lock is held for the whole drain-then-lookup sequence.
    pub fn get(&self, item: &K) -> Result<Option<F>, ConfigurationError> {
        let mut state = self.state.lock();

        let mut first_duplicate: Option<K> = None;
        let drained = state.pending.len();
        while let Some((key, func)) = state.pending.pop_front() {
            let tpe = key(&func);
            if state.functions.contains_key(&tpe) {
                if first_duplicate.is_none() {
                    first_duplicate = Some(tpe.clone());
                }
                state.duplicates.insert(tpe);
            } else {
                state.functions.insert(tpe, func);
            }
        }
        if drained > 0 {
            debug!(dispatch = self.name, drained, "Drained pending registrations");
        }

        if let Some(key) = first_duplicate {
            return Err(self.duplicate(&key));
        }
        if state.duplicates.contains(item) {
            return Err(self.duplicate(item));
        }

        Ok(state.functions.get(item).cloned())
    }

    /// Registrations not yet drained.
    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    fn duplicate(&self, key: &K) -> ConfigurationError {
        ConfigurationError::DuplicateMerge {
            registry: self.name(),
            key: key.to_string(),
        }
    }
}

impl<K, F> fmt::Debug for LazyDispatch<K, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyDispatch")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
