use std::fmt::{self, Display, Formatter};
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::args::{Pad, Render};

/// Derives cache keys from argument lists and stores results under them.
///
/// One instance backs exactly one memoized function. Keys of different
/// instances are never compared with each other.
pub trait KeyStrategy<A, R> {
    /// The key an argument list maps to.
    type Key;

    /// Which kind of key this strategy builds.
    const KIND: StrategyKind;

    /// Derive the key for an argument list.
    fn build_key(&self, args: &A) -> Self::Key;

    /// Look up the result stored under a key.
    fn has_val(&self, key: &Self::Key) -> Option<R>;

    /// Store a result under a key.
    ///
    /// If the key already holds a result, the existing one is kept.
    fn store_val(&mut self, key: Self::Key, result: R);

    /// The number of stored results.
    fn len(&self) -> usize;

    /// Whether no results are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The kinds of keys a strategy can build.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StrategyKind {
    /// A three-slot tuple of argument values.
    Fixed,
    /// A string of rendered arguments.
    Variable,
    /// The whole argument tuple.
    Tuple,
}

impl Display for StrategyKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
            Self::Tuple => "tuple",
        })
    }
}

/// Keys up to three arguments by value, padding unused slots.
///
/// Requires argument types with a meaningful `Eq`. A type whose values are
/// not equal to themselves never hits the cache; the function then simply
/// runs on every call.
pub struct FixedArity<A: Pad, R> {
    map: FxHashMap<A::Padded, R>,
}

impl<A: Pad, R> Default for FixedArity<A, R> {
    fn default() -> Self {
        Self { map: FxHashMap::default() }
    }
}

impl<A: Pad, R: Clone> KeyStrategy<A, R> for FixedArity<A, R> {
    type Key = A::Padded;
    const KIND: StrategyKind = StrategyKind::Fixed;

    fn build_key(&self, args: &A) -> Self::Key {
        args.pad()
    }

    fn has_val(&self, key: &Self::Key) -> Option<R> {
        self.map.get(key).cloned()
    }

    fn store_val(&mut self, key: Self::Key, result: R) {
        self.map.entry(key).or_insert(result);
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Keys any number of arguments by their `Debug` renderings.
///
/// Each argument is rendered and followed by a `-`. Two distinct argument
/// lists collide if their renderings concatenate to the same string, so this
/// is only exact for argument types whose `Debug` output is injective.
pub struct VariableArity<R> {
    map: FxHashMap<String, R>,
}

impl<R> Default for VariableArity<R> {
    fn default() -> Self {
        Self { map: FxHashMap::default() }
    }
}

impl<A: Render, R: Clone> KeyStrategy<A, R> for VariableArity<R> {
    type Key = String;
    const KIND: StrategyKind = StrategyKind::Variable;

    fn build_key(&self, args: &A) -> String {
        let mut key = String::new();
        args.render(&mut key);
        key
    }

    fn has_val(&self, key: &String) -> Option<R> {
        self.map.get(key).cloned()
    }

    fn store_val(&mut self, key: String, result: R) {
        self.map.entry(key).or_insert(result);
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Keys an argument list of any length by the tuple itself.
///
/// Exact for every arity, at the cost of requiring `Hash + Eq + Clone` for
/// all arguments. Install it with [`memoize_with`](crate::memoize_with).
pub struct TupleKey<A, R> {
    map: FxHashMap<A, R>,
}

impl<A, R> Default for TupleKey<A, R> {
    fn default() -> Self {
        Self { map: FxHashMap::default() }
    }
}

impl<A: Hash + Eq + Clone, R: Clone> KeyStrategy<A, R> for TupleKey<A, R> {
    type Key = A;
    const KIND: StrategyKind = StrategyKind::Tuple;

    fn build_key(&self, args: &A) -> A {
        args.clone()
    }

    fn has_val(&self, key: &A) -> Option<R> {
        self.map.get(key).cloned()
    }

    fn store_val(&mut self, key: A, result: R) {
        self.map.entry(key).or_insert(result);
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
