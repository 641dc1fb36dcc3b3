use std::fmt::Debug;
use std::hash::Hash;

use crate::strategy::{FixedArity, KeyStrategy, StrategyKind, VariableArity};

/// Arity at and below which arguments are keyed by value.
pub const FIXED_ARITY: usize = 3;

/// The argument list of a memoizable function.
///
/// This is implemented for tuples up to length twelve. Tuples of up to
/// [`FIXED_ARITY`] elements are keyed by value and need `Hash + Eq + Clone`
/// elements. Longer tuples are keyed by their rendering and need `Debug`
/// elements.
pub trait Args: Sized + 'static {
    /// The number of arguments.
    const ARITY: usize;

    /// The key strategy that [`memoize`](crate::memoize) picks.
    const STRATEGY: StrategyKind;

    /// The default key strategy for a function returning `R`.
    type Holder<R: Clone + 'static>: KeyStrategy<Self, R> + Default + 'static;
}

/// Arguments that fit into a padded three-slot key.
pub trait Pad {
    /// The three-slot key.
    type Padded: Hash + Eq;

    /// Copy the arguments into the key, filling unused slots with [`Empty`].
    fn pad(&self) -> Self::Padded;
}

/// The marker in unused slots of a fixed-arity key.
#[derive(Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Empty;

impl Pad for () {
    type Padded = (Empty, Empty, Empty);

    fn pad(&self) -> Self::Padded {
        (Empty, Empty, Empty)
    }
}

impl<A: Hash + Eq + Clone> Pad for (A,) {
    type Padded = (A, Empty, Empty);

    fn pad(&self) -> Self::Padded {
        (self.0.clone(), Empty, Empty)
    }
}

impl<A: Hash + Eq + Clone, B: Hash + Eq + Clone> Pad for (A, B) {
    type Padded = (A, B, Empty);

    fn pad(&self) -> Self::Padded {
        (self.0.clone(), self.1.clone(), Empty)
    }
}

impl<A: Hash + Eq + Clone, B: Hash + Eq + Clone, C: Hash + Eq + Clone> Pad
    for (A, B, C)
{
    type Padded = (A, B, C);

    fn pad(&self) -> Self::Padded {
        self.clone()
    }
}

/// Arguments that can be rendered into a textual key.
pub trait Render {
    /// Append each argument's `Debug` output followed by a `-`.
    fn render(&self, out: &mut String);
}

macro_rules! render {
    ($($param:tt $idx:tt),*) => {
        #[allow(unused_variables)]
        impl<$($param: Debug),*> Render for ($($param,)*) {
            fn render(&self, out: &mut String) {
                $(out.push_str(&format!("{:?}-", self.$idx));)*
            }
        }
    };
}

macro_rules! fixed_args {
    ($arity:literal; $($param:tt),*) => {
        impl<$($param: Hash + Eq + Clone + 'static),*> Args for ($($param,)*) {
            const ARITY: usize = $arity;
            const STRATEGY: StrategyKind = StrategyKind::Fixed;
            type Holder<R: Clone + 'static> = FixedArity<Self, R>;
        }
    };
}

macro_rules! variable_args {
    ($arity:literal; $($param:tt),*) => {
        impl<$($param: Debug + 'static),*> Args for ($($param,)*) {
            const ARITY: usize = $arity;
            const STRATEGY: StrategyKind = StrategyKind::Variable;
            type Holder<R: Clone + 'static> = VariableArity<R>;
        }
    };
}

render! {}
render! { A 0 }
render! { A 0, B 1 }
render! { A 0, B 1, C 2 }
render! { A 0, B 1, C 2, D 3 }
render! { A 0, B 1, C 2, D 3, E 4 }
render! { A 0, B 1, C 2, D 3, E 4, F 5 }
render! { A 0, B 1, C 2, D 3, E 4, F 5, G 6 }
render! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7 }
render! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8 }
render! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9 }
render! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10 }
render! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11 }

fixed_args! { 0; }
fixed_args! { 1; A }
fixed_args! { 2; A, B }
fixed_args! { 3; A, B, C }
variable_args! { 4; A, B, C, D }
variable_args! { 5; A, B, C, D, E }
variable_args! { 6; A, B, C, D, E, F }
variable_args! { 7; A, B, C, D, E, F, G }
variable_args! { 8; A, B, C, D, E, F, G, H }
variable_args! { 9; A, B, C, D, E, F, G, H, I }
variable_args! { 10; A, B, C, D, E, F, G, H, I, J }
variable_args! { 11; A, B, C, D, E, F, G, H, I, J, K }
variable_args! { 12; A, B, C, D, E, F, G, H, I, J, K, L }
