/*!
Transparent memoization of function variables.

A [`Var`] holds a function from an argument tuple to a return value.
[`memoize`] replaces that function in place with one of the same signature
that caches results by argument values: calling it again with equal
arguments returns the stored result without running the function body.

```
use std::cell::Cell;
use std::rc::Rc;

use memofn::{memoize, Var};

let calls = Rc::new(Cell::new(0));
let counter = Rc::clone(&calls);
let sum = Var::new(move |(a, b): (i32, i32)| {
    counter.set(counter.get() + 1);
    a + b
});

memoize(&sum).unwrap();
assert_eq!(sum.call((2, 1)), 3);
assert_eq!(sum.call((2, 1)), 3);
assert_eq!(calls.get(), 1);
```

# Keys
How an argument list turns into a cache key depends on its length:
- Up to three arguments are stored by value in a three-slot key. They must
  implement `Hash`, `Eq` and `Clone`.
- Four or more arguments are rendered with `Debug`, each followed by a `-`,
  and keyed by the resulting string. Distinct arguments with identical
  renderings share a cache entry.

[`memoize_with`] installs any other [`KeyStrategy`], for example
[`TupleKey`], which keys every arity exactly.

# Recursion
Calls always read the variable's current value. A function that calls itself
through a [`WeakVar`] of its own variable thus hits the cache for its
recursive calls once it is memoized. The weak handle keeps the function and
its cache from holding on to themselves, so both are freed with the last
`Var`.

# Threads
`Var` and its caches are single-threaded. The [`sync`] module provides a
thread-safe variable that also runs each key's computation at most once.

# Function items
With the `macros` feature, the [`memoize`](macro@memoize) attribute memoizes
free functions in the same way.

Caches are never evicted and live as long as the memoized function.
*/

mod args;
mod error;
mod memoize;
mod strategy;
pub mod sync;
#[cfg(feature = "testing")]
mod testing;
mod var;

pub use crate::args::{Args, Empty, FIXED_ARITY, Pad, Render};
pub use crate::error::{Error, Reason, Result};
pub use crate::memoize::{memoize, memoize_with, memoized};
pub use crate::strategy::{FixedArity, KeyStrategy, StrategyKind, TupleKey, VariableArity};
pub use crate::var::{Var, WeakVar};

#[cfg(feature = "macros")]
pub use memofn_macros::memoize;

/// These are implementation details. Do not rely on them!
#[doc(hidden)]
pub mod internal {
    pub use crate::memoize::{Cache, cached};

    #[cfg(feature = "testing")]
    pub use crate::testing::{last_was_hit, lookups};
}
