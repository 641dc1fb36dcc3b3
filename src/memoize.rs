use std::cell::RefCell;
use std::rc::Rc;
use std::thread::LocalKey;

use crate::args::Args;
use crate::error::Result;
use crate::strategy::KeyStrategy;
use crate::var::Var;

/// A per-function cache for the `#[memoize]` attribute.
pub type Cache<A, R> = RefCell<<A as Args>::Holder<R>>;

/// Memoize the function held by a variable.
///
/// Replaces the variable's function with one that has the same signature but
/// looks up previously computed results before running the original. The key
/// strategy follows from the arity: up to three arguments are keyed by value,
/// more by their `Debug` renderings. Every call of this function creates a
/// fresh, private cache.
///
/// Fails with [`InvalidTarget`](crate::Error::InvalidTarget) if the handle is
/// read-only or the variable holds no function. The variable is left
/// unchanged in that case.
pub fn memoize<A, R>(target: &Var<A, R>) -> Result<()>
where
    A: Args,
    R: Clone + 'static,
{
    memoize_with(target, <A::Holder<R>>::default())
}

/// Memoize the function held by a variable with the given key strategy.
pub fn memoize_with<A, R, S>(target: &Var<A, R>, strategy: S) -> Result<()>
where
    A: Args,
    R: Clone + 'static,
    S: KeyStrategy<A, R> + 'static,
{
    let original = target.snapshot()?;
    let holder = RefCell::new(strategy);
    target.replace(Rc::new(move |args: A| {
        lookup_or_compute(&holder, args, |args| original(args))
    }));

    tracing::debug!(arity = A::ARITY, strategy = %S::KIND, "memoized function variable");
    Ok(())
}

/// Wrap a function so that it caches its results.
///
/// Unlike [`memoize`], this does not go through a variable, so recursive calls
/// inside `func` are not cached.
pub fn memoized<A, R, F>(func: F) -> impl Fn(A) -> R
where
    A: Args,
    R: Clone + 'static,
    F: Fn(A) -> R,
{
    let holder = RefCell::new(<A::Holder<R>>::default());
    move |args: A| lookup_or_compute(&holder, args, &func)
}

/// Execute a memoized function item, trying to use a cached result for it.
pub fn cached<A, R, F>(cache: &'static LocalKey<Cache<A, R>>, args: A, func: F) -> R
where
    A: Args,
    R: Clone + 'static,
    F: FnOnce(A) -> R,
{
    cache.with(|holder| lookup_or_compute(holder, args, func))
}

/// Return the result stored for `args` or compute and store it.
fn lookup_or_compute<A, R, S, F>(holder: &RefCell<S>, args: A, func: F) -> R
where
    A: Args,
    R: Clone,
    S: KeyStrategy<A, R>,
    F: FnOnce(A) -> R,
{
    let key = holder.borrow().build_key(&args);

    // Check if there is a cached output.
    if let Some(output) = holder.borrow().has_val(&key) {
        tracing::trace!(arity = A::ARITY, "cache hit");

        #[cfg(feature = "testing")]
        crate::testing::register_hit();

        return output;
    }

    // No borrow is held here so that recursive calls can use the cache.
    let output = func(args);

    let mut borrow = holder.borrow_mut();
    borrow.store_val(key, output.clone());
    tracing::trace!(arity = A::ARITY, size = borrow.len(), "cache miss");
    drop(borrow);

    #[cfg(feature = "testing")]
    crate::testing::register_miss();

    output
}
