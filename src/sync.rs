//! Memoization of function variables shared across threads.
//!
//! [`SyncVar`] is the thread-safe counterpart of [`Var`](crate::Var). A
//! variable memoized with [`memoize`] runs its original function at most once
//! per key: concurrent callers with the same arguments wait for the single
//! computation in flight and then share its result.
//!
//! A function must not recursively call itself with the same arguments it is
//! currently computing. That would wait on itself forever.

use std::fmt::{self, Debug, Formatter};
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};

use crate::args::Args;
use crate::error::{Error, Reason, Result};
use crate::strategy::KeyStrategy;

/// A shared, thread-safe function value.
type Func<A, R> = Arc<dyn Fn(A) -> R + Send + Sync>;

/// The value a thread-safe cache stores per key.
///
/// Empty while the first caller is still computing the result.
pub type Entry<R> = Arc<OnceCell<R>>;

/// A mutable variable holding a function that can be called from any thread.
///
/// Cloning a `SyncVar` produces another handle to the same variable. Functions
/// that call their own variable capture a [`WeakSyncVar`] from
/// [`downgrade`](Self::downgrade).
pub struct SyncVar<A, R> {
    slot: Arc<RwLock<Option<Func<A, R>>>>,
    writable: bool,
}

impl<A: 'static, R: 'static> SyncVar<A, R> {
    /// Create a variable holding `func`.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::from_slot(Some(Arc::new(func)))
    }

    /// Create a variable that holds no function yet.
    pub fn empty() -> Self {
        Self::from_slot(None)
    }

    fn from_slot(func: Option<Func<A, R>>) -> Self {
        Self { slot: Arc::new(RwLock::new(func)), writable: true }
    }

    /// Assign a new function to the variable.
    pub fn set<F>(&self, func: F) -> Result<()>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        self.ensure_writable()?;
        *self.slot.write() = Some(Arc::new(func));
        Ok(())
    }

    /// Call the function the variable currently holds.
    ///
    /// # Panics
    /// Panics if the variable holds no function.
    #[track_caller]
    pub fn call(&self, args: A) -> R {
        match self.try_call(args) {
            Some(output) => output,
            None => panic!("memofn: called a function variable that holds no function"),
        }
    }

    /// Call the function the variable currently holds, if there is one.
    pub fn try_call(&self, args: A) -> Option<R> {
        let func = self.slot.read().clone()?;
        Some(func(args))
    }
}

impl<A, R> SyncVar<A, R> {
    /// Another handle to the same variable that cannot assign it.
    pub fn read_only(&self) -> Self {
        Self { slot: Arc::clone(&self.slot), writable: false }
    }

    /// A handle to the same variable that does not keep it alive.
    ///
    /// A clone captured by the variable's own function would form a cycle,
    /// so neither the function nor its cache would ever be freed.
    pub fn downgrade(&self) -> WeakSyncVar<A, R> {
        WeakSyncVar { slot: Arc::downgrade(&self.slot), writable: self.writable }
    }

    /// Whether this handle may assign the variable.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Whether the variable holds a function.
    pub fn is_set(&self) -> bool {
        self.slot.read().is_some()
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(Error::InvalidTarget(Reason::ReadOnly))
        }
    }
}

impl<A, R> Clone for SyncVar<A, R> {
    fn clone(&self) -> Self {
        Self { slot: Arc::clone(&self.slot), writable: self.writable }
    }
}

impl<A, R> Debug for SyncVar<A, R> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("SyncVar")
            .field("set", &self.is_set())
            .field("writable", &self.writable)
            .finish()
    }
}

/// A non-owning handle to a [`SyncVar`].
pub struct WeakSyncVar<A, R> {
    slot: Weak<RwLock<Option<Func<A, R>>>>,
    writable: bool,
}

impl<A: 'static, R: 'static> WeakSyncVar<A, R> {
    /// Call the function the variable currently holds.
    ///
    /// # Panics
    /// Panics if the variable was dropped or holds no function.
    #[track_caller]
    pub fn call(&self, args: A) -> R {
        match self.try_call(args) {
            Some(output) => output,
            None => panic!("memofn: called a function variable that is gone or holds no function"),
        }
    }

    /// Call the function the variable currently holds, if it is still alive
    /// and holds one.
    pub fn try_call(&self, args: A) -> Option<R> {
        let func = self.slot.upgrade()?.read().clone()?;
        Some(func(args))
    }
}

impl<A, R> WeakSyncVar<A, R> {
    /// An owning handle to the variable, if it is still alive.
    pub fn upgrade(&self) -> Option<SyncVar<A, R>> {
        Some(SyncVar { slot: self.slot.upgrade()?, writable: self.writable })
    }
}

impl<A, R> Clone for WeakSyncVar<A, R> {
    fn clone(&self) -> Self {
        Self { slot: Weak::clone(&self.slot), writable: self.writable }
    }
}

impl<A, R> Debug for WeakSyncVar<A, R> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("WeakSyncVar")
            .field("alive", &(self.slot.strong_count() > 0))
            .field("writable", &self.writable)
            .finish()
    }
}

/// Memoize the function held by a thread-safe variable.
///
/// Picks the key strategy like [`crate::memoize`] and fails the same way.
pub fn memoize<A, R>(target: &SyncVar<A, R>) -> Result<()>
where
    A: Args,
    R: Clone + Send + Sync + 'static,
    <A as Args>::Holder<Entry<R>>: Send,
{
    memoize_with(target, <A::Holder<Entry<R>>>::default())
}

/// Memoize the function held by a thread-safe variable with the given key
/// strategy.
pub fn memoize_with<A, R, S>(target: &SyncVar<A, R>, strategy: S) -> Result<()>
where
    A: Args,
    R: Clone + Send + Sync + 'static,
    S: KeyStrategy<A, Entry<R>> + Send + 'static,
{
    target.ensure_writable()?;

    // Hold the write lock from the snapshot until the replacement so that a
    // concurrent assignment cannot slip in between.
    let mut slot = target.slot.write();
    let original = slot.clone().ok_or(Error::InvalidTarget(Reason::Unset))?;
    let holder = Mutex::new(strategy);

    let func: Func<A, R> = Arc::new(move |args: A| {
        let entry = {
            let mut holder = holder.lock();
            let key = holder.build_key(&args);
            match holder.has_val(&key) {
                Some(entry) => entry,
                None => {
                    let entry = Arc::new(OnceCell::new());
                    holder.store_val(key, Arc::clone(&entry));
                    entry
                }
            }
        };

        // The lock is released so that other keys, including recursive
        // calls, make progress while this one computes.
        let mut computed = false;
        let output = entry
            .get_or_init(|| {
                computed = true;
                original(args)
            })
            .clone();

        tracing::trace!(arity = A::ARITY, hit = !computed, "shared cache lookup");

        #[cfg(feature = "testing")]
        if computed {
            crate::testing::register_miss();
        } else {
            crate::testing::register_hit();
        }

        output
    });

    *slot = Some(func);
    drop(slot);

    tracing::debug!(arity = A::ARITY, strategy = %S::KIND, "memoized shared function variable");
    Ok(())
}
