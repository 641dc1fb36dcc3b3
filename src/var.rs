use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};
use std::rc::{Rc, Weak};

use crate::error::{Error, Reason, Result};

/// A shared, callable function value.
pub(crate) type Func<A, R> = Rc<dyn Fn(A) -> R>;

/// A mutable variable holding a function from `A` to `R`.
///
/// `A` is the tuple of arguments and `R` the return value. Cloning a `Var`
/// produces another handle to the _same_ variable. A function refers to
/// itself through a [`WeakVar`], which does not keep the variable alive:
///
/// ```
/// use memofn::{memoize, Var};
///
/// let fib: Var<(u64,), u64> = Var::empty();
/// let this = fib.downgrade();
/// fib.set(move |(n,)| if n < 2 { n } else { this.call((n - 1,)) + this.call((n - 2,)) })
///     .unwrap();
///
/// memoize(&fib).unwrap();
/// assert_eq!(fib.call((80,)), 23416728348467685);
/// ```
///
/// Calls always read the variable's current value, so after
/// [`memoize`](crate::memoize) replaces it, recursive calls go through the
/// cache too.
pub struct Var<A, R> {
    /// The storage location shared by all handles.
    slot: Rc<RefCell<Option<Func<A, R>>>>,
    /// Whether this handle may assign the variable.
    writable: bool,
}

impl<A: 'static, R: 'static> Var<A, R> {
    /// Create a variable holding `func`.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(A) -> R + 'static,
    {
        Self::from_slot(Some(Rc::new(func)))
    }

    /// Create a variable that holds no function yet.
    pub fn empty() -> Self {
        Self::from_slot(None)
    }

    fn from_slot(func: Option<Func<A, R>>) -> Self {
        Self { slot: Rc::new(RefCell::new(func)), writable: true }
    }

    /// Assign a new function to the variable.
    pub fn set<F>(&self, func: F) -> Result<()>
    where
        F: Fn(A) -> R + 'static,
    {
        self.ensure_writable()?;
        self.replace(Rc::new(func));
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
        // Release the borrow before calling so that the function may read or
        // assign the variable itself.
        let func = self.get()?;
        Some(func(args))
    }

    /// A closure that calls whatever the variable holds at call time.
    ///
    /// # Panics
    /// The closure panics if the variable holds no function when called.
    pub fn to_fn(&self) -> impl Fn(A) -> R + 'static {
        let var = self.clone();
        move |args| var.call(args)
    }
}

impl<A, R> Var<A, R> {
    /// Another handle to the same variable that cannot assign it.
    pub fn read_only(&self) -> Self {
        Self { slot: Rc::clone(&self.slot), writable: false }
    }

    /// Whether this handle may assign the variable.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Whether the variable holds a function.
    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// A handle to the same variable that does not keep it alive.
    ///
    /// Functions that call their own variable must capture this instead of a
    /// clone. A clone would form a cycle through the variable, so neither the
    /// function nor its cache would ever be freed.
    pub fn downgrade(&self) -> WeakVar<A, R> {
        WeakVar { slot: Rc::downgrade(&self.slot), writable: self.writable }
    }

    /// Whether two handles refer to the same variable.
    pub fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }

    /// The current function.
    pub(crate) fn get(&self) -> Option<Func<A, R>> {
        self.slot.borrow().clone()
    }

    /// Overwrite the current function.
    pub(crate) fn replace(&self, func: Func<A, R>) {
        *self.slot.borrow_mut() = Some(func);
    }

    /// Fail unless this handle may assign the variable.
    pub(crate) fn ensure_writable(&self) -> Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(Error::InvalidTarget(Reason::ReadOnly))
        }
    }

    /// Take a snapshot of the current function for wrapping.
    ///
    /// Fails if the variable cannot be assigned or holds no function.
    pub(crate) fn snapshot(&self) -> Result<Func<A, R>> {
        self.ensure_writable()?;
        self.get().ok_or(Error::InvalidTarget(Reason::Unset))
    }
}

impl<A, R> Clone for Var<A, R> {
    fn clone(&self) -> Self {
        Self { slot: Rc::clone(&self.slot), writable: self.writable }
    }
}

impl<A: 'static, R: 'static> Default for Var<A, R> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<A, R> Debug for Var<A, R> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Var")
            .field("set", &self.is_set())
            .field("writable", &self.writable)
            .finish()
    }
}

/// A non-owning handle to a [`Var`].
///
/// Created by [`Var::downgrade`]. Calls read the variable's current value
/// as long as some `Var` handle keeps it alive.
pub struct WeakVar<A, R> {
    slot: Weak<RefCell<Option<Func<A, R>>>>,
    writable: bool,
}

impl<A: 'static, R: 'static> WeakVar<A, R> {
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
        let func = self.slot.upgrade()?.borrow().clone()?;
        Some(func(args))
    }
}

impl<A, R> WeakVar<A, R> {
    /// An owning handle to the variable, if it is still alive.
    pub fn upgrade(&self) -> Option<Var<A, R>> {
        Some(Var { slot: self.slot.upgrade()?, writable: self.writable })
    }
}

impl<A, R> Clone for WeakVar<A, R> {
    fn clone(&self) -> Self {
        Self { slot: Weak::clone(&self.slot), writable: self.writable }
    }
}

impl<A, R> Debug for WeakVar<A, R> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("WeakVar")
            .field("alive", &(self.slot.strong_count() > 0))
            .field("writable", &self.writable)
            .finish()
    }
}
