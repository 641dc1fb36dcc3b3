use std::cell::Cell;
use std::rc::Rc;

use memofn::{Error, Reason, Var, memoize};

/// A call counter shared between a test and the function under test.
#[derive(Clone, Default)]
struct Counter(Rc<Cell<usize>>);

impl Counter {
    fn bump(&self) {
        self.0.set(self.0.get() + 1);
    }

    fn get(&self) -> usize {
        self.0.get()
    }
}

/// Sets a flag when dropped.
struct Guard(Rc<Cell<bool>>);

impl Drop for Guard {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

#[test]
fn test_sum() {
    let count = Counter::default();
    let counter = count.clone();
    let sum = Var::new(move |(a, b): (i32, i32)| {
        counter.bump();
        a + b
    });

    memoize(&sum).unwrap();
    assert_eq!(sum.call((2, 1)), 3);
    assert_eq!(count.get(), 1);
    assert_eq!(sum.call((2, 1)), 3);
    assert_eq!(count.get(), 1);
    assert_eq!(sum.call((2, 3)), 5);
    assert_eq!(count.get(), 2);
    assert_eq!(sum.call((2, 3)), 5);
    assert_eq!(count.get(), 2);
}

#[test]
fn test_separate_caches() {
    let sums = Counter::default();
    let mults = Counter::default();

    let counter = sums.clone();
    let sum = Var::new(move |(a, b): (i32, i32)| {
        counter.bump();
        a + b
    });

    let counter = mults.clone();
    let mult = Var::new(move |(a, b): (i32, i32)| {
        counter.bump();
        a * b
    });

    memoize(&sum).unwrap();
    memoize(&mult).unwrap();

    assert_eq!(sum.call((2, 1)), 3);
    assert_eq!(mult.call((2, 1)), 2);
    assert_eq!(mult.call((2, 1)), 2);
    assert_eq!(mult.call((2, 3)), 6);
    assert_eq!(mult.call((2, 3)), 6);
    assert_eq!(sums.get(), 1);
    assert_eq!(mults.get(), 2);
}

#[test]
fn test_long() {
    let count = Counter::default();
    let counter = count.clone();
    let sum = Var::new(
        move |(a, b, c, d, e, f, g, h): (i32, i32, i32, i32, i32, i32, i32, i32)| {
            counter.bump();
            a + b + c + d + e + f + g + h
        },
    );

    memoize(&sum).unwrap();
    assert_eq!(sum.call((2, 1, 1, 1, 1, 1, 1, 1)), 9);
    assert_eq!(sum.call((2, 1, 1, 1, 1, 1, 1, 1)), 9);
    assert_eq!(count.get(), 1);
    assert_eq!(sum.call((2, 3, 1, 1, 1, 1, 1, 1)), 11);
    assert_eq!(sum.call((2, 3, 1, 1, 1, 1, 1, 1)), 11);
    assert_eq!(count.get(), 2);
}

#[test]
fn test_three_arguments() {
    let count = Counter::default();
    let counter = count.clone();
    let sum = Var::new(move |(a, b, c): (i32, i32, i32)| {
        counter.bump();
        a + b + c
    });

    let long_count = Counter::default();
    let counter = long_count.clone();
    let long_sum = Var::new(move |(a, b, c, d): (i32, i32, i32, i32)| {
        counter.bump();
        a + b + c + d
    });

    memoize(&sum).unwrap();
    memoize(&long_sum).unwrap();

    assert_eq!(sum.call((2, 1, 1)), 4);
    assert_eq!(sum.call((2, 1, 1)), 4);
    assert_eq!(count.get(), 1);
    assert_eq!(sum.call((2, 1, 3)), 6);
    assert_eq!(sum.call((2, 1, 3)), 6);
    assert_eq!(count.get(), 2);

    // Both strategies cache the same calls.
    assert_eq!(long_sum.call((2, 1, 1, 0)), 4);
    assert_eq!(long_sum.call((2, 1, 1, 0)), 4);
    assert_eq!(long_count.get(), 1);
    assert_eq!(long_sum.call((2, 1, 3, 0)), 6);
    assert_eq!(long_sum.call((2, 1, 3, 0)), 6);
    assert_eq!(long_count.get(), 2);
}

#[test]
fn test_recursive() {
    let count = Counter::default();
    let counter = count.clone();
    let fib: Var<(u64,), u64> = Var::empty();
    let this = fib.downgrade();
    fib.set(move |(n,)| {
        counter.bump();
        match n {
            0 => 0,
            1 => 1,
            _ => this.call((n - 2,)) + this.call((n - 1,)),
        }
    })
    .unwrap();

    memoize(&fib).unwrap();
    assert_eq!(fib.call((1,)), 1);
    assert_eq!(count.get(), 1);
    assert_eq!(fib.call((1,)), 1);
    assert_eq!(count.get(), 1);

    // Fibonacci numbers 0 through 10 are each computed exactly once.
    assert_eq!(fib.call((10,)), 55);
    assert_eq!(count.get(), 11);
}

#[test]
fn test_recursive_is_freed() {
    let dropped = Rc::new(Cell::new(false));
    let guard = Guard(Rc::clone(&dropped));

    let fib: Var<(u64,), u64> = Var::empty();
    let this = fib.downgrade();
    fib.set(move |(n,)| {
        let _guard = &guard;
        if n < 2 { n } else { this.call((n - 2,)) + this.call((n - 1,)) }
    })
    .unwrap();

    memoize(&fib).unwrap();
    assert_eq!(fib.call((30,)), 832040);
    assert!(!dropped.get());

    // The last handle takes the function and its cache with it.
    let weak = fib.downgrade();
    drop(fib);
    assert!(dropped.get());
    assert!(weak.upgrade().is_none());
    assert_eq!(weak.try_call((3,)), None);
}

#[test]
fn test_weak_var() {
    let square = Var::new(|(x,): (i32,)| x * x);
    let weak = square.downgrade();
    assert_eq!(weak.call((3,)), 9);
    assert_eq!(format!("{weak:?}"), "WeakVar { alive: true, writable: true }");

    let strong = weak.upgrade().unwrap();
    assert!(strong.same(&square));
    memoize(&strong).unwrap();
    assert_eq!(square.call((4,)), 16);

    drop(strong);
    drop(square);
    assert_eq!(format!("{weak:?}"), "WeakVar { alive: false, writable: true }");
}

#[test]
#[should_panic(expected = "is gone")]
fn test_call_dropped() {
    let square = Var::new(|(x,): (i32,)| x * x);
    let weak = square.downgrade();
    drop(square);
    weak.call((2,));
}

#[test]
fn test_recursive_unmemoized() {
    let count = Counter::default();
    let counter = count.clone();
    let fib: Var<(u64,), u64> = Var::empty();
    let this = fib.downgrade();
    fib.set(move |(n,)| {
        counter.bump();
        if n < 2 { n } else { this.call((n - 2,)) + this.call((n - 1,)) }
    })
    .unwrap();

    assert_eq!(fib.call((10,)), 55);
    assert_eq!(count.get(), 177);
}

#[test]
fn test_multiple_outputs() {
    let count = Counter::default();
    let counter = count.clone();
    let divmod = Var::new(move |(a, b): (u32, u32)| {
        counter.bump();
        (a / b, a % b)
    });

    memoize(&divmod).unwrap();
    assert_eq!(divmod.call((17, 5)), (3, 2));
    assert_eq!(divmod.call((17, 5)), (3, 2));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_no_arguments() {
    let count = Counter::default();
    let counter = count.clone();
    let greet = Var::new(move |()| {
        counter.bump();
        format!("The world is {}", "big")
    });

    memoize(&greet).unwrap();
    assert_eq!(greet.call(()), "The world is big");
    assert_eq!(greet.call(()), "The world is big");
    assert_eq!(count.get(), 1);
}

#[test]
fn test_independent_memoizations() {
    let count = Counter::default();
    let counter = count.clone();
    let square = Var::new(move |(x,): (i32,)| {
        counter.bump();
        x * x
    });

    memoize(&square).unwrap();
    assert_eq!(square.call((2,)), 4);

    // Wrapping again stacks a fresh cache on top. The inner one still hits.
    memoize(&square).unwrap();
    assert_eq!(square.call((2,)), 4);
    assert_eq!(square.call((3,)), 9);
    assert_eq!(square.call((3,)), 9);
    assert_eq!(count.get(), 2);
}

#[test]
fn test_reassigned_after_memoize() {
    let square = Var::new(|(x,): (i32,)| x * x);
    memoize(&square).unwrap();
    assert_eq!(square.call((3,)), 9);

    // Assigning a new function drops the memoized one with its cache.
    square.set(|(x,)| x * x * x).unwrap();
    assert_eq!(square.call((3,)), 27);
}

#[test]
fn test_read_only() {
    let count = Counter::default();
    let counter = count.clone();
    let square = Var::new(move |(x,): (i32,)| {
        counter.bump();
        x * x
    });

    let view = square.read_only();
    assert!(!view.is_writable());
    assert!(view.same(&square));
    assert_eq!(memoize(&view), Err(Error::InvalidTarget(Reason::ReadOnly)));
    assert_eq!(view.set(|(x,)| x), Err(Error::InvalidTarget(Reason::ReadOnly)));

    // The variable is untouched and still runs the original every time.
    assert_eq!(view.call((3,)), 9);
    assert_eq!(square.call((3,)), 9);
    assert_eq!(count.get(), 2);

    // Memoizing through the writable handle is visible through the view.
    memoize(&square).unwrap();
    assert_eq!(view.call((4,)), 16);
    assert_eq!(view.call((4,)), 16);
    assert_eq!(count.get(), 3);
}

#[test]
fn test_unset() {
    let square: Var<(i32,), i32> = Var::empty();
    assert!(!square.is_set());
    assert_eq!(memoize(&square), Err(Error::InvalidTarget(Reason::Unset)));
    assert_eq!(square.try_call((2,)), None);

    square.set(|(x,)| x * x).unwrap();
    assert!(square.is_set());
    assert_eq!(memoize(&square), Ok(()));
    assert_eq!(square.try_call((2,)), Some(4));
}

#[test]
#[should_panic(expected = "holds no function")]
fn test_call_unset() {
    let square: Var<(i32,), i32> = Var::default();
    square.call((2,));
}

#[test]
fn test_to_fn() {
    let count = Counter::default();
    let counter = count.clone();
    let square = Var::new(move |(x,): (i32,)| {
        counter.bump();
        x * x
    });

    let f = square.to_fn();
    memoize(&square).unwrap();
    assert_eq!(f((5,)), 25);
    assert_eq!(f((5,)), 25);
    assert_eq!(count.get(), 1);
}

#[test]
fn test_error_display() {
    assert_eq!(
        Error::InvalidTarget(Reason::ReadOnly).to_string(),
        "cannot memoize: invalid target (variable is read-only)",
    );
    assert_eq!(
        Error::InvalidTarget(Reason::Unset).to_string(),
        "cannot memoize: invalid target (variable holds no function)",
    );
}

#[test]
fn test_debug() {
    let square: Var<(i32,), i32> = Var::empty();
    assert_eq!(format!("{square:?}"), "Var { set: false, writable: true }");
}
