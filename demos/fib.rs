//! This example shows that recursive calls through a memoized variable hit the
//! cache, turning the naive exponential Fibonacci into a linear one.

use std::cell::Cell;
use std::rc::Rc;

use memofn::{Var, memoize};

fn main() {
    let calls = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&calls);

    let fib: Var<(u64,), u64> = Var::empty();
    let this = fib.downgrade();
    fib.set(move |(n,)| {
        counter.set(counter.get() + 1);
        if n < 2 { n } else { this.call((n - 2,)) + this.call((n - 1,)) }
    })
    .unwrap();

    println!("fib(25) = {} in {} calls", fib.call((25,)), calls.replace(0));

    memoize(&fib).unwrap();
    println!("fib(25) = {} in {} calls", fib.call((25,)), calls.replace(0));
    println!("fib(25) = {} in {} calls", fib.call((25,)), calls.replace(0));
}
