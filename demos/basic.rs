//! This example memoizes a few function variables and function items and
//! prints which calls actually execute.

use memofn::{Var, memoize};

fn main() {
    let sum = Var::new(|(a, b): (u32, u32)| {
        println!("computing {a} + {b}");
        a + b
    });
    memoize(&sum).unwrap();

    sum.call((2, 4)); // [Miss] The cache is empty.
    sum.call((2, 3)); // [Miss] Different numbers.
    sum.call((2, 3)); // [Hit]  Same numbers.
    sum.call((4, 2)); // [Miss] Different numbers.

    // A read-only handle cannot be memoized.
    let view = sum.read_only();
    if let Err(err) = memoize(&view) {
        println!("{err}");
    }

    double(2); // [Miss] The cache is empty.
    double(4); // [Miss] Different number.
    double(2); // [Hit] Same number as initially.
}

/// Double a number.
#[memoize]
fn double(x: u32) -> u32 {
    println!("doubling {x}");
    2 * x
}
