use std::cell::Cell;

/// Hit and miss bookkeeping of the current thread.
struct Lookups {
    last_was_hit: Cell<bool>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

thread_local! {
    static LOOKUPS: Lookups = const {
        Lookups {
            last_was_hit: Cell::new(false),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    };
}

/// Whether the last memoized call that returned on this thread was a hit.
///
/// For recursive functions, this is the outermost call, as it returns last.
pub fn last_was_hit() -> bool {
    LOOKUPS.with(|lookups| lookups.last_was_hit.get())
}

/// How many memoized calls on this thread were hits and misses so far.
pub fn lookups() -> (usize, usize) {
    LOOKUPS.with(|lookups| (lookups.hits.get(), lookups.misses.get()))
}

pub(crate) fn register_hit() {
    LOOKUPS.with(|lookups| {
        lookups.last_was_hit.set(true);
        lookups.hits.set(lookups.hits.get() + 1);
    })
}

pub(crate) fn register_miss() {
    LOOKUPS.with(|lookups| {
        lookups.last_was_hit.set(false);
        lookups.misses.set(lookups.misses.get() + 1);
    })
}
