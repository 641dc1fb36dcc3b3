extern crate proc_macro;

macro_rules! bail {
    ($item:expr, $fmt:literal $($tts:tt)*) => {
        return Err(Error::new_spanned(
            &$item,
            format!(concat!("memofn: ", $fmt) $($tts)*)
        ))
    }
}

mod memoize;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Error, Result, parse_quote};

/// Memoize a function.
///
/// Each memoized function gets its own cache, keyed by its arguments. Calls
/// with arguments that were seen before return the stored result without
/// executing the body. Recursive calls go through the cache as well.
///
/// ```ignore
/// use memofn::memoize;
///
/// #[memoize]
/// fn fib(n: u64) -> u64 {
///     if n < 2 { n } else { fib(n - 1) + fib(n - 2) }
/// }
///
/// assert_eq!(fib(90), 2880067194370816120);
/// ```
///
/// Arguments must be simple identifiers of owned types. Up to three arguments
/// need `Hash + Eq + Clone`, more need `Debug`, and the return type needs
/// `Clone`. The cache is thread-local.
#[proc_macro_attribute]
pub fn memoize(_: TokenStream, stream: TokenStream) -> TokenStream {
    let func = syn::parse_macro_input!(stream as syn::ItemFn);
    memoize::expand(func)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
