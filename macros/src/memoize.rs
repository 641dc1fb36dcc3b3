use super::*;

/// Memoize a function.
pub fn expand(mut func: syn::ItemFn) -> Result<proc_macro2::TokenStream> {
    if let Some(param) = func.sig.generics.params.first() {
        bail!(param, "memoized functions cannot be generic");
    }

    if let Some(asyncness) = func.sig.asyncness {
        bail!(asyncness, "async functions cannot be memoized");
    }

    if let Some(constness) = func.sig.constness {
        bail!(constness, "const functions cannot be memoized");
    }

    if let Some(variadic) = &func.sig.variadic {
        bail!(variadic, "variadic functions cannot be memoized");
    }

    let mut args = vec![];
    let mut types = vec![];
    for input in &func.sig.inputs {
        let typed = match input {
            syn::FnArg::Typed(typed) => typed,
            syn::FnArg::Receiver(_) => {
                bail!(input, "methods are not supported")
            }
        };

        let name = match typed.pat.as_ref() {
            syn::Pat::Ident(syn::PatIdent {
                by_ref: None,
                mutability: None,
                ident,
                subpat: None,
                ..
            }) => ident,
            pat => bail!(pat, "only simple identifiers are supported"),
        };

        let ty = typed.ty.as_ref();
        match ty {
            syn::Type::Reference(_) => {
                bail!(ty, "arguments must be owned, not references")
            }
            syn::Type::ImplTrait(_) => {
                bail!(ty, "`impl Trait` arguments are not supported")
            }
            _ if mentions_self(ty) => {
                bail!(ty, "argument types cannot mention `Self`")
            }
            _ => {}
        }

        args.push(name);
        types.push(ty);
    }

    let output = match &func.sig.output {
        syn::ReturnType::Default => parse_quote! { () },
        syn::ReturnType::Type(_, ty) => {
            if let syn::Type::ImplTrait(_) = ty.as_ref() {
                bail!(ty, "`impl Trait` return types are not supported");
            }
            if mentions_self(ty) {
                bail!(ty, "return types cannot mention `Self`");
            }
            ty.as_ref().clone()
        }
    };

    // Construct a tuple from all arguments and its type.
    let arg_tuple = quote! { (#(#args,)*) };
    let arg_types = quote! { (#(#types,)*) };

    // Construct the inner closure.
    let body = &func.block;
    let closure = quote! { |#arg_tuple: #arg_types| -> #output #body };

    // Adjust the function's body.
    func.block = parse_quote! { {
        ::std::thread_local! {
            static __MEMOFN_CACHE: ::memofn::internal::Cache<#arg_types, #output> =
                ::std::default::Default::default();
        }

        ::memofn::internal::cached(&__MEMOFN_CACHE, #arg_tuple, #closure)
    } };

    Ok(quote! { #func })
}

/// Whether a type refers to `Self` anywhere, which the per-function cache
/// cannot name.
fn mentions_self(ty: &syn::Type) -> bool {
    fn walk(stream: proc_macro2::TokenStream) -> bool {
        stream.into_iter().any(|tree| match tree {
            proc_macro2::TokenTree::Ident(ident) => ident == "Self",
            proc_macro2::TokenTree::Group(group) => walk(group.stream()),
            _ => false,
        })
    }

    walk(quote! { #ty })
}
