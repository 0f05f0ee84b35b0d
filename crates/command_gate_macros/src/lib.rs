//! Procedural macros for command_gate
//!
//! This crate provides the permission marker for command_gate:
//! - `#[permission]`: attribute macro opting a subcommand handler into permission gating
//!
//! These macros are re-exported by the main `command_gate` crate and should
//! typically be used through that interface.
//!
//! # Examples
//!
//! ## Marker only
//!
//! The gate is supplied later through `Subcommand::set_permission_gate`.
//!
//! ```ignore
//! use command_gate::prelude::*;
//!
//! struct Kick;
//!
//! #[permission]
//! impl SubcommandHandler for Kick {
//!     fn name(&self) -> &str {
//!         "kick"
//!     }
//!
//!     fn handle_subcommand(&self, user: &dyn User, args: &[String]) -> Result<(), GateError> {
//!         Ok(())
//!     }
//! }
//! ```
//!
//! ## Marker with a declared gate
//!
//! `SubcommandRegistry::register` installs the declared gate.
//!
//! ```ignore
//! use command_gate::prelude::*;
//!
//! struct Ban;
//!
//! #[permission(node = "admin.ban", message = "&cNo permission")]
//! impl SubcommandHandler for Ban {
//!     fn name(&self) -> &str {
//!         "ban"
//!     }
//!
//!     fn handle_subcommand(&self, user: &dyn User, args: &[String]) -> Result<(), GateError> {
//!         Ok(())
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parser, parse_macro_input, parse_quote, punctuated::Punctuated, Expr, ExprLit,
    ImplItem, ItemImpl, Lit, Meta, Token,
};

/// Name of the handler method the marker vouches for
const HANDLER_FN: &str = "handle_subcommand";

/// Capability flag generated by the marker
const FLAG_FN: &str = "requires_permission_gate";

/// Declared gate accessor generated when arguments are given
const DECLARED_FN: &str = "declared_permission_gate";

/// Arguments parsed from the `#[permission(...)]` attribute
struct PermissionArgs {
    node: Option<String>,
    message: Option<String>,
}

impl PermissionArgs {
    /// Parse arguments from the attribute token stream
    fn parse(attr: TokenStream2) -> syn::Result<Self> {
        let mut node = None;
        let mut message = None;

        if !attr.is_empty() {
            let parser = Punctuated::<Meta, Token![,]>::parse_terminated;
            let metas = parser.parse2(attr)?;

            for meta in metas {
                match meta {
                    Meta::NameValue(nv) => {
                        let ident = nv
                            .path
                            .get_ident()
                            .ok_or_else(|| {
                                syn::Error::new_spanned(&nv.path, "Expected simple identifier")
                            })?
                            .to_string();

                        let slot = match ident.as_str() {
                            "node" => &mut node,
                            "message" => &mut message,
                            _ => {
                                return Err(syn::Error::new_spanned(
                                    &nv.path,
                                    format!("Unknown attribute '{}'", ident),
                                ));
                            }
                        };

                        if slot.is_some() {
                            return Err(syn::Error::new_spanned(
                                &nv.path,
                                format!("Duplicate attribute '{}'", ident),
                            ));
                        }

                        if let Expr::Lit(ExprLit {
                            lit: Lit::Str(lit), ..
                        }) = &nv.value
                        {
                            *slot = Some(lit.value());
                        } else {
                            return Err(syn::Error::new_spanned(
                                &nv.value,
                                format!("Expected string literal for {}", ident),
                            ));
                        }
                    }
                    _ => {
                        return Err(syn::Error::new_spanned(
                            &meta,
                            "Expected node = \"...\" or message = \"...\"",
                        ));
                    }
                }
            }
        }

        Ok(Self { node, message })
    }

    /// The declared (node, message) pair; both or neither must be present
    fn declared_gate(self) -> syn::Result<Option<(String, String)>> {
        match (self.node, self.message) {
            (Some(node), Some(message)) => Ok(Some((node, message))),
            (None, None) => Ok(None),
            _ => Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                "#[permission] needs both node = \"...\" and message = \"...\", or neither",
            )),
        }
    }
}

/// Functions defined in an impl block
fn defined_fns(item: &ItemImpl) -> impl Iterator<Item = &syn::ImplItemFn> {
    item.items.iter().filter_map(|i| match i {
        ImplItem::Fn(f) => Some(f),
        _ => None,
    })
}

/// Validate that the marker sits on a `SubcommandHandler` impl with a handler
fn validate_impl(item: &ItemImpl, declares_gate: bool) -> syn::Result<()> {
    let Some((_, path, _)) = &item.trait_ else {
        return Err(syn::Error::new_spanned(
            &item.self_ty,
            "#[permission] must be placed on an `impl SubcommandHandler for T` block",
        ));
    };

    let is_handler_trait = path
        .segments
        .last()
        .is_some_and(|seg| seg.ident == "SubcommandHandler");
    if !is_handler_trait {
        return Err(syn::Error::new_spanned(
            path,
            "#[permission] can only mark SubcommandHandler implementations",
        ));
    }

    if !defined_fns(item).any(|f| f.sig.ident == HANDLER_FN) {
        return Err(syn::Error::new_spanned(
            item.impl_token,
            format!("#[permission] requires the impl to define `{}`", HANDLER_FN),
        ));
    }

    for f in defined_fns(item) {
        if f.sig.ident == FLAG_FN || (declares_gate && f.sig.ident == DECLARED_FN) {
            return Err(syn::Error::new_spanned(
                &f.sig.ident,
                format!("`{}` is generated by #[permission]; remove it", f.sig.ident),
            ));
        }
    }

    Ok(())
}

/// Attribute macro marking a subcommand handler as permission-aware
///
/// Place it on the `impl SubcommandHandler for T` block. The macro generates
/// `requires_permission_gate() -> true`, which `Subcommand::set_permission_gate`
/// checks before accepting a gate.
///
/// # Arguments
///
/// * `node` - Optional permission node declared with the handler
/// * `message` - Denial message for `node`; required when `node` is given
///
/// When both are present the macro also generates `declared_permission_gate`,
/// which `SubcommandRegistry::register` installs.
///
/// # Requirements
///
/// * Must be placed on a trait impl of `SubcommandHandler`
/// * The impl must define `handle_subcommand`
/// * The impl must not define the generated methods itself
///
/// # Example
///
/// ```ignore
/// use command_gate::prelude::*;
///
/// struct Ban;
///
/// #[permission(node = "admin.ban", message = "&cNo permission")]
/// impl SubcommandHandler for Ban {
///     fn name(&self) -> &str {
///         "ban"
///     }
///
///     fn handle_subcommand(&self, _user: &dyn User, _args: &[String]) -> Result<(), GateError> {
///         Ok(())
///     }
/// }
///
/// assert!(Ban.requires_permission_gate());
/// ```
#[proc_macro_attribute]
pub fn permission(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_impl = parse_macro_input!(item as ItemImpl);

    match expand_permission(attr.into(), input_impl) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Core expansion logic for the permission marker
fn expand_permission(attr: TokenStream2, mut input_impl: ItemImpl) -> syn::Result<TokenStream2> {
    let declared = PermissionArgs::parse(attr)?.declared_gate()?;

    validate_impl(&input_impl, declared.is_some())?;

    input_impl.items.push(parse_quote! {
        fn requires_permission_gate(&self) -> bool {
            true
        }
    });

    if let Some((node, message)) = declared {
        input_impl.items.push(parse_quote! {
            fn declared_permission_gate(
                &self,
            ) -> ::core::option::Option<::command_gate::subcommand::PermissionGate> {
                ::core::option::Option::Some(::command_gate::subcommand::PermissionGate::new(
                    #node, #message,
                ))
            }
        });
    }

    Ok(quote! { #input_impl })
}
