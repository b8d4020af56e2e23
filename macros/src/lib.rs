//! Derive macros for the Cadence client state architecture
//!
//! This crate provides procedural macros that remove the boilerplate shared
//! by every Cadence store.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Command/event helpers and request correlation for action enums
//! - `#[derive(State)]` - Loading and error bookkeeping for state structs
//!
//! # Example
//!
//! ```ignore
//! use cadence_core::action::RequestId;
//! use cadence_macros::{Action, State};
//!
//! #[derive(Action, Clone, Debug)]
//! enum TaskAction {
//!     #[command]
//!     CreateTask { request_id: RequestId, title: String },
//!
//!     #[event]
//!     TaskCreated { request_id: RequestId, id: i64 },
//! }
//!
//! #[derive(State, Clone, Debug, Default)]
//! struct TaskState {
//!     tasks: Vec<Task>,
//!     #[loading]
//!     pending: usize,
//!     #[last_error]
//!     error: Option<String>,
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_command()` - Returns true if this variant is a command
/// - `is_event()` - Returns true if this variant is an event
/// - `event_type()` - Returns the event type name used in logs
///
/// It also implements `cadence_core::action::Correlated`: every variant with
/// a named `request_id` field reports it, all others report `None`.
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command
/// - `#[event]` - Mark a variant as an event
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[command]` and `#[event]` attributes
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut is_command_arms = Vec::new();
    let mut is_event_arms = Vec::new();
    let mut event_type_arms = Vec::new();
    let mut request_id_arms = Vec::new();

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(variant, "Variant cannot be both #[command] and #[event]")
                .to_compile_error()
                .into();
        }

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) },
            Fields::Unit => quote! { Self::#variant_name },
        };

        if is_command {
            is_command_arms.push(quote! { #pattern => true, });
        }

        if is_event {
            let type_name = format!("{variant_name}.v1");
            is_event_arms.push(quote! { #pattern => true, });
            event_type_arms.push(quote! { #pattern => #type_name, });
        }

        if let Fields::Named(named) = &variant.fields {
            let carries_request_id = named
                .named
                .iter()
                .any(|field| field.ident.as_ref().is_some_and(|ident| ident == "request_id"));

            if carries_request_id {
                request_id_arms.push(quote! {
                    Self::#variant_name { request_id, .. } => ::core::option::Option::Some(*request_id),
                });
            }
        }
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a command
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#is_command_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#is_event_arms)*
                    _ => false,
                }
            }

            /// Returns the event type name used in logs
            ///
            /// Only events have type names. Commands return "unknown".
            #[must_use]
            #[allow(unreachable_patterns)]
            pub const fn event_type(&self) -> &'static str {
                match self {
                    #(#event_type_arms)*
                    _ => "unknown",
                }
            }
        }

        impl ::cadence_core::action::Correlated for #name {
            #[allow(unreachable_patterns)]
            fn request_id(&self) -> ::core::option::Option<::cadence_core::action::RequestId> {
                match self {
                    #(#request_id_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for State structs
///
/// Generates request bookkeeping for store state:
/// - `#[loading]` on a `usize` field counting in-flight requests generates
///   `is_loading()`, `begin_request()` and `finish_request()`
/// - `#[last_error]` on an `Option<String>` field generates `last_error()`,
///   `record_error()` and `clear_error()`
///
/// The loading field is a counter, not a flag: overlapping requests each
/// increment it and the indicator only drops once all of them have settled.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-struct type
/// - An attribute is placed on a tuple-struct field
#[proc_macro_derive(State, attributes(loading, last_error))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(State)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let loading_field = match marked_field(&data_struct.fields, "loading") {
        Ok(field) => field,
        Err(error) => return error.to_compile_error().into(),
    };
    let error_field = match marked_field(&data_struct.fields, "last_error") {
        Ok(field) => field,
        Err(error) => return error.to_compile_error().into(),
    };

    let loading_impl = loading_field.map(|field| {
        quote! {
            /// Whether at least one request is in flight
            #[must_use]
            pub const fn is_loading(&self) -> bool {
                self.#field > 0
            }

            /// Mark a request as started
            pub const fn begin_request(&mut self) {
                self.#field = self.#field.saturating_add(1);
            }

            /// Mark a request as settled, successfully or not
            pub const fn finish_request(&mut self) {
                self.#field = self.#field.saturating_sub(1);
            }
        }
    });

    let error_impl = error_field.map(|field| {
        quote! {
            /// The most recently recorded error message
            #[must_use]
            pub fn last_error(&self) -> ::core::option::Option<&str> {
                self.#field.as_deref()
            }

            /// Record a human-readable error message
            pub fn record_error(&mut self, message: impl ::core::convert::Into<::std::string::String>) {
                self.#field = ::core::option::Option::Some(message.into());
            }

            /// Forget the recorded error message
            pub fn clear_error(&mut self) {
                self.#field = ::core::option::Option::None;
            }
        }
    });

    if loading_impl.is_none() && error_impl.is_none() {
        return TokenStream::new();
    }

    let expanded = quote! {
        impl #name {
            #loading_impl
            #error_impl
        }
    };

    TokenStream::from(expanded)
}

/// Find the single named field carrying `#[attr]`
fn marked_field<'a>(fields: &'a Fields, attr: &str) -> Result<Option<&'a Ident>, syn::Error> {
    let Some(field) = fields.iter().find(|field| has_attribute(&field.attrs, attr)) else {
        return Ok(None);
    };

    field.ident.as_ref().map(Some).ok_or_else(|| {
        syn::Error::new_spanned(field, format!("#[{attr}] requires a named field"))
    })
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
