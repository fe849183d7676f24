use proc_macro::TokenStream;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use proc_macro_crate::{FoundCrate, crate_name};
use quote::{format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Fields, LitInt, LitStr, parse_macro_input};

#[derive(Default)]
struct FieldOptions {
    name: Option<String>,
    kind: Option<String>,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<String>,
    title: Option<String>,
    honeypot: bool,
    counter: bool,
}

#[derive(Default)]
struct FormOptions {
    id: Option<String>,
    submit_label: Option<String>,
}

#[proc_macro_derive(FormModel, attributes(form, field))]
pub fn derive_form_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.ident,
            "FormModel derive currently supports only non-generic structs",
        ));
    }

    let form_options = parse_form_options(&input.attrs)?;
    let model_ident = input.ident;
    let fields_struct_ident = format_ident!("{model_ident}Fields");

    let named_fields = match input.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => fields.named,
            _ => {
                return Err(syn::Error::new(
                    Span::call_site(),
                    "FormModel derive requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                Span::call_site(),
                "FormModel derive is only supported on structs",
            ));
        }
    };

    let folioform = folioform_path();
    let mut spec_exprs = Vec::new();
    let mut field_inits = Vec::new();
    let mut key_methods = Vec::new();

    for field in named_fields {
        let Some(field_ident) = field.ident else {
            continue;
        };
        let options = parse_field_options(&field.attrs)?;
        let field_name = options
            .name
            .clone()
            .unwrap_or_else(|| field_ident.to_string());

        spec_exprs.push(spec_expr(&folioform, &field_name, &options));
        field_inits.push(quote! {
            #field_ident: payload
                .get(#field_name)
                .cloned()
                .unwrap_or_default()
        });
        key_methods.push(quote! {
            pub fn #field_ident(&self) -> #folioform::form::FieldKey {
                #folioform::form::FieldKey::new(#field_name)
            }
        });
    }

    let schema_id = form_options
        .id
        .map(|id| quote!(let schema = schema.id(#id);));
    let schema_label = form_options
        .submit_label
        .map(|label| quote!(let schema = schema.submit_label(#label);));

    Ok(quote! {
        #[derive(Clone, Copy, Debug, Default)]
        pub struct #fields_struct_ident;

        impl #fields_struct_ident {
            #(#key_methods)*
        }

        impl #folioform::form::FormModel for #model_ident {
            type Fields = #fields_struct_ident;

            fn fields() -> Self::Fields {
                #fields_struct_ident
            }

            fn schema() -> #folioform::form::FormSchema {
                let schema = #folioform::form::FormSchema::new();
                #schema_id
                #schema_label
                schema #(.field(#spec_exprs))*
            }

            fn from_payload(payload: &#folioform::form::Payload) -> Self {
                Self {
                    #(#field_inits),*
                }
            }
        }
    })
}

fn spec_expr(folioform: &TokenStream2, name: &str, options: &FieldOptions) -> TokenStream2 {
    let mut expr = quote!(#folioform::form::FieldSpec::new(#name));
    if let Some(kind) = &options.kind {
        expr = quote!(#expr.kind(#folioform::form::FieldKind::from_type_attr(#kind)));
    }
    if options.required {
        expr = quote!(#expr.required(true));
    }
    if let Some(min) = options.min_length {
        expr = quote!(#expr.min_length(#min));
    }
    if let Some(max) = options.max_length {
        expr = quote!(#expr.max_length(#max));
    }
    if let Some(pattern) = &options.pattern {
        expr = quote!(#expr.pattern(#pattern));
    }
    if let Some(title) = &options.title {
        expr = quote!(#expr.title(#title));
    }
    if options.honeypot {
        expr = quote!(#expr.honeypot(true));
    }
    if options.counter {
        expr = quote!(#expr.counter(true));
    }
    expr
}

fn parse_form_options(attrs: &[Attribute]) -> syn::Result<FormOptions> {
    let mut options = FormOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("form")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                options.id = Some(meta.value()?.parse::<LitStr>()?.value());
                return Ok(());
            }
            if meta.path.is_ident("submit_label") {
                options.submit_label = Some(meta.value()?.parse::<LitStr>()?.value());
                return Ok(());
            }
            Err(meta.error("unsupported form attribute, expected `id` or `submit_label`"))
        })?;
    }
    Ok(options)
}

fn parse_field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("field")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("required") {
                options.required = true;
            } else if meta.path.is_ident("honeypot") {
                options.honeypot = true;
            } else if meta.path.is_ident("counter") {
                options.counter = true;
            } else if meta.path.is_ident("name") {
                options.name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("kind") {
                options.kind = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("pattern") {
                options.pattern = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("title") {
                options.title = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("min_length") {
                options.min_length = Some(meta.value()?.parse::<LitInt>()?.base10_parse()?);
            } else if meta.path.is_ident("max_length") {
                options.max_length = Some(meta.value()?.parse::<LitInt>()?.base10_parse()?);
            } else {
                return Err(meta.error("unsupported field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

fn folioform_path() -> TokenStream2 {
    match crate_name("folioform") {
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Ok(FoundCrate::Itself) => quote!(crate),
        Err(_) => quote!(::folioform),
    }
}
