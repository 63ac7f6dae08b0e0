use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, parse_quote, Attribute, Data,
    DeriveInput, Fields, Ident, Lit, Token,
};

/// Field-level `#[config(...)]` arguments
#[derive(Default)]
struct FieldArgs {
    default: Option<String>,
    required: bool,
    src: Option<String>,
    layout: Option<String>,
    skip: bool,
}

impl Parse for FieldArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = FieldArgs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "required" => {
                    if input.peek(Token![=]) {
                        input.parse::<Token![=]>()?;
                        let lit: Lit = input.parse()?;
                        args.required = match lit {
                            Lit::Bool(b) => b.value,
                            Lit::Str(s) => is_truthy(&s.value()),
                            other => {
                                return Err(syn::Error::new(
                                    other.span(),
                                    "required must be a boolean or a string literal",
                                ));
                            }
                        };
                    } else {
                        args.required = true;
                    }
                }
                "skip" => args.skip = true,
                "default" => {
                    input.parse::<Token![=]>()?;
                    let lit: Lit = input.parse()?;
                    args.default = Some(match lit {
                        Lit::Str(s) => s.value(),
                        Lit::Int(i) => i.base10_digits().to_string(),
                        Lit::Float(f) => f.base10_digits().to_string(),
                        Lit::Bool(b) => b.value.to_string(),
                        other => {
                            return Err(syn::Error::new(
                                other.span(),
                                "default must be a string, number or boolean literal",
                            ));
                        }
                    });
                }
                "src" => {
                    input.parse::<Token![=]>()?;
                    args.src = Some(string_lit(input, "src")?);
                }
                "layout" => {
                    input.parse::<Token![=]>()?;
                    args.layout = Some(string_lit(input, "layout")?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!(
                            "unknown attribute `{}`, expected `default`, `required`, `src`, `layout`, or `skip`",
                            other
                        ),
                    ));
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// Container-level `#[config(...)]` arguments
#[derive(Default)]
struct ContainerArgs {
    rename_all: Option<RenameRule>,
}

impl Parse for ContainerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ContainerArgs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "rename_all" => {
                    let lit: Lit = input.parse()?;
                    let Lit::Str(s) = &lit else {
                        return Err(syn::Error::new(lit.span(), "rename_all must be a string literal"));
                    };
                    args.rename_all = Some(RenameRule::parse(&s.value()).ok_or_else(|| {
                        syn::Error::new(
                            s.span(),
                            "unknown rename rule, expected one of \"PascalCase\", \"camelCase\", \
                             \"lowercase\", \"UPPERCASE\", \"SCREAMING_SNAKE_CASE\", \
                             \"kebab-case\", \"snake_case\"",
                        )
                    })?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute `{}`, expected `rename_all`", other),
                    ));
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

#[derive(Clone, Copy)]
enum RenameRule {
    Pascal,
    Camel,
    Lower,
    Upper,
    ScreamingSnake,
    Kebab,
    Snake,
}

impl RenameRule {
    fn parse(rule: &str) -> Option<Self> {
        match rule {
            "PascalCase" => Some(RenameRule::Pascal),
            "camelCase" => Some(RenameRule::Camel),
            "lowercase" => Some(RenameRule::Lower),
            "UPPERCASE" => Some(RenameRule::Upper),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnake),
            "kebab-case" => Some(RenameRule::Kebab),
            "snake_case" => Some(RenameRule::Snake),
            _ => None,
        }
    }

    /// Apply to a snake_case field name
    fn apply(self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_string(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::Pascal => pascal(field),
            RenameRule::Camel => {
                let pascal = pascal(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => pascal,
                }
            }
        }
    }
}

fn pascal(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

fn is_truthy(text: &str) -> bool {
    matches!(
        text.to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}

fn string_lit(input: ParseStream, name: &str) -> syn::Result<String> {
    let lit: Lit = input.parse()?;
    match lit {
        Lit::Str(s) => Ok(s.value()),
        other => Err(syn::Error::new(
            other.span(),
            format!("{} must be a string literal", name),
        )),
    }
}

fn config_attrs<T: Parse + Default>(attrs: &[Attribute], merge: impl Fn(&mut T, T)) -> syn::Result<T> {
    let mut args = T::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("config")) {
        merge(&mut args, attr.parse_args::<T>()?);
    }
    Ok(args)
}

/// Derive `layerconf::Configurable`
///
/// Field attributes, inside `#[config(...)]`:
/// - `default = "..."`: literal used when no source has a value
/// - `required`, `required = true` or `required = "yes"`: fail when the
///   value is missing
/// - `src = "KEY"`: look the field up under `KEY` instead of its name
/// - `layout = "%Y-%m-%d"`: strptime layout for timestamp fields
/// - `skip`: leave the field alone
///
/// Container attribute: `rename_all = "PascalCase"` (also `camelCase`,
/// `lowercase`, `UPPERCASE`, `SCREAMING_SNAKE_CASE`, `kebab-case`,
/// `snake_case`).
#[proc_macro_derive(Configurable, attributes(config))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "Configurable can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            name,
            "Configurable can only be derived for structs with named fields",
        ));
    };

    let container: ContainerArgs = config_attrs(&input.attrs, |args: &mut ContainerArgs, next| {
        if next.rename_all.is_some() {
            args.rename_all = next.rename_all;
        }
    })?;

    let mut descriptors = Vec::new();
    let mut assignments = Vec::new();
    let mut field_types = Vec::new();

    for field in &fields.named {
        let args: FieldArgs = config_attrs(&field.attrs, |args: &mut FieldArgs, next| {
            args.required |= next.required;
            args.skip |= next.skip;
            args.default = next.default.or(args.default.take());
            args.src = next.src.or(args.src.take());
            args.layout = next.layout.or(args.layout.take());
        })?;
        if args.skip {
            continue;
        }

        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;

        let raw = syn::ext::IdentExt::unraw(ident).to_string();
        let key = match container.rename_all {
            Some(rule) => rule.apply(&raw),
            None => raw,
        };

        let default = args
            .default
            .map(|value| quote! { .with_default(#value) });
        let required = args.required.then(|| quote! { .required(true) });
        let src = args.src.map(|key| quote! { .with_source_key(#key) });
        let layout = args.layout.map(|layout| quote! { .with_layout(#layout) });

        descriptors.push(quote! {
            ::layerconf::FieldDescriptor::new(#key, <#ty as ::layerconf::FieldType>::kind())
                #default #required #src #layout
        });
        assignments.push(quote! {
            if let ::std::option::Option::Some(::std::option::Option::Some(value)) =
                ::std::iter::Iterator::next(&mut values)
            {
                ::layerconf::FieldType::assign(&mut self.#ident, value);
            }
        });
        field_types.push(ty.clone());
    }

    let mut generics = input.generics.clone();
    if !generics.params.is_empty() {
        let where_clause = generics.make_where_clause();
        for ty in &field_types {
            where_clause
                .predicates
                .push(parse_quote! { #ty: ::layerconf::FieldType });
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::layerconf::Configurable for #name #ty_generics #where_clause {
            fn describe() -> ::std::vec::Vec<::layerconf::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn apply(&mut self, values: ::layerconf::StructValue) {
                let mut values = ::std::iter::IntoIterator::into_iter(values);
                #(#assignments)*
            }
        }

        impl #impl_generics ::layerconf::FieldType for #name #ty_generics #where_clause {
            fn kind() -> ::layerconf::FieldKind {
                ::layerconf::FieldKind::Struct(
                    <Self as ::layerconf::Configurable>::describe(),
                )
            }

            fn assign(&mut self, value: ::layerconf::ConfigValue) {
                if let ::layerconf::ConfigValue::Struct(values) = value {
                    ::layerconf::Configurable::apply(self, values);
                }
            }
        }

        impl #impl_generics ::layerconf::Destination for #name #ty_generics #where_clause {
            fn populate_with<__R: ::layerconf::Resolve + ?::std::marker::Sized>(
                self,
                _populator: &::layerconf::Populator<'_, __R>,
            ) -> ::layerconf::Result<()> {
                ::std::result::Result::Err(::layerconf::ConfigError::NotAPointer)
            }
        }
    })
}
