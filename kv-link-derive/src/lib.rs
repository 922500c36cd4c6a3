use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, parse_macro_input};

#[proc_macro_derive(KvEntity, attributes(kv_entity))]
pub fn derive_kv_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_kv_entity(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_kv_entity(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    // 注册表中只能保存具体类型
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            format!(
                "Entity '{}' is generic. Only concrete types can derive KvEntity.",
                struct_name
            ),
        ));
    }

    let namespace = match parse_namespace(input)? {
        Some(namespace) => namespace,
        None => to_snake_case(&struct_name.to_string()),
    };

    Ok(quote! {
        impl kv_link::KvEntity for #struct_name {
            fn type_path() -> &'static str {
                concat!(module_path!(), "::", stringify!(#struct_name))
            }

            fn namespace() -> &'static str {
                #namespace
            }
        }

        kv_link::__private::inventory::submit! {
            kv_link::EntityMeta {
                type_path: concat!(module_path!(), "::", stringify!(#struct_name)),
                namespace: #namespace,
            }
        }
    })
}

// 解析 #[kv_entity(namespace = "...")]
fn parse_namespace(input: &DeriveInput) -> syn::Result<Option<String>> {
    let mut namespace = None;
    for attr in input
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("kv_entity"))
    {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("namespace") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("namespace must not be empty"));
                }
                namespace = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported kv_entity attribute, expected `namespace`"))
            }
        })?;
    }
    Ok(namespace)
}

// OrderLine -> order_line, HTTPRequest -> http_request
fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if i > 0 && (prev_lower || (next_lower && chars[i - 1].is_uppercase())) {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_names() {
        assert_eq!(to_snake_case("Order"), "order");
        assert_eq!(to_snake_case("OrderLine"), "order_line");
        assert_eq!(to_snake_case("HTTPRequest"), "http_request");
        assert_eq!(to_snake_case("Order2Line"), "order2_line");
        assert_eq!(to_snake_case("ID"), "id");
    }

    #[test]
    fn explicit_namespace_wins() {
        let input: DeriveInput = syn::parse_quote! {
            #[kv_entity(namespace = "customer")]
            struct CustomerRecord;
        };
        let expanded = expand_kv_entity(&input).unwrap().to_string();
        assert!(expanded.contains("\"customer\""));
        assert!(!expanded.contains("customer_record"));
    }

    #[test]
    fn default_namespace_is_snake_case() {
        let input: DeriveInput = syn::parse_quote! {
            struct ShippingAddress;
        };
        let expanded = expand_kv_entity(&input).unwrap().to_string();
        assert!(expanded.contains("\"shipping_address\""));
    }

    #[test]
    fn rejects_generics_and_bad_attributes() {
        let generic: DeriveInput = syn::parse_quote! {
            struct Wrapper<T>(T);
        };
        assert!(expand_kv_entity(&generic).is_err());

        let empty: DeriveInput = syn::parse_quote! {
            #[kv_entity(namespace = "")]
            struct Order;
        };
        assert!(expand_kv_entity(&empty).is_err());

        let unknown: DeriveInput = syn::parse_quote! {
            #[kv_entity(bucket = "order")]
            struct Order;
        };
        assert!(expand_kv_entity(&unknown).is_err());
    }
}
