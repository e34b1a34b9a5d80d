//! Provides the `color_from_hex!` macro, turning an RGB or RGBA hex color into
//! a byte array at compile time.
//!
//! Both `0x` integer literals and string literals (with or without `#`) work.
//!
//! # Examples
//! ```
//! # use hex_colors::color_from_hex;
//! const COLOR: [u8; 3] = color_from_hex!("010203");
//! # fn main() {
//! assert_eq!(COLOR, [1, 2, 3]);
//! assert_eq!(color_from_hex!("#a1b2c3d4"), [0xA1, 0xB2, 0xC3, 0xD4]);
//! assert_eq!(color_from_hex!(0xE5E69092), [0xE5, 0xE6, 0x90, 0x92]);
//! assert_eq!(color_from_hex!(0x0a0B0C), [10, 11, 12]);
//! # }
//! ```

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Lit,
};

struct HexColor(Vec<u8>);

impl Parse for HexColor {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lit = input.parse::<Lit>()?;

        let digits = match &lit {
            Lit::Str(lit) => lit.value().trim_start_matches('#').to_owned(),
            Lit::Int(lit) if !lit.suffix().is_empty() => {
                return Err(syn::Error::new(lit.span(), "hex literal cannot carry a type suffix"));
            }
            Lit::Int(lit) => match lit.token().to_string().strip_prefix("0x") {
                Some(digits) => digits.replace('_', ""),
                None => return Err(syn::Error::new(lit.span(), "expected `0x` prefix")),
            },
            _ => return Err(syn::Error::new(lit.span(), "expected a hex integer or string")),
        };

        if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(syn::Error::new(
                lit.span(),
                "expected 6 or 8 hex digits, ex: 4c4c4cff",
            ));
        }

        digits
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .ok_or_else(|| syn::Error::new(lit.span(), "invalid hex digits"))
            })
            .collect::<syn::Result<Vec<u8>>>()
            .map(Self)
    }
}

/// Expands to a `[u8; 3]` or `[u8; 4]` literal.
#[proc_macro]
pub fn color_from_hex(input: TokenStream) -> TokenStream {
    let HexColor(bytes) = parse_macro_input!(input as HexColor);
    quote!([#(#bytes),*]).into()
}
