use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Expr, Fields, Lit, LitFloat, LitStr, Meta, Token, parse_macro_input,
    punctuated::Punctuated, spanned::Spanned,
};

/// Variant attributes: `#[levels(<min>, <ave>, <max>)]` and `#[color("<hex>")]`.
#[proc_macro_derive(TicketPreset, attributes(levels, color))]
pub fn derive_ticket_preset(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_ident = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "TicketPreset can only be derived for enums",
        ));
    };

    let mut idents = Vec::new();
    let mut level_arms = Vec::new();
    let mut color_arms = Vec::new();

    for variant in &data_enum.variants {
        // Presets are plain names; payloads make no sense here.
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "TicketPreset only supports fieldless variants",
            ));
        }

        let mut levels: Option<[Expr; 3]> = None;
        let mut color: Option<LitStr> = None;

        for attr in &variant.attrs {
            if attr.path().is_ident("levels") {
                let Meta::List(list) = &attr.meta else {
                    return Err(syn::Error::new(
                        attr.span(),
                        "use #[levels(<min>, <ave>, <max>)]",
                    ));
                };
                let parsed =
                    list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
                let exprs: Vec<Expr> = parsed.into_iter().map(to_f64_expr).collect();
                let exprs: [Expr; 3] = exprs.try_into().map_err(|_| {
                    syn::Error::new(list.span(), "expected exactly three values: min, ave, max")
                })?;
                levels = Some(exprs);
            } else if attr.path().is_ident("color") {
                let Meta::List(list) = &attr.meta else {
                    return Err(syn::Error::new(attr.span(), "use #[color(\"#rrggbb\")]"));
                };
                color = Some(list.parse_args::<LitStr>()?);
            }
        }

        let ident = &variant.ident;
        let Some([min, ave, max]) = levels else {
            return Err(syn::Error::new(
                variant.span(),
                "missing #[levels(...)] on variant",
            ));
        };
        let Some(color) = color else {
            return Err(syn::Error::new(variant.span(), "missing #[color(...)] on variant"));
        };

        level_arms.push(quote! {
            Self::#ident => chaos_gacha::Levels { min: #min, ave: #ave, max: #max }
        });
        color_arms.push(quote! { Self::#ident => #color });
        idents.push(ident);
    }

    Ok(quote! {
        impl chaos_gacha::TicketPreset for #enum_ident {
            const ALL: &'static [Self] = &[
                #(Self::#idents),*
            ];

            fn levels(self) -> chaos_gacha::Levels {
                match self {
                    #(#level_arms),*
                }
            }

            fn color(self) -> &'static str {
                match self {
                    #(#color_arms),*
                }
            }
        }
    })
}

/// Recursively rewrite integer literals to floating-point (e.g., 10 -> 10.0),
/// so `#[levels(6.5, 8.3, 10)]` produces an `f64` everywhere.
fn to_f64_expr(mut e: Expr) -> Expr {
    match e {
        Expr::Lit(ref mut el) => {
            if let Lit::Int(int) = &el.lit {
                let s = format!("{}{}", int.base10_digits(), ".0");
                el.lit = Lit::Float(LitFloat::new(&s, int.span()));
            }
            e
        }
        Expr::Binary(mut b) => {
            b.left = Box::new(to_f64_expr(*b.left));
            b.right = Box::new(to_f64_expr(*b.right));
            Expr::Binary(b)
        }
        Expr::Paren(mut p) => {
            p.expr = Box::new(to_f64_expr(*p.expr));
            Expr::Paren(p)
        }
        Expr::Unary(mut u) => {
            u.expr = Box::new(to_f64_expr(*u.expr));
            Expr::Unary(u)
        }
        Expr::Group(mut g) => {
            g.expr = Box::new(to_f64_expr(*g.expr));
            Expr::Group(g)
        }
        _ => e,
    }
}
