//! Identifier case helpers exposed to templates.
//!
//! These are character-level transforms, not word-segmenting case converters.
//! `camel_case` and `pascal_case` touch only the first character, and
//! `snake_case` rewrites each uppercase letter to `_` plus its lowercase form.
//! Existing `_` and `-` separators pass through untouched, and generated file
//! and column names rely on that.

/// Lower-case the first character only: `ListPets` → `listPets`.
pub fn camel_case(s: &str) -> String {
    map_first(s, |c| c.to_lowercase().collect())
}

/// Upper-case the first character only: `listPets` → `ListPets`.
pub fn pascal_case(s: &str) -> String {
    map_first(s, |c| c.to_uppercase().collect())
}

/// Prefix every uppercase letter with `_` and lower-case it.
///
/// `petId` → `pet_id`, `Pet` → `_pet`, `already_snake` and `kebab-case`
/// are returned unchanged.
pub fn snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn lowercase(s: &str) -> String {
    s.to_lowercase()
}

/// Upper-case the first character and lower-case the rest: `pETS` → `Pets`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn map_first(s: &str, f: impl FnOnce(char) -> String) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => f(first) + chars.as_str(),
        None => String::new(),
    }
}
