//! Naming helpers shared by the schema builder and the tests.

use heck::{ToLowerCamelCase, ToSnakeCase};

/// `user_profile` -> `userProfile`
pub fn camel_case(src: &str) -> String {
    src.to_lower_camel_case()
}

pub fn snake_case(src: &str) -> String {
    src.to_snake_case()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn upper_first(src: &str) -> String {
    let mut chars = src.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Singular form of the last word in `src`, preserving the casing of the
/// first character.
pub fn singularize(src: &str) -> String {
    inflect(src, 1)
}

/// Plural form of the last word in `src`, preserving the casing of the first
/// character.
pub fn pluralize(src: &str) -> String {
    inflect(src, 2)
}

fn inflect(src: &str, count: isize) -> String {
    // Only the trailing word is inflected: `user_project` -> `user_projects`
    let split = src
        .char_indices()
        .rev()
        .find(|(i, c)| *c == '_' || (*i > 0 && c.is_uppercase()))
        .map(|(i, c)| if c == '_' { i + 1 } else { i })
        .unwrap_or(0);

    let (head, tail) = src.split_at(split);
    if tail.is_empty() {
        return src.to_string();
    }

    let inflected = pluralizer::pluralize(&tail.to_lowercase(), count, false);
    let inflected = if tail.starts_with(char::is_uppercase) {
        upper_first(&inflected)
    } else {
        inflected
    };

    format!("{head}{inflected}")
}
