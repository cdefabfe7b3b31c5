//! Display-text helpers shared by the selector and the history views.

/// Characters stripped from catalog descriptions before display.
const SPECIAL_CHARS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', ',', '.', '?', '"', ':', '{', '}', '|',
    '<', '>',
];

/// Strip the fixed punctuation set and trim surrounding whitespace.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !SPECIAL_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Turn a plural collection key into a singular, capitalized label:
/// `abilities` -> `Ability`, `skills` -> `Skill`.
pub fn normalize_category(text: &str) -> String {
    let mut chars = text.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => return String::new(),
    };

    if let Some(stem) = capitalized.strip_suffix("ies") {
        format!("{stem}y")
    } else if let Some(stem) = capitalized.strip_suffix("es") {
        format!("{stem}e")
    } else if let Some(stem) = capitalized.strip_suffix('s') {
        stem.to_owned()
    } else {
        capitalized
    }
}
