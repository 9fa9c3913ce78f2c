//! Sender display name derivation.

/// Derives a human-readable name from the local part of an address.
///
/// Dots become spaces and every word is capitalized:
/// `jane.doe@example.com` becomes `Jane Doe`. Input without `@` is used whole.
pub fn display_name_from_address(address: &str) -> String {
    let local = address.split('@').next().unwrap_or(address);

    local
        .split('.')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
