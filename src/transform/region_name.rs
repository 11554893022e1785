/// Turn a folder-derived region name into its display name.
///
/// Code-like names (only uppercase letters, digits and hyphens, e.g. wormhole
/// designators such as `UUA-F4` or `J1226`) come back unchanged. Anything else
/// gets a space at each lowercase-to-uppercase boundary: `TheForge` becomes
/// `The Forge`.
pub fn format_region_name(raw: &str) -> String {
    if is_code_like(raw) {
        return raw.to_string();
    }

    let mut result = String::with_capacity(raw.len() + 4);
    let mut prev: Option<char> = None;

    for c in raw.chars() {
        if let Some(p) = prev {
            if p.is_ascii_lowercase() && c.is_ascii_uppercase() {
                result.push(' ');
            }
        }
        result.push(c);
        prev = Some(c);
    }

    result
}

fn is_code_like(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}
