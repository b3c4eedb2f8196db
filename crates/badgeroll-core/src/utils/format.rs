/// Country calling code applied to local numbers (Côte d'Ivoire)
pub const DEFAULT_COUNTRY_PREFIX: &str = "+225";

/// Normalize a phone number for dialing.
/// Strips whitespace; a leading `0` is replaced by the country prefix and a
/// number without `+` gets the prefix prepended. Empty input stays empty.
pub fn normalize_phone(contact: &str, country_prefix: &str) -> String {
    let number: String = contact.chars().filter(|c| !c.is_whitespace()).collect();

    if number.is_empty() {
        number
    } else if let Some(rest) = number.strip_prefix('0') {
        format!("{}{}", country_prefix, rest)
    } else if number.starts_with('+') {
        number
    } else {
        format!("{}{}", country_prefix, number)
    }
}

/// QR payload that dials the member directly when scanned
pub fn tel_uri(contact: &str, country_prefix: &str) -> String {
    format!("tel:{}", normalize_phone(contact, country_prefix))
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
