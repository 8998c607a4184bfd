//! Identifier normalization.
//!
//! Protocol identifiers come in several shapes: `4917612345678@s.whatsapp.net`,
//! `4917612345678:12@s.whatsapp.net` (device segment), `123456789@lid`
//! (linked-id accounts), or a bare number typed by a user. Everything that
//! compares identities goes through [`bare_number`] first.

/// Domain suffix for direct-chat addresses.
pub const USER_SUFFIX: &str = "@s.whatsapp.net";

/// Reduce a raw protocol identifier to its digits-only canonical form.
///
/// Splits on `@` first, then strips the trailing `:device` segment, drops a
/// literal `lid` marker, and finally removes every non-digit character.
/// Idempotent, and returns an empty string for empty input rather than
/// failing.
pub fn bare_number(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut number = input.split('@').next().unwrap_or("");
    number = number.split(':').next().unwrap_or("");

    // Linked-id accounts carry a "lid" marker next to the digits.
    let number = number.replace("lid", "");

    number.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonicalize an identifier into a full chat address.
///
/// Trims whitespace, drops the device segment, and appends the default
/// user domain when no `@` is present. Returns `None` for empty input.
pub fn to_canonical_jid(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let base = trimmed.split(':').next().unwrap_or("");
    if base.is_empty() {
        return None;
    }

    if base.contains('@') {
        Some(base.to_string())
    } else {
        Some(format!("{base}{USER_SUFFIX}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_number_strips_domain_and_device() {
        assert_eq!(bare_number("12345:1@s.whatsapp.net"), "12345");
        assert_eq!(bare_number("241762096:43@s.whatsapp.net"), "241762096");
        assert_eq!(bare_number("4917612345678@s.whatsapp.net"), "4917612345678");
    }

    #[test]
    fn test_bare_number_strips_lid_marker() {
        assert_eq!(bare_number("123456789@lid"), "123456789");
        assert_eq!(bare_number("123456789lid:4@lid"), "123456789");
    }

    #[test]
    fn test_bare_number_keeps_only_digits() {
        assert_eq!(bare_number("+49 176 12345678"), "4917612345678");
        assert_eq!(bare_number("abc"), "");
    }

    #[test]
    fn test_bare_number_idempotent() {
        let once = bare_number("12345:1@s.whatsapp.net");
        assert_eq!(bare_number(&once), once);
    }

    #[test]
    fn test_bare_number_empty_input() {
        assert_eq!(bare_number(""), "");
    }

    #[test]
    fn test_to_canonical_jid() {
        assert_eq!(
            to_canonical_jid("12345").as_deref(),
            Some("12345@s.whatsapp.net")
        );
        assert_eq!(
            to_canonical_jid("12345:7@s.whatsapp.net").as_deref(),
            Some("12345@s.whatsapp.net")
        );
        assert_eq!(
            to_canonical_jid("12345@g.us").as_deref(),
            Some("12345@g.us")
        );
        assert_eq!(to_canonical_jid(""), None);
        assert_eq!(to_canonical_jid("   "), None);
    }
}
