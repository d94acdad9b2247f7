//! Shape rules for command table entries
//!
//! Shared by the build script, which checks `commands.toml`, and by
//! `CommandDefinition::new`, which checks custom specs.

/// Two uppercase hex digits
pub fn is_token(token: &str) -> bool {
    token.len() == 2
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
}

/// Two lowercase alphanumerics
pub fn is_raw_id(id: &str) -> bool {
    id.len() == 2
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Lowercase snake_case
pub fn is_long_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Printable ASCII without uppercase letters
pub fn is_value_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_graphic() && !c.is_ascii_uppercase())
}
