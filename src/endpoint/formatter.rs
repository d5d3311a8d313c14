//! Address formatting
//!
//! A mapping string such as `"%S %n, %z %L"` decides how a structured
//! address becomes the label shown to editors. The placeholders follow the
//! geocoder-php string formatter:
//!
//! | token | field            |
//! |-------|------------------|
//! | `%S`  | street name      |
//! | `%n`  | street number    |
//! | `%z`  | postal code      |
//! | `%L`  | locality         |
//! | `%D`  | sub-locality     |
//! | `%A1` | state / region   |
//! | `%C`  | country          |
//! | `%c`  | country code     |
//!
//! `native` (or an empty mapping) keeps the provider's own display name.

use serde::{Deserialize, Serialize};

/// Mapping value that selects the provider's own label
pub const NATIVE: &str = "native";

/// Structured address components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_level_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl Address {
    fn field(&self, token: Token) -> &str {
        let value = match token {
            Token::StreetName => &self.street_name,
            Token::StreetNumber => &self.street_number,
            Token::PostalCode => &self.postal_code,
            Token::Locality => &self.locality,
            Token::SubLocality => &self.sub_locality,
            Token::AdminLevel1 => &self.admin_level_1,
            Token::Country => &self.country,
            Token::CountryCode => &self.country_code,
        };
        value.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    StreetName,
    StreetNumber,
    PostalCode,
    Locality,
    SubLocality,
    AdminLevel1,
    Country,
    CountryCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Field(Token),
}

/// Compiled address mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFormatter {
    parts: Option<Vec<Part>>,
}

impl AddressFormatter {
    /// Compile a mapping string. Unknown `%` sequences are kept literally.
    pub fn new(mapping: &str) -> Self {
        let mapping = mapping.trim();
        if mapping.is_empty() || mapping.eq_ignore_ascii_case(NATIVE) {
            return Self::native();
        }

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut chars = mapping.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }

            let token = match chars.peek() {
                Some('S') => Some(Token::StreetName),
                Some('n') => Some(Token::StreetNumber),
                Some('z') => Some(Token::PostalCode),
                Some('L') => Some(Token::Locality),
                Some('D') => Some(Token::SubLocality),
                Some('C') => Some(Token::Country),
                Some('c') => Some(Token::CountryCode),
                Some('A') => {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.peek() == Some(&'1') {
                        chars.next();
                        Some(Token::AdminLevel1)
                    } else {
                        None
                    }
                }
                _ => None,
            };

            match token {
                Some(token) => {
                    chars.next();
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    parts.push(Part::Field(token));
                }
                None => literal.push(c),
            }
        }

        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        Self { parts: Some(parts) }
    }

    /// Formatter that always keeps the provider label
    pub fn native() -> Self {
        Self { parts: None }
    }

    pub fn is_native(&self) -> bool {
        self.parts.is_none()
    }

    /// Format `address`, falling back to `native_label` for the native
    /// mapping or when the mapping produces nothing.
    pub fn format(&self, address: &Address, native_label: &str) -> String {
        let Some(parts) = &self.parts else {
            return native_label.to_string();
        };

        let mut output = String::new();
        for part in parts {
            match part {
                Part::Literal(text) => output.push_str(text),
                Part::Field(token) => output.push_str(address.field(*token)),
            }
        }

        let cleaned = tidy(&output);
        if cleaned.is_empty() {
            native_label.to_string()
        } else {
            cleaned
        }
    }
}

impl Default for AddressFormatter {
    fn default() -> Self {
        Self::native()
    }
}

/// Collapse whitespace left by empty fields and drop dangling separators
fn tidy(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let collapsed = collapsed.replace(" ,", ",");
    collapsed
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin() -> Address {
        Address {
            street_name: Some("Unter den Linden".to_string()),
            street_number: Some("77".to_string()),
            postal_code: Some("10117".to_string()),
            locality: Some("Berlin".to_string()),
            sub_locality: Some("Mitte".to_string()),
            admin_level_1: Some("Berlin".to_string()),
            country: Some("Germany".to_string()),
            country_code: Some("de".to_string()),
        }
    }

    #[test]
    fn test_native() {
        let formatter = AddressFormatter::new("native");
        assert!(formatter.is_native());
        assert_eq!(formatter.format(&berlin(), "Provider label"), "Provider label");
        assert!(AddressFormatter::new("  ").is_native());
    }

    #[test]
    fn test_mapping() {
        let formatter = AddressFormatter::new("%S %n, %z %L");
        assert_eq!(
            formatter.format(&berlin(), "x"),
            "Unter den Linden 77, 10117 Berlin"
        );

        let formatter = AddressFormatter::new("%D, %A1, %C (%c)");
        assert_eq!(formatter.format(&berlin(), "x"), "Mitte, Berlin, Germany (de)");
    }

    #[test]
    fn test_missing_fields_are_tidied() {
        let address = Address {
            locality: Some("Paris".to_string()),
            country: Some("France".to_string()),
            ..Address::default()
        };
        let formatter = AddressFormatter::new("%S %n, %z %L, %C");
        assert_eq!(formatter.format(&address, "x"), "Paris, France");
    }

    #[test]
    fn test_empty_result_falls_back() {
        let formatter = AddressFormatter::new("%S %n");
        assert_eq!(formatter.format(&Address::default(), "Somewhere"), "Somewhere");
    }

    #[test]
    fn test_unknown_tokens_kept() {
        let formatter = AddressFormatter::new("%L 100% %A2 %Q");
        assert_eq!(formatter.format(&berlin(), "x"), "Berlin 100% %A2 %Q");
    }
}
