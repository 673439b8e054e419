//! Identifier sanitization and case helpers.
//!
//! Organization and project names end up in three places at once: C#
//! namespaces, folder names, and solution file names. All three accept the
//! same conservative alphabet (letters, digits, `_`, with `.` separating
//! namespace segments), so names are normalized into that alphabet once,
//! before the substitution map is built.

use crate::domain::error::DomainError;

/// Sanitize a user-supplied name into a dotted PascalCase identifier.
///
/// ## Rules
///
/// 1. `.` separates namespace segments; empty segments are dropped
/// 2. Inside a segment, every character that is not a letter, digit or `_`
///    is a word break (whitespace runs collapse into one break)
/// 3. Each word gets its first character upper-cased; the rest is kept
/// 4. A segment starting with a digit is prefixed with `_`
///
/// ## Examples
///
/// | Input | Output |
/// |-------|--------|
/// | "Acme" | "Acme" |
/// | "acme  corp" | "AcmeCorp" |
/// | "contoso.retail-ops" | "Contoso.RetailOps" |
/// | "3d printing" | "_3dPrinting" |
///
/// # Errors
///
/// `InvalidName` if nothing usable is left.
pub fn sanitize_identifier(parameter: &str, raw: &str) -> Result<String, DomainError> {
    let segments: Vec<String> = raw
        .split('.')
        .map(sanitize_segment)
        .filter(|s| !s.is_empty())
        .collect();

    if segments.is_empty() {
        return Err(DomainError::InvalidName {
            parameter: parameter.to_string(),
            value: raw.to_string(),
        });
    }

    Ok(segments.join("."))
}

/// Sanitize a name into a single PascalCase identifier.
///
/// Same rules as [`sanitize_identifier`], except that `.` is just another
/// word break: `billing.api` becomes `BillingApi`. Used for names that end up
/// in class and interface names.
///
/// # Errors
///
/// `InvalidName` if nothing usable is left.
pub fn sanitize_type_name(parameter: &str, raw: &str) -> Result<String, DomainError> {
    let name = sanitize_segment(raw);
    if name.is_empty() {
        return Err(DomainError::InvalidName {
            parameter: parameter.to_string(),
            value: raw.to_string(),
        });
    }
    Ok(name)
}

fn sanitize_segment(segment: &str) -> String {
    let mut out = String::new();

    for word in segment.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }

    out
}

/// Whether `s` is a single identifier segment: starts with a letter or `_`,
/// continues with letters, digits or `_`.
///
/// List entries become folder and class names verbatim, so they are checked
/// rather than sanitized.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Convert a string to kebab-case.
///
/// Word boundaries follow the usual identifier conventions: explicit
/// separators, camelCase transitions, and acronym boundaries
/// (`HTTPServer` → `http-server`). Dots count as separators.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if let Some(&next) = chars.peek() {
            // "myApp" → "my" + "App"
            if c.is_lowercase() && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            // "HTTPServer" → "HTTP" + "Server"
            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_is_unchanged() {
        assert_eq!(sanitize_identifier("orgName", "Acme").unwrap(), "Acme");
        assert_eq!(
            sanitize_identifier("name", "BillingAPI").unwrap(),
            "BillingAPI"
        );
    }

    #[test]
    fn whitespace_collapses_and_words_are_capitalized() {
        assert_eq!(
            sanitize_identifier("orgName", "  acme   corp ").unwrap(),
            "AcmeCorp"
        );
    }

    #[test]
    fn invalid_characters_are_stripped() {
        assert_eq!(
            sanitize_identifier("name", "billing-service!").unwrap(),
            "BillingService"
        );
        assert_eq!(sanitize_identifier("name", "a/b\\c").unwrap(), "ABC");
    }

    #[test]
    fn dots_keep_namespace_segments() {
        assert_eq!(
            sanitize_identifier("orgName", "contoso..retail-ops.").unwrap(),
            "Contoso.RetailOps"
        );
    }

    #[test]
    fn type_names_join_dotted_segments() {
        assert_eq!(sanitize_type_name("name", "Billing.Api").unwrap(), "BillingApi");
        assert_eq!(sanitize_type_name("name", "order.intake-v2").unwrap(), "OrderIntakeV2");
        assert!(is_identifier(&sanitize_type_name("name", "3d.print").unwrap()));
        assert!(sanitize_type_name("name", " . ").is_err());
    }

    #[test]
    fn leading_digit_is_prefixed() {
        assert_eq!(
            sanitize_identifier("name", "3d printing").unwrap(),
            "_3dPrinting"
        );
    }

    #[test]
    fn nothing_left_is_invalid_name() {
        let err = sanitize_identifier("orgName", " -!- ").unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidName {
                parameter: "orgName".into(),
                value: " -!- ".into(),
            }
        );
        assert!(sanitize_identifier("orgName", "").is_err());
    }

    #[test]
    fn sanitizing_is_idempotent() {
        let once = sanitize_identifier("orgName", "acme corp.north-east").unwrap();
        let twice = sanitize_identifier("orgName", &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn identifier_check() {
        assert!(is_identifier("Payments"));
        assert!(is_identifier("_legacy2"));
        assert!(!is_identifier("2fa"));
        assert!(!is_identifier("pay-ments"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("Pay Ments"));
    }

    #[test]
    fn kebab_case() {
        assert_eq!(to_kebab_case("Billing"), "billing");
        assert_eq!(to_kebab_case("Acme.Billing"), "acme-billing");
        assert_eq!(to_kebab_case("HTTPGateway"), "http-gateway");
        assert_eq!(to_kebab_case("orderIntake"), "order-intake");
    }
}
