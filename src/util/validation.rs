use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidationErrors, ValidationErrorsKind};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$").unwrap()
});

const EMAIL_MAX: usize = 254;

pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;

pub const NAME_MAX: usize = 64;

/// Checks whether the given email address is acceptable for a new account.
///
/// Host names in IP address form are rejected along with anything
/// longer than what SMTP allows.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= EMAIL_MAX && EMAIL_REGEX.is_match(email)
}

/// Lowercases and trims an email address so lookups and the unique index
/// agree with each other.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_password(pass: &str) -> bool {
    (PASSWORD_MIN..=PASSWORD_MAX).contains(&pass.chars().count())
}

pub fn is_valid_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name.chars().count() <= NAME_MAX
}

/// Flattens [`ValidationErrors`] into a single human readable line
/// such as `title: Title must be between 5 and 80 characters`.
#[must_use]
pub fn describe(errors: &ValidationErrors) -> String {
    flatten(errors).join("; ")
}

/// Collects every validation failure as `path: message`, sorted by
/// field name so the output is stable.
#[must_use]
pub fn flatten(errors: &ValidationErrors) -> Vec<String> {
    fn walk(prefix: &str, errors: &ValidationErrors, lines: &mut Vec<String>) {
        let mut fields = errors.errors().iter().collect::<Vec<_>>();
        fields.sort_unstable_by_key(|(field, _)| **field);

        for (field, kind) in fields {
            let path = if prefix.is_empty() {
                String::from(*field)
            } else {
                format!("{prefix}.{field}")
            };

            match kind {
                ValidationErrorsKind::Field(errors) => {
                    for error in errors {
                        let line = match &error.message {
                            Some(message) => format!("{path}: {message}"),
                            None => format!("{path}: invalid value ({})", error.code),
                        };
                        lines.push(line);
                    }
                }
                ValidationErrorsKind::Struct(inner) => walk(&path, inner, lines),
                ValidationErrorsKind::List(list) => {
                    for (index, inner) in list {
                        walk(&format!("{path}[{index}]"), inner, lines);
                    }
                }
            }
        }
    }

    let mut lines = Vec::new();
    walk("", errors, &mut lines);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use validator::ValidationError;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("gush@gmail.com"));
        assert!(is_valid_email("first.last+tag@support.example.org"));
        assert!(!is_valid_email("nada_neutho"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email(&format!("{}@example.com", "a".repeat(250))));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_is_valid_password() {
        assert!(is_valid_password("correct horse"));
        assert!(!is_valid_password("short"));
        assert!(!is_valid_password(&"x".repeat(PASSWORD_MAX + 1)));
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("Alice"));
        assert!(!is_valid_name("   "));
        assert!(!is_valid_name(&"n".repeat(NAME_MAX + 1)));
    }

    #[test]
    fn test_describe() {
        let mut errors = ValidationErrors::new();

        let mut title = ValidationError::new("length");
        title.message = Some(Cow::Borrowed("Title must be between 5 and 80 characters"));
        errors.add("title", title);
        errors.add("priority", ValidationError::new("range"));

        assert_eq!(
            describe(&errors),
            "priority: invalid value (range); title: Title must be between 5 and 80 characters"
        );
    }
}
