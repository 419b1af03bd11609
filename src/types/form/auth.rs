use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::PublicUser;
use crate::util::validation::{
    is_valid_email, is_valid_name, is_valid_password, normalize_email, NAME_MAX, PASSWORD_MAX,
    PASSWORD_MIN,
};
use crate::util::Sensitive;

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: Sensitive<String>,
}

impl Validate for RegisterUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        fn error(code: &'static str, message: String) -> ValidationError {
            let mut error = ValidationError::new(code);
            error.message = Some(Cow::Owned(message));
            error
        }

        let mut errors = ValidationErrors::new();
        if !is_valid_name(&self.name) {
            errors.add(
                "name",
                error("length", format!("Name must be between 1 and {NAME_MAX} characters")),
            );
        }

        if !is_valid_email(&normalize_email(&self.email)) {
            errors.add("email", error("email", "Invalid e-mail address".into()));
        }

        // Leading and trailing whitespace is kept as part of the password.
        if !is_valid_password(self.password.as_str()) {
            let message =
                format!("Password must be between {PASSWORD_MIN} and {PASSWORD_MAX} characters");
            errors.add("password", error("length", message));
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginUser {
    pub email: String,
    pub password: Sensitive<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthResponse {
    pub token: Sensitive<String>,
    pub user: PublicUser,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CurrentUser {
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::validation::describe;

    fn form(name: &str, email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            name: name.into(),
            email: email.into(),
            password: Sensitive::new(password.into()),
        }
    }

    #[test]
    fn should_accept_valid_registration() {
        assert!(form("Alice", " Alice@Example.com ", "hunter2hunter2").validate().is_ok());
    }

    #[test]
    fn should_report_every_invalid_field() {
        let errors = form(" ", "not-an-email", "short").validate().unwrap_err();
        assert_eq!(
            describe(&errors),
            "email: Invalid e-mail address; \
             name: Name must be between 1 and 64 characters; \
             password: Password must be between 8 and 128 characters"
        );
    }

    #[test]
    fn should_not_serialize_password_in_debug() {
        let form = form("Alice", "alice@example.com", "hunter2hunter2");
        assert!(!format!("{form:?}").contains("hunter2"));
    }
}
