//! Structural checks on inbound requests, run before any collaborator is touched.

use regex::Regex;
use thiserror::Error;

use super::domain::{IsAdminInput, LoginInput, RegisterInput};

/// HTML living-standard address shape: local part, `@`, dot-separated DNS labels.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";

/// Field violations in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Non-empty string or non-zero integer.
    Required,
    Email,
    /// Integer strictly greater than zero.
    Positive,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Int(i64),
}

#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
    pub rules: &'static [Rule],
}

/// Inputs describe their fields and rules; [`Validator`] evaluates them.
pub trait Validate {
    fn fields(&self) -> Vec<Field<'_>>;
}

impl Validate for LoginInput {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field { name: "email", value: FieldValue::Text(&self.email), rules: &[Rule::Required, Rule::Email] },
            Field { name: "password", value: FieldValue::Text(&self.password), rules: &[Rule::Required] },
            Field { name: "app_id", value: FieldValue::Int(i64::from(self.app_id)), rules: &[Rule::Required, Rule::Positive] },
        ]
    }
}

impl Validate for RegisterInput {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field { name: "email", value: FieldValue::Text(&self.email), rules: &[Rule::Required, Rule::Email] },
            Field { name: "password", value: FieldValue::Text(&self.password), rules: &[Rule::Required] },
        ]
    }
}

impl Validate for IsAdminInput {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field { name: "user_id", value: FieldValue::Int(self.user_id), rules: &[Rule::Required, Rule::Positive] }]
    }
}

/// Immutable rule evaluator. Build once and share it between requests.
#[derive(Debug, Clone)]
pub struct Validator {
    email: Regex,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self { email: Regex::new(EMAIL_PATTERN).expect("email pattern compiles") }
    }

    /// Evaluate every field; a field reports only its first failing rule.
    pub fn validate<T: Validate + ?Sized>(&self, input: &T) -> Result<(), ValidationErrors> {
        let errors: Vec<String> = input
            .fields()
            .iter()
            .filter_map(|field| {
                field
                    .rules
                    .iter()
                    .find(|rule| !self.check(**rule, field.value))
                    .map(|rule| message(field.name, *rule))
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    fn check(&self, rule: Rule, value: FieldValue<'_>) -> bool {
        match (rule, value) {
            (Rule::Required, FieldValue::Text(s)) => !s.is_empty(),
            (Rule::Required, FieldValue::Int(n)) => n != 0,
            (Rule::Email, FieldValue::Text(s)) => self.email.is_match(s),
            (Rule::Positive, FieldValue::Int(n)) => n > 0,
            (Rule::Email, FieldValue::Int(_)) | (Rule::Positive, FieldValue::Text(_)) => false,
        }
    }
}

fn message(field: &str, rule: Rule) -> String {
    match rule {
        Rule::Required => format!("{field} is required"),
        Rule::Email => format!("{field} must be a valid email"),
        Rule::Positive => format!("{field} must be greater than 0"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str, app_id: i32) -> LoginInput {
        LoginInput { email: email.into(), password: password.into(), app_id }
    }

    #[test]
    fn valid_login_passes() {
        assert_eq!(Validator::new().validate(&login("alice@example.com", "secret123", 1)), Ok(()));
    }

    #[test]
    fn empty_login_reports_every_field_in_order() {
        let errs = Validator::new().validate(&login("", "", 0)).unwrap_err();
        assert_eq!(errs.0, vec!["email is required", "password is required", "app_id is required"]);
    }

    #[test]
    fn first_failing_rule_wins_per_field() {
        let errs = Validator::new().validate(&login("not-an-email", "pw", -3)).unwrap_err();
        assert_eq!(errs.0, vec!["email must be a valid email", "app_id must be greater than 0"]);
        assert_eq!(errs.to_string(), "email must be a valid email; app_id must be greater than 0");
    }

    #[test]
    fn email_shapes() {
        let v = Validator::new();
        for ok in ["a@b.co", "first.last+tag@sub.example.org", "x@localhost"] {
            assert!(v.validate(&RegisterInput { email: ok.into(), password: "p".into() }).is_ok(), "{ok}");
        }
        for bad in ["plain", "@example.com", "a@", "a b@example.com", "a@-bad.com", "a@b..com"] {
            assert!(v.validate(&RegisterInput { email: bad.into(), password: "p".into() }).is_err(), "{bad}");
        }
    }

    #[test]
    fn whitespace_password_counts_as_present() {
        let v = Validator::new();
        assert!(v.validate(&RegisterInput { email: "a@b.co".into(), password: " ".into() }).is_ok());
    }

    #[test]
    fn is_admin_requires_positive_user_id() {
        let v = Validator::new();
        assert!(v.validate(&IsAdminInput { user_id: 42 }).is_ok());
        assert_eq!(v.validate(&IsAdminInput { user_id: 0 }).unwrap_err().0, vec!["user_id is required"]);
        assert_eq!(v.validate(&IsAdminInput { user_id: -1 }).unwrap_err().0, vec!["user_id must be greater than 0"]);
    }
}
