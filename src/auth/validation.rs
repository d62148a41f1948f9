//! Payload validation for signup and login.
//!
//! Each field owns an ordered table of `(rule, message)` pairs. Every rule is
//! evaluated and every violation is reported, in field order then rule order.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::auth::dto::{LoginRequest, SignupRequest};

/// A single violated rule, reported back to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Signup payload after trimming and email normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    pub email: String,
    pub password: String,
}

type Rule = (fn(&str) -> bool, &'static str);

const NAME_RULES: &[Rule] = &[
    (has_min_two_chars, "Name must be at least 2 characters long"),
    (is_letters_and_spaces, "Name must contain only letters and spaces"),
];

const INVALID_EMAIL: &str = "Please provide a valid email";

const EMAIL_RULES: &[Rule] = &[(is_valid_email, INVALID_EMAIL)];

const SIGNUP_PASSWORD_RULES: &[Rule] = &[
    (has_min_six_chars, "Password must be at least 6 characters long"),
    (
        is_mixed_password,
        "Password must contain at least one uppercase letter, one lowercase letter, and one number",
    ),
];

const LOGIN_PASSWORD_RULES: &[Rule] = &[(is_present, "Password is required")];

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap();
    static ref LOCAL_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*$").unwrap();
    static ref LABEL_RE: Regex = Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?$").unwrap();
    static ref NAME_RE: Regex = Regex::new(r"^[a-zA-Z\s]+$").unwrap();
}

fn check(field: &'static str, value: &str, rules: &[Rule], errors: &mut Vec<FieldError>) {
    for (rule, message) in rules {
        if !rule(value) {
            errors.push(FieldError { field, message });
        }
    }
}

pub fn validate_signup(payload: &SignupRequest) -> Result<Signup, Vec<FieldError>> {
    let name = payload.name.trim();
    let email = payload.email.trim();

    let mut errors = Vec::new();
    check("name", name, NAME_RULES, &mut errors);
    check("email", email, EMAIL_RULES, &mut errors);
    check("password", &payload.password, SIGNUP_PASSWORD_RULES, &mut errors);

    let email = normalized_or_error(email, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(Signup {
        name: name.to_string(),
        email,
        password: payload.password.clone(),
    })
}

pub fn validate_login(payload: &LoginRequest) -> Result<Login, Vec<FieldError>> {
    let email = payload.email.trim();

    let mut errors = Vec::new();
    check("email", email, EMAIL_RULES, &mut errors);
    check("password", &payload.password, LOGIN_PASSWORD_RULES, &mut errors);
    let email = normalized_or_error(email, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(Login {
        email,
        password: payload.password.clone(),
    })
}

/// Normalizes an address that already passed [`EMAIL_RULES`]. If alias
/// stripping leaves no mailbox, an email error is recorded instead.
fn normalized_or_error(email: &str, errors: &mut Vec<FieldError>) -> String {
    if errors.iter().any(|e| e.field == "email") {
        return String::new();
    }
    let normalized = normalize_email(email);
    if !is_valid_email(&normalized) {
        errors.push(FieldError {
            field: "email",
            message: INVALID_EMAIL,
        });
    }
    normalized
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return false;
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.len() > 64 || !LOCAL_RE.is_match(local) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels.len() >= 2
        && tld_ok
        && labels
            .iter()
            .all(|label| label.len() <= 63 && LABEL_RE.is_match(label))
}

fn has_min_two_chars(value: &str) -> bool {
    value.chars().count() >= 2
}

fn has_min_six_chars(value: &str) -> bool {
    value.chars().count() >= 6
}

fn is_present(value: &str) -> bool {
    !value.is_empty()
}

fn is_letters_and_spaces(name: &str) -> bool {
    NAME_RE.is_match(name)
}

fn is_mixed_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Lowercases the address and strips provider-specific aliases so that
/// equivalent mailboxes compare equal.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim().to_lowercase();
    let Some((local, domain)) = email.rsplit_once('@') else {
        return email;
    };

    match domain {
        "gmail.com" | "googlemail.com" => {
            let local = strip_suffix_after(local, '+').replace('.', "");
            format!("{local}@gmail.com")
        }
        "outlook.com" | "hotmail.com" | "live.com" | "icloud.com" | "me.com" => {
            format!("{}@{domain}", strip_suffix_after(local, '+'))
        }
        "yahoo.com" | "ymail.com" | "rocketmail.com" => {
            format!("{}@{domain}", strip_last_segment(local, '-'))
        }
        _ => email.clone(),
    }
}

fn strip_suffix_after(local: &str, sep: char) -> &str {
    match local.split_once(sep) {
        Some((head, _)) if !head.is_empty() => head,
        _ => local,
    }
}

fn strip_last_segment(local: &str, sep: char) -> &str {
    match local.rsplit_once(sep) {
        Some((head, _)) if !head.is_empty() => head,
        _ => local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn valid_signup_is_normalized() {
        let ok = validate_signup(&signup("  Ann Lee ", " Ann.Lee@Test.com ", "Abcde1x")).expect("valid");
        assert_eq!(ok.name, "Ann Lee");
        assert_eq!(ok.email, "ann.lee@test.com");
        assert_eq!(ok.password, "Abcde1x");
    }

    #[test]
    fn short_password_reports_length_and_strength() {
        let errors = validate_signup(&signup("Ann Lee", "ann@test.com", "short")).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "password",
                    message: "Password must be at least 6 characters long",
                },
                FieldError {
                    field: "password",
                    message: "Password must contain at least one uppercase letter, one lowercase letter, and one number",
                },
            ]
        );
    }

    #[test]
    fn all_violations_are_reported_in_field_order() {
        let errors = validate_signup(&signup("1", "nope", "")).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["name", "name", "email", "password", "password"]
        );
    }

    #[test]
    fn missing_fields_fail_validation() {
        let errors = validate_signup(&SignupRequest::default()).unwrap_err();
        assert!(fields(&errors).contains(&"name"));
        assert!(fields(&errors).contains(&"email"));
        assert!(fields(&errors).contains(&"password"));
    }

    #[test]
    fn name_must_be_letters_and_spaces() {
        let errors = validate_signup(&signup("Ann-Lee", "ann@test.com", "Abcde1x")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Name must contain only letters and spaces");
    }

    #[test]
    fn whitespace_only_name_is_too_short() {
        let errors = validate_signup(&signup("   ", "ann@test.com", "Abcde1x")).unwrap_err();
        assert_eq!(fields(&errors), vec!["name", "name"]);
    }

    #[test]
    fn password_without_digit_is_rejected() {
        let errors = validate_signup(&signup("Ann Lee", "ann@test.com", "Abcdefg")).unwrap_err();
        assert_eq!(fields(&errors), vec!["password"]);
    }

    #[test]
    fn login_skips_strength_check() {
        let ok = validate_login(&LoginRequest {
            email: "ANN@test.com".into(),
            password: "x".into(),
        })
        .expect("valid");
        assert_eq!(ok.email, "ann@test.com");
    }

    #[test]
    fn login_requires_password_and_valid_email() {
        let errors = validate_login(&LoginRequest {
            email: "bad".into(),
            password: String::new(),
        })
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "email",
                    message: "Please provide a valid email",
                },
                FieldError {
                    field: "password",
                    message: "Password is required",
                },
            ]
        );
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(is_valid_email("a@example.com"));
        assert!(is_valid_email("name.surname@example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing-domain@"));
        assert!(!is_valid_email("two@@example.com"));
    }

    #[test]
    fn normalize_email_strips_gmail_aliases() {
        assert_eq!(normalize_email("John.Doe+news@GoogleMail.com"), "johndoe@gmail.com");
        assert_eq!(normalize_email("j.d@gmail.com"), "jd@gmail.com");
    }

    #[test]
    fn normalize_email_strips_provider_subaddresses() {
        assert_eq!(normalize_email("Ann+work@Outlook.com"), "ann@outlook.com");
        assert_eq!(normalize_email("ann-shop@yahoo.com"), "ann@yahoo.com");
    }

    #[test]
    fn normalize_email_keeps_other_local_parts() {
        assert_eq!(normalize_email(" Ann.Lee+x@Test.com "), "ann.lee+x@test.com");
    }

    #[test]
    fn valid_email_rejects_bad_dots() {
        assert!(!is_valid_email("...@gmail.com"));
        assert!(!is_valid_email(".a@test.com"));
        assert!(!is_valid_email("a.@test.com"));
        assert!(!is_valid_email("a..b@test.com"));
        assert!(!is_valid_email("a@b..com"));
        assert!(!is_valid_email("a@.b.com"));
        assert!(!is_valid_email("a@b.com."));
        assert!(!is_valid_email("a@-b.com"));
        assert!(!is_valid_email("a@localhost"));
    }

    #[test]
    fn dot_only_gmail_addresses_are_rejected() {
        for email in ["...@gmail.com", ".@googlemail.com"] {
            let errors = validate_signup(&signup("Ann Lee", email, "Abcde1x")).unwrap_err();
            assert_eq!(
                errors,
                vec![FieldError {
                    field: "email",
                    message: "Please provide a valid email",
                }],
                "{email}"
            );
        }
    }

    #[test]
    fn plus_only_gmail_mailbox_is_kept() {
        let ok = validate_login(&LoginRequest {
            email: "+tag@gmail.com".into(),
            password: "x".into(),
        })
        .expect("valid");
        assert_eq!(ok.email, "+tag@gmail.com");
    }

    #[test]
    fn normalized_email_is_rechecked() {
        let mut errors = Vec::new();
        assert_eq!(normalized_or_error("Ann@Test.com", &mut errors), "ann@test.com");
        assert!(errors.is_empty());

        normalized_or_error("a@b..com", &mut errors);
        assert_eq!(fields(&errors), vec!["email"]);
    }

    #[test]
    fn invalid_email_is_reported_once() {
        let errors = validate_signup(&signup("Ann Lee", "a@b..com", "Abcde1x")).unwrap_err();
        assert_eq!(fields(&errors), vec!["email"]);
    }

    #[test]
    fn yahoo_strips_only_last_dash_segment() {
        assert_eq!(normalize_email("a-b-c@yahoo.com"), "a-b@yahoo.com");
        assert_ne!(normalize_email("a-b-c@yahoo.com"), normalize_email("a-x@yahoo.com"));
    }
}
