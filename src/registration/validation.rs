use serde::{Deserialize, Serialize};

use crate::auth::password::Password;

pub const MIN_PASSWORD_LENGTH: usize = 6;

// RFC 5321 path limits
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_LOCAL_PART_LENGTH: usize = 64;
const MAX_DOMAIN_LABEL_LENGTH: usize = 63;

/// Sign-up body as it arrives on the wire. Missing or `null` fields are
/// kept as `None` so they are reported by validation rather than by the
/// JSON decoder.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A candidate that passed every rule.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Password,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
        }
    }

    fn echoes_value(self) -> bool {
        !matches!(self, Field::Password)
    }
}

/// One entry of the `errors` array returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldError {
    /// An error that is not tied to a particular body field.
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
            location: None,
            value: None,
        }
    }

    fn for_field(field: Field, msg: &str, submitted: Option<&str>) -> Self {
        Self {
            msg: msg.to_string(),
            param: Some(field.as_str().to_string()),
            location: Some("body".to_string()),
            value: submitted
                .filter(|_| field.echoes_value())
                .map(str::to_string),
        }
    }
}

struct Rule {
    field: Field,
    check: fn(&str) -> bool,
    message: &'static str,
}

const RULES: [Rule; 3] = [
    Rule {
        field: Field::Name,
        check: is_present,
        message: "Name is required",
    },
    Rule {
        field: Field::Email,
        check: is_email,
        message: "Need email",
    },
    Rule {
        field: Field::Password,
        check: has_min_password_length,
        message: "Please enter a password with 6 or more characters",
    },
];

impl RegistrationCandidate {
    fn submitted(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Password => self.password.as_deref(),
        }
    }
}

/// Runs every rule in order and reports all failures together.
pub fn validate(candidate: RegistrationCandidate) -> Result<RegistrationRequest, Vec<FieldError>> {
    let errors: Vec<FieldError> = RULES
        .iter()
        .filter_map(|rule| {
            let submitted = candidate.submitted(rule.field);
            let passes = (rule.check)(submitted.unwrap_or_default());
            (!passes).then(|| FieldError::for_field(rule.field, rule.message, submitted))
        })
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RegistrationRequest {
        name: candidate.name.unwrap_or_default(),
        email: candidate.email.unwrap_or_default(),
        password: Password::new(candidate.password.unwrap_or_default()),
    })
}

fn is_present(value: &str) -> bool {
    !value.is_empty()
}

fn has_min_password_length(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_LENGTH
}

fn is_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LENGTH || value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    is_local_part(local) && is_domain(domain)
}

fn is_local_part(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= MAX_LOCAL_PART_LENGTH
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && !local.contains(['(', ')', '<', '>', ',', ';', ':', '\\', '"', '[', ']'])
}

fn is_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_DOMAIN_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });

    // Top-level domain: at least two letters, nothing else.
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic));

    labels_ok && tld_ok
}
