/// Contact-capture gate in front of the full report.
///
/// A registration only checks the contact details and answers with an
/// "unlocked" flag for the caller to hold on to. Nothing is persisted.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

use crate::models::location::LocationTable;
use crate::models::quote::{FieldError, RegistrationRequest, RegistrationResponse};

static RE_EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").ok());

static RE_PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").ok());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("registration rejected: {}", .fields.iter().map(|f| f.field.as_str()).collect::<Vec<_>>().join(", "))]
pub struct RegistrationError {
    pub fields: Vec<FieldError>,
}

pub fn is_valid_email(email: &str) -> bool {
    RE_EMAIL.as_ref().is_some_and(|re| re.is_match(email.trim()))
}

/// Strips spaces, dashes, dots and parentheses; `None` unless 10 digits remain.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();
    RE_PHONE.as_ref().filter(|re| re.is_match(&digits)).map(|_| digits)
}

pub fn register(
    request: &RegistrationRequest,
    locations: &LocationTable,
) -> Result<RegistrationResponse, RegistrationError> {
    let mut fields = Vec::new();
    let mut reject = |field: &str, message: &str| {
        fields.push(FieldError { field: field.to_string(), message: message.to_string() });
    };

    let name = request.name.trim();
    if name.is_empty() {
        reject("name", "name is required");
    }
    if !is_valid_email(&request.email) {
        reject("email", "email address is not valid");
    }
    let phone = normalize_phone(&request.phone);
    if phone.is_none() {
        reject("phone", "phone number must have 10 digits");
    }
    let location = match request.city.as_deref() {
        None => {
            reject("city", "select a city");
            None
        }
        Some(city) => {
            let found = locations.find(city);
            if found.is_none() {
                reject("city", "unknown city");
            }
            found
        }
    };

    match (phone, location) {
        (Some(phone), Some(location)) if fields.is_empty() => Ok(RegistrationResponse {
            registration_id: Uuid::new_v4(),
            client_name: name.to_string(),
            email: request.email.trim().to_string(),
            phone,
            city: location.name.clone(),
            unlocked: true,
            registered_at: Utc::now(),
        }),
        _ => Err(RegistrationError { fields }),
    }
}
