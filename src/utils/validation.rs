use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

use crate::errors::AppError;
use crate::models::employee::{EmployeeForm, NewEmployee};

static EMPLOYEE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}[0-9]{4}$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(|err| {
        let mut messages = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect::<Vec<_>>();
        // field_errors() is a HashMap; keep the message stable
        messages.sort();
        AppError::Validation(messages.join("; "))
    })
}

pub fn is_valid_employee_id(id: &str) -> bool {
    EMPLOYEE_ID_RE.is_match(id)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn required(value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation("All fields are required".to_string())),
    }
}

fn parse_date(value: &str, label: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("{} must be a valid date (YYYY-MM-DD)", label)))
}

/// Checks an add-employee form and turns it into a write.
///
/// Presence is checked for every field before any format check, and the
/// format checks run in a fixed order, stopping at the first failure.
pub fn validate_employee_form(form: EmployeeForm) -> Result<NewEmployee, AppError> {
    let id = required(form.id)?;
    let name = required(form.name)?;
    let role = required(form.role)?;
    let gender = required(form.gender)?;
    let dob = required(form.dob)?;
    let location = required(form.location)?;
    let email = required(form.email)?;
    let phone = required(form.phone)?;
    let join_date = required(form.join_date)?;
    let experience = required(form.experience)?;
    let skills = required(form.skills)?;
    let achievement = required(form.achievement)?;

    if !is_valid_employee_id(&id) {
        return Err(AppError::Validation("Invalid Employee ID format".to_string()));
    }
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    if !is_valid_phone(&phone) {
        return Err(AppError::Validation("Phone number must be 10 digits".to_string()));
    }

    let experience = experience
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|years| *years >= 0)
        .ok_or_else(|| {
            AppError::Validation("Experience must be a non-negative whole number".to_string())
        })?;
    let dob = parse_date(&dob, "Date of birth")?;
    let join_date = parse_date(&join_date, "Join date")?;

    let employee = NewEmployee {
        id,
        name,
        role,
        gender,
        dob,
        location,
        email,
        phone,
        join_date,
        experience,
        skills,
        achievement,
    };
    validate_payload(&employee)?;
    Ok(employee)
}
