use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub join_date: NaiveDate,
    pub experience: i32,
    pub skills: String,
    pub achievement: String,
    pub profile_image: Option<String>,
}

/// A validated employee write, ready for the upsert statement.
#[derive(Debug, Clone, Validate)]
pub struct NewEmployee {
    pub id: String,
    #[validate(length(max = 50, message = "Name must be at most 50 characters"))]
    pub name: String,
    #[validate(length(max = 40, message = "Role must be at most 40 characters"))]
    pub role: String,
    #[validate(length(max = 10, message = "Gender must be at most 10 characters"))]
    pub gender: String,
    pub dob: NaiveDate,
    #[validate(length(max = 40, message = "Location must be at most 40 characters"))]
    pub location: String,
    #[validate(length(max = 50, message = "Email must be at most 50 characters"))]
    pub email: String,
    pub phone: String,
    pub join_date: NaiveDate,
    pub experience: i32,
    pub skills: String,
    pub achievement: String,
}

/// Text fields of the add-employee form, as received. Filled from multipart
/// parts, or deserialized from a JSON or urlencoded body.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    #[serde(deserialize_with = "text_value")]
    pub id: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub name: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub role: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub dob: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub location: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub email: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub phone: Option<String>,
    #[serde(rename = "joinDate", deserialize_with = "text_value")]
    pub join_date: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub experience: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub skills: Option<String>,
    #[serde(deserialize_with = "text_value")]
    pub achievement: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// JSON clients may send numbers (`"experience": 5`); keep everything as text
/// so validation treats every encoding the same.
fn text_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<TextValue>::deserialize(deserializer)?.map(|value| match value {
        TextValue::Text(text) => text,
        TextValue::Integer(n) => n.to_string(),
        TextValue::Float(n) => n.to_string(),
    }))
}

impl EmployeeForm {
    /// Stores a form field by its wire name. Returns false for unknown fields.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "id" => &mut self.id,
            "name" => &mut self.name,
            "role" => &mut self.role,
            "gender" => &mut self.gender,
            "dob" => &mut self.dob,
            "location" => &mut self.location,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "joinDate" => &mut self.join_date,
            "experience" => &mut self.experience,
            "skills" => &mut self.skills,
            "achievement" => &mut self.achievement,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_numbers_become_text() {
        let form: EmployeeForm = serde_json::from_str(
            r#"{"id":"ABC1234","joinDate":"2020-01-01","experience":5,"phone":null,"extra":true}"#,
        )
        .unwrap();
        assert_eq!(form.id.as_deref(), Some("ABC1234"));
        assert_eq!(form.join_date.as_deref(), Some("2020-01-01"));
        assert_eq!(form.experience.as_deref(), Some("5"));
        assert_eq!(form.phone, None);
        assert_eq!(form.name, None);
    }
}
