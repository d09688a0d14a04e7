/// Onboarding form: collects a new profile and validates required fields
///
/// Only emptiness is checked. The age input accepts digits only (the numeric
/// widget), but the 13-19 range and the photo URL are left to the moderator.

use thiserror::Error;

use crate::core::models::{Gender, ModerationStatus, Profile};
use crate::utils::constants::MAX_AGE_DIGITS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Age,
    City,
    Gender,
    Photo,
    Bio,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::Name,
            FormField::Age,
            FormField::City,
            FormField::Gender,
            FormField::Photo,
            FormField::Bio,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name *",
            FormField::Age => "Age *",
            FormField::City => "City *",
            FormField::Gender => "Gender *",
            FormField::Photo => "Photo (URL) *",
            FormField::Bio => "About me",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Name => "What's your name?",
            FormField::Age => "13-19 years",
            FormField::City => "Moscow",
            FormField::Gender => "",
            FormField::Photo => "https://example.com/photo.jpg",
            FormField::Bio => "Tell a little about yourself",
        }
    }

    pub fn next(self) -> Self {
        let all = Self::all();
        let pos = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let pos = all.iter().position(|f| *f == self).unwrap_or(0);
        all[(pos + all.len() - 1) % all.len()]
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Fill in all required fields (missing: {})", .fields.join(", "))]
    MissingRequired { fields: Vec<&'static str> },
}

/// Raw form buffers. Kept after submission so editing starts pre-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    name: String,
    age: String,
    city: String,
    gender: Gender,
    photo: String,
    bio: String,
}

impl ProfileForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text value of a field (gender renders its label)
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Age => &self.age,
            FormField::City => &self.city,
            FormField::Gender => self.gender.label(),
            FormField::Photo => &self.photo,
            FormField::Bio => &self.bio,
        }
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn set_gender(&mut self, gender: Gender) {
        self.gender = gender;
    }

    pub fn toggle_gender(&mut self) {
        self.gender = self.gender.toggled();
    }

    /// Type one character into a text field. Age only takes digits.
    pub fn push_char(&mut self, field: FormField, c: char) {
        match field {
            FormField::Name => self.name.push(c),
            FormField::Age => {
                if c.is_ascii_digit() && self.age.len() < MAX_AGE_DIGITS {
                    self.age.push(c);
                }
            }
            FormField::City => self.city.push(c),
            FormField::Gender => {}
            FormField::Photo => self.photo.push(c),
            FormField::Bio => self.bio.push(c),
        }
    }

    pub fn pop_char(&mut self, field: FormField) {
        let buffer = match field {
            FormField::Name => &mut self.name,
            FormField::Age => &mut self.age,
            FormField::City => &mut self.city,
            FormField::Gender => return,
            FormField::Photo => &mut self.photo,
            FormField::Bio => &mut self.bio,
        };
        buffer.pop();
    }

    /// Fill a whole field at once (tests and paste)
    pub fn set_text(&mut self, field: FormField, text: &str) {
        match field {
            FormField::Age => {
                self.age.clear();
                for c in text.chars() {
                    self.push_char(FormField::Age, c);
                }
            }
            FormField::Gender => {}
            _ => {
                let buffer = match field {
                    FormField::Name => &mut self.name,
                    FormField::City => &mut self.city,
                    FormField::Photo => &mut self.photo,
                    _ => &mut self.bio,
                };
                *buffer = text.to_string();
            }
        }
    }

    /// Required fields that are still empty, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.age.is_empty() {
            missing.push("age");
        }
        if self.city.is_empty() {
            missing.push("city");
        }
        if self.photo.is_empty() {
            missing.push("photo");
        }
        missing
    }

    /// Build a pending profile from the form. `id` is the client timestamp in ms.
    pub fn submit(&self, id: i64) -> Result<Profile, FormError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingRequired { fields: missing });
        }

        let age = self.age.parse::<u32>().map_err(|_| FormError::MissingRequired {
            fields: vec!["age"],
        })?;

        Ok(Profile {
            id,
            name: self.name.clone(),
            age,
            city: self.city.clone(),
            gender: self.gender,
            photo: self.photo.clone(),
            status: ModerationStatus::Pending,
            bio: (!self.bio.is_empty()).then(|| self.bio.clone()),
        })
    }
}
