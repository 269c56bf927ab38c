//! Add-story form checks.
//!
//! Validation only computes the outcome; marking inputs red and showing the
//! messages is up to whoever renders the form.

use crate::story_entry::NewStory;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Longest story text the form accepts.
pub const MAX_STORY_CHARS: i64 = 2000;

const COUNTER_WARNING_BELOW: i64 = 100;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Course,
    Department,
    Title,
    Text,
    Email,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Course,
        Field::Department,
        Field::Title,
        Field::Text,
        Field::Email,
    ];

    /// What the user sees under the field when it fails.
    pub fn message(self) -> &'static str {
        match self {
            Field::Name => "Пожалуйста, введите ваше ФИО",
            Field::Course => "Пожалуйста, выберите курс",
            Field::Department => "Пожалуйста, выберите кафедру",
            Field::Title => "Пожалуйста, введите заголовок истории",
            Field::Text => "Пожалуйста, напишите вашу историю",
            Field::Email => "Пожалуйста, введите корректный email",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Course => "course",
            Field::Department => "department",
            Field::Title => "title",
            Field::Text => "text",
            Field::Email => "email",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    RequiredFieldMissing,
    InvalidFormat,
}

/// Raw form values as typed. `course` and `department` are empty until the
/// user picks one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryForm {
    pub name: String,
    pub course: String,
    pub department: String,
    pub title: String,
    pub text: String,
    pub email: String,
}

impl StoryForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Course => &self.course,
            Field::Department => &self.department,
            Field::Title => &self.title,
            Field::Text => &self.text,
            Field::Email => &self.email,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Course => &mut self.course,
            Field::Department => &mut self.department,
            Field::Title => &mut self.title,
            Field::Text => &mut self.text,
            Field::Email => &mut self.email,
        }
    }

    pub fn to_new_story(&self) -> NewStory {
        NewStory {
            name: self.name.trim().to_string(),
            course: self.course.clone(),
            department: self.department.clone(),
            title: self.title.trim().to_string(),
            text: self.text.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(field, err)| (*field, *err))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Checks every field and collects all failures at once.
pub fn validate(form: &StoryForm) -> ValidationReport {
    let mut errors = BTreeMap::new();

    for field in [Field::Name, Field::Title, Field::Text] {
        if form.value(field).trim().is_empty() {
            errors.insert(field, FieldError::RequiredFieldMissing);
        }
    }

    for field in [Field::Course, Field::Department] {
        if form.value(field).is_empty() {
            errors.insert(field, FieldError::RequiredFieldMissing);
        }
    }

    if !form.email.is_empty() && !is_valid_email(&form.email) {
        errors.insert(Field::Email, FieldError::InvalidFormat);
    }

    tracing::debug!(failed = errors.len(), "validated story form");
    ValidationReport { errors }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Warning,
    Error,
}

/// Characters left in the story text budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCounter {
    pub remaining: i64,
}

impl CharCounter {
    pub fn for_text(text: &str) -> Self {
        CharCounter {
            remaining: MAX_STORY_CHARS - text.chars().count() as i64,
        }
    }

    pub fn level(&self) -> CounterLevel {
        if self.remaining < 0 {
            CounterLevel::Error
        } else if self.remaining < COUNTER_WARNING_BELOW {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        }
    }

    pub fn label(&self) -> String {
        format!("Осталось символов: {}", self.remaining)
    }
}
