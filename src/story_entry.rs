use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const COURSE_CODES: [&str; 5] = ["1", "2", "3", "4", "graduate"];
pub const DEPARTMENT_CODES: [&str; 3] = ["software", "ai", "security"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryEntry {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub course: String,
    pub department: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub email: String,
}

/// A story as submitted, before the store stamps it with an id and a date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewStory {
    pub name: String,
    pub course: String,
    pub department: String,
    pub title: String,
    pub text: String,
    pub email: String,
}

impl StoryEntry {
    pub fn new(id: i64, created: DateTime<Local>, story: NewStory) -> Self {
        StoryEntry {
            id,
            date: format_date(created),
            name: story.name,
            course: story.course,
            department: story.department,
            title: story.title,
            text: story.text,
            email: story.email,
        }
    }

    pub fn course_label(&self) -> Option<&'static str> {
        course_label(&self.course)
    }

    pub fn department_label(&self) -> Option<&'static str> {
        department_label(&self.department)
    }

    pub fn department_color(&self) -> Option<&'static str> {
        department_color(&self.department)
    }
}

/// Dates are shown the way the site always showed them: `dd.mm.yyyy`.
pub fn format_date(at: DateTime<Local>) -> String {
    at.format("%d.%m.%Y").to_string()
}

pub fn course_label(code: &str) -> Option<&'static str> {
    match code {
        "1" => Some("1 курс"),
        "2" => Some("2 курс"),
        "3" => Some("3 курс"),
        "4" => Some("4 курс"),
        "graduate" => Some("Выпускник"),
        _ => None,
    }
}

pub fn department_label(code: &str) -> Option<&'static str> {
    match code {
        "software" => Some("Программная инженерия"),
        "ai" => Some("Искусственный интеллект"),
        "security" => Some("Кибербезопасность"),
        _ => None,
    }
}

pub fn department_color(code: &str) -> Option<&'static str> {
    match code {
        "software" => Some("#27ae60"),
        "ai" => Some("#8e44ad"),
        "security" => Some("#d35400"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn every_known_code_has_a_label() {
        for code in COURSE_CODES {
            assert!(course_label(code).is_some(), "course {code}");
        }
        for code in DEPARTMENT_CODES {
            assert!(department_label(code).is_some(), "department {code}");
            assert!(department_color(code).is_some(), "department {code}");
        }
    }

    #[test]
    fn unknown_codes_have_no_label() {
        assert_eq!(course_label("5"), None);
        assert_eq!(course_label(""), None);
        assert_eq!(department_label("biology"), None);
        assert_eq!(department_color("biology"), None);
    }

    #[test]
    fn new_entry_formats_creation_date() {
        let created = Local.with_ymd_and_hms(2024, 3, 7, 12, 30, 0).unwrap();
        let entry = StoryEntry::new(
            42,
            created,
            NewStory {
                name: "Анна".into(),
                course: "2".into(),
                department: "ai".into(),
                title: "Первый семестр".into(),
                text: "Было интересно".into(),
                email: String::new(),
            },
        );
        assert_eq!(entry.id, 42);
        assert_eq!(entry.date, "07.03.2024");
        assert_eq!(entry.course_label(), Some("2 курс"));
        assert_eq!(entry.department_color(), Some("#8e44ad"));
    }

    #[test]
    fn stored_entry_without_email_deserializes() {
        let raw = r#"{"id":1,"date":"01.09.2023","name":"a","course":"1",
            "department":"software","title":"t","text":"x"}"#;
        let entry: StoryEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.email, "");
    }
}
