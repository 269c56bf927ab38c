use crate::render::StoryElement;
use crate::story_entry::{COURSE_CODES, DEPARTMENT_CODES};

/// Selector value that matches every story.
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryFilter {
    pub course: String,
    pub department: String,
}

impl Default for StoryFilter {
    fn default() -> Self {
        StoryFilter {
            course: ALL.to_string(),
            department: ALL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    pub visible: usize,
    pub total: usize,
}

impl FilterOutcome {
    /// True when nothing matched and the "no stories" notice should show.
    pub fn is_empty(&self) -> bool {
        self.visible == 0
    }
}

impl StoryFilter {
    pub fn new(course: impl Into<String>, department: impl Into<String>) -> Self {
        StoryFilter {
            course: course.into(),
            department: department.into(),
        }
    }

    pub fn matches(&self, element: &StoryElement) -> bool {
        let course_match = self.course == ALL || element.course == self.course;
        let department_match = self.department == ALL || element.department == self.department;
        course_match && department_match
    }

    pub fn apply(&self, elements: &mut [StoryElement]) -> FilterOutcome {
        let mut visible = 0;
        for element in elements.iter_mut() {
            element.visible = self.matches(element);
            if element.visible {
                visible += 1;
            }
        }
        tracing::debug!(
            course = %self.course,
            department = %self.department,
            visible,
            total = elements.len(),
            "applied story filter"
        );
        FilterOutcome {
            visible,
            total: elements.len(),
        }
    }

    pub fn reset(&mut self) {
        *self = StoryFilter::default();
    }

    pub fn cycle_course(&mut self) {
        self.course = next_option(&self.course, &COURSE_CODES);
    }

    pub fn cycle_department(&mut self) {
        self.department = next_option(&self.department, &DEPARTMENT_CODES);
    }
}

// "all", then each code in order, then back to "all".
fn next_option(current: &str, codes: &[&str]) -> String {
    let next = match codes.iter().position(|c| *c == current) {
        Some(i) if i + 1 < codes.len() => codes[i + 1],
        Some(_) => ALL,
        None if current == ALL => codes.first().copied().unwrap_or(ALL),
        None => ALL,
    };
    next.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::StoryContainer;
    use crate::story_entry::StoryEntry;

    fn container(pairs: &[(&str, &str)]) -> StoryContainer {
        let stories: Vec<StoryEntry> = pairs
            .iter()
            .enumerate()
            .map(|(i, (course, department))| StoryEntry {
                id: i as i64,
                date: "01.09.2024".into(),
                name: format!("student {i}"),
                course: course.to_string(),
                department: department.to_string(),
                title: "t".into(),
                text: "x".into(),
                email: String::new(),
            })
            .collect();
        StoryContainer::with_static(&stories)
    }

    fn visible_courses(container: &StoryContainer) -> Vec<String> {
        container
            .elements()
            .iter()
            .filter(|e| e.visible)
            .map(|e| e.course.clone())
            .collect()
    }

    #[test]
    fn single_course_match() {
        let mut c = container(&[("1", "software"), ("2", "ai"), ("3", "security")]);

        let outcome = StoryFilter::new("2", ALL).apply(c.elements_mut());
        assert_eq!(outcome, FilterOutcome { visible: 1, total: 3 });
        assert!(!outcome.is_empty());
        assert_eq!(visible_courses(&c), ["2"]);

        let outcome = StoryFilter::new("9", ALL).apply(c.elements_mut());
        assert_eq!(outcome.visible, 0);
        assert!(outcome.is_empty());
        assert!(visible_courses(&c).is_empty());
    }

    #[test]
    fn both_selectors_must_match() {
        let mut c = container(&[("1", "ai"), ("1", "software"), ("2", "ai")]);
        let outcome = StoryFilter::new("1", "ai").apply(c.elements_mut());
        assert_eq!(outcome.visible, 1);
        assert!(c.elements()[0].visible);
    }

    #[test]
    fn reset_shows_everything() {
        let mut c = container(&[("1", "ai"), ("2", "security")]);
        let mut filter = StoryFilter::new("graduate", "software");
        assert!(filter.apply(c.elements_mut()).is_empty());

        filter.reset();
        assert_eq!(filter, StoryFilter::default());
        assert_eq!(filter.apply(c.elements_mut()).visible, 2);
    }

    #[test]
    fn cycling_walks_codes_and_wraps() {
        let mut filter = StoryFilter::default();
        let mut seen = Vec::new();
        for _ in 0..6 {
            filter.cycle_course();
            seen.push(filter.course.clone());
        }
        assert_eq!(seen, ["1", "2", "3", "4", "graduate", "all"]);

        filter.department = "unknown".into();
        filter.cycle_department();
        assert_eq!(filter.department, ALL);
        filter.cycle_department();
        assert_eq!(filter.department, "software");
    }
}
