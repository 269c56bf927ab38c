//! State behind the add-story page: what has been typed, which fields failed,
//! and where a submission is in its send/confirm cycle.

use crate::storage::StoragePort;
use crate::story_entry::{NewStory, COURSE_CODES, DEPARTMENT_CODES};
use crate::story_state::{Clock, StoryStore};
use crate::validation::{validate, CharCounter, Field, StoryForm, ValidationReport};
use std::time::{Duration, Instant};

/// Pretend network latency between pressing submit and the story being saved.
pub const SEND_DELAY: Duration = Duration::from_millis(1500);
pub const NOTICE_VISIBLE_FOR: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Saved,
    SaveFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::Saved => "Спасибо! Ваша история успешно отправлена.",
            Notice::SaveFailed => "Не удалось сохранить историю. Попробуйте ещё раз.",
        }
    }
}

#[derive(Debug, Clone)]
enum SubmitPhase {
    Idle,
    Sending { story: NewStory, ready_at: Instant },
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub form: StoryForm,
    pub focus: Field,
    report: ValidationReport,
    phase: SubmitPhase,
    notice: Option<(Notice, Instant)>,
}

impl Default for FormState {
    fn default() -> Self {
        FormState {
            form: StoryForm::default(),
            focus: Field::Name,
            report: ValidationReport::default(),
            phase: SubmitPhase::Idle,
            notice: None,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// While a submission is in flight the submit action does nothing.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, SubmitPhase::Sending { .. })
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            "Отправка..."
        } else {
            "Отправить историю"
        }
    }

    pub fn counter(&self) -> CharCounter {
        CharCounter::for_text(&self.form.text)
    }

    pub fn error_message(&self, field: Field) -> Option<&'static str> {
        self.report.error(field).map(|_| field.message())
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Validates and, when everything passes, starts the send. Returns whether
    /// a send was started.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.is_busy() {
            tracing::debug!("submit ignored, a story is already being sent");
            return false;
        }

        self.report = validate(&self.form);
        if !self.report.is_valid() {
            tracing::info!(
                failed = ?self.report.errors().map(|(f, _)| f).collect::<Vec<_>>(),
                "story form has errors"
            );
            return false;
        }

        self.phase = SubmitPhase::Sending {
            story: self.form.to_new_story(),
            ready_at: now + SEND_DELAY,
        };
        true
    }

    /// Finishes a pending send once its delay has passed and expires old
    /// notices. Returns the save result when a send finished on this tick.
    pub fn tick<S: StoragePort, C: Clock>(
        &mut self,
        now: Instant,
        store: &mut StoryStore<S, C>,
    ) -> Option<bool> {
        if let Some((_, hide_at)) = self.notice {
            if now >= hide_at {
                self.notice = None;
            }
        }

        let SubmitPhase::Sending { ready_at, .. } = &self.phase else {
            return None;
        };
        if now < *ready_at {
            return None;
        }

        let SubmitPhase::Sending { story, .. } =
            std::mem::replace(&mut self.phase, SubmitPhase::Idle)
        else {
            return None;
        };

        let saved = store.save(story);
        if saved {
            self.reset();
            self.notice = Some((Notice::Saved, now + NOTICE_VISIBLE_FOR));
        } else {
            // Keep what was typed so the user can try again.
            self.notice = Some((Notice::SaveFailed, now + NOTICE_VISIBLE_FOR));
        }
        Some(saved)
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice.map(|(notice, _)| notice)
    }

    /// Clears every field and error.
    pub fn reset(&mut self) {
        self.form = StoryForm::default();
        self.report = ValidationReport::default();
        self.focus = Field::Name;
    }

    pub fn focus_next(&mut self) {
        let i = field_index(self.focus);
        self.focus = Field::ALL[(i + 1) % Field::ALL.len()];
    }

    pub fn focus_prev(&mut self) {
        let i = field_index(self.focus);
        self.focus = Field::ALL[(i + Field::ALL.len() - 1) % Field::ALL.len()];
    }

    /// Moves a select field to its next option; unselected comes before the
    /// first option and after the last.
    pub fn cycle_choice(&mut self, field: Field) {
        let codes: &[&str] = match field {
            Field::Course => &COURSE_CODES,
            Field::Department => &DEPARTMENT_CODES,
            _ => return,
        };
        let value = self.form.value_mut(field);
        let next = match codes.iter().position(|c| *c == value.as_str()) {
            Some(i) if i + 1 < codes.len() => codes[i + 1],
            Some(_) => "",
            None => codes[0],
        };
        *value = next.to_string();
    }

    pub fn is_choice(field: Field) -> bool {
        matches!(field, Field::Course | Field::Department)
    }
}

fn field_index(field: Field) -> usize {
    Field::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn filled() -> FormState {
        let mut state = FormState::new();
        state.form = StoryForm {
            name: " Ольга ".into(),
            course: "4".into(),
            department: "security".into(),
            title: "Диплом".into(),
            text: "Защитилась!".into(),
            email: String::new(),
        };
        state
    }

    #[test]
    fn invalid_form_does_not_start_sending() {
        let mut state = FormState::new();
        assert!(!state.submit(Instant::now()));
        assert!(!state.is_busy());
        assert_eq!(state.error_message(Field::Name), Some(Field::Name.message()));
        assert_eq!(state.error_message(Field::Email), None);
    }

    #[test]
    fn successful_submission_saves_after_delay_and_resets() {
        let mut store = StoryStore::new(MemoryStorage::new());
        let mut state = filled();
        let start = Instant::now();

        assert!(state.submit(start));
        assert!(state.is_busy());
        assert_eq!(state.submit_label(), "Отправка...");
        // A second press while sending is ignored.
        assert!(!state.submit(start));

        assert_eq!(state.tick(start + Duration::from_millis(1499), &mut store), None);
        assert!(store.load().is_empty());

        let done = start + SEND_DELAY;
        assert_eq!(state.tick(done, &mut store), Some(true));
        assert!(!state.is_busy());
        assert_eq!(state.notice(), Some(Notice::Saved));
        assert_eq!(state.form, StoryForm::default());

        let stories = store.load();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].name, "Ольга");

        state.tick(done + NOTICE_VISIBLE_FOR, &mut store);
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn failed_save_keeps_the_form_and_reports_failure() {
        let mut store = StoryStore::new(MemoryStorage::with_quota(16));
        let mut state = filled();
        let start = Instant::now();

        assert!(state.submit(start));
        assert_eq!(state.tick(start + SEND_DELAY, &mut store), Some(false));
        assert_eq!(state.notice(), Some(Notice::SaveFailed));
        assert_eq!(state.form.title, "Диплом");
        assert!(!state.is_busy());
    }

    #[test]
    fn story_is_captured_at_submit_time() {
        let mut store = StoryStore::new(MemoryStorage::new());
        let mut state = filled();
        let start = Instant::now();

        assert!(state.submit(start));
        state.form.title = "changed while sending".into();
        state.tick(start + SEND_DELAY, &mut store);

        assert_eq!(store.load()[0].title, "Диплом");
    }

    #[test]
    fn choices_cycle_through_unselected() {
        let mut state = FormState::new();
        state.cycle_choice(Field::Department);
        assert_eq!(state.form.department, "software");
        state.cycle_choice(Field::Department);
        state.cycle_choice(Field::Department);
        assert_eq!(state.form.department, "security");
        state.cycle_choice(Field::Department);
        assert_eq!(state.form.department, "");

        state.cycle_choice(Field::Name);
        assert_eq!(state.form.name, "");
    }

    #[test]
    fn focus_wraps_around() {
        let mut state = FormState::new();
        state.focus_prev();
        assert_eq!(state.focus, Field::Email);
        state.focus_next();
        assert_eq!(state.focus, Field::Name);
    }
}
