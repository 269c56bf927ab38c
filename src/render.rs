//! Turning stories into markup and keeping the story container in step with
//! the store.

use crate::escape::escape_html;
use crate::storage::StoragePort;
use crate::story_entry::StoryEntry;
use crate::story_state::{Clock, StoryStore};
use std::time::Duration;

/// Delay between successive saved stories fading in.
pub const SAVED_REVEAL_STEP: Duration = Duration::from_millis(100);
/// Delay between successive static stories fading in on page load.
pub const STATIC_REVEAL_STEP: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Shipped with the page.
    Static,
    /// Loaded from the story store.
    Saved,
}

/// Display fields of one story, with labels already looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryView {
    pub name: String,
    pub title: String,
    pub text: String,
    pub course_label: Option<&'static str>,
    pub department_label: Option<&'static str>,
    pub department_color: Option<&'static str>,
    pub date: String,
    pub email: Option<String>,
}

impl StoryView {
    pub fn from_entry(story: &StoryEntry) -> Self {
        StoryView {
            name: story.name.clone(),
            title: story.title.clone(),
            text: story.text.clone(),
            course_label: story.course_label(),
            department_label: story.department_label(),
            department_color: story.department_color(),
            date: story.date.clone(),
            email: (!story.email.is_empty()).then(|| story.email.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoryElement {
    pub origin: Origin,
    pub course: String,
    pub department: String,
    pub view: StoryView,
    pub markup: String,
    pub visible: bool,
    pub reveal_delay: Duration,
}

impl StoryElement {
    fn build(story: &StoryEntry, origin: Origin, reveal_delay: Duration) -> Self {
        StoryElement {
            origin,
            course: story.course.clone(),
            department: story.department.clone(),
            view: StoryView::from_entry(story),
            markup: article_html(story, origin == Origin::Saved),
            visible: true,
            reveal_delay,
        }
    }

    pub fn is_revealed(&self, since_render: Duration) -> bool {
        since_render >= self.reveal_delay
    }
}

pub fn story_to_html(story: &StoryEntry) -> String {
    article_html(story, true)
}

fn article_html(story: &StoryEntry, saved: bool) -> String {
    let saved_attr = if saved { r#" data-saved="true""# } else { "" };
    let email_line = if story.email.is_empty() {
        String::new()
    } else {
        format!("<small>Email: {}</small>", escape_html(&story.email))
    };

    format!(
        r#"<article class="story-item" data-course="{course}" data-department="{department}"{saved_attr}>
    <div class="story-meta">
        <strong>{name}</strong>
        <span class="story-badge">{course_label}</span>
        <span class="story-badge" style="background: {color};">
            {department_label}
        </span>
    </div>
    <h3>{title}</h3>
    <p>{text}</p>
    <div class="story-meta">
        <small>Опубликовано: {date}</small>
        {email_line}
    </div>
</article>"#,
        course = escape_html(&story.course),
        department = escape_html(&story.department),
        name = escape_html(&story.name),
        course_label = story.course_label().unwrap_or_default(),
        color = story.department_color().unwrap_or_default(),
        department_label = story.department_label().unwrap_or_default(),
        title = escape_html(&story.title),
        text = escape_html(&story.text),
        date = escape_html(&story.date),
    )
}

/// The element that holds every story on the stories page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryContainer {
    elements: Vec<StoryElement>,
}

impl StoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container holding the page's own stories, staggered for reveal.
    pub fn with_static(stories: &[StoryEntry]) -> Self {
        let elements = stories
            .iter()
            .enumerate()
            .map(|(index, story)| {
                StoryElement::build(story, Origin::Static, STATIC_REVEAL_STEP * index as u32)
            })
            .collect();
        StoryContainer { elements }
    }

    pub fn elements(&self) -> &[StoryElement] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [StoryElement] {
        &mut self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn markup(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.markup.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Replaces the saved stories in `container` with the store's current
/// collection, leaving static stories alone. Returns how many were rendered.
pub fn refresh<S: StoragePort, C: Clock>(
    container: &mut StoryContainer,
    store: &StoryStore<S, C>,
) -> usize {
    container.elements.retain(|e| e.origin == Origin::Static);

    let stories = store.load();
    for (index, story) in stories.iter().enumerate() {
        container.elements.push(StoryElement::build(
            story,
            Origin::Saved,
            SAVED_REVEAL_STEP * index as u32,
        ));
    }

    tracing::debug!(saved = stories.len(), total = container.len(), "refreshed stories");
    stories.len()
}
