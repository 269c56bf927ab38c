//! Student stories: saving, rendering and filtering short testimonials kept
//! in a local key-value store, plus a terminal front end for the stories and
//! add-story pages.

pub mod cli;
pub mod error;
pub mod escape;
pub mod featured;
pub mod filter;
pub mod render;
pub mod storage;
pub mod story_entry;
pub mod story_form;
pub mod story_state;
pub mod ui;
pub mod validation;

pub use error::{Result, StoreError};
pub use escape::escape_html;
pub use filter::{FilterOutcome, StoryFilter};
pub use render::{refresh, story_to_html, StoryContainer, StoryElement};
pub use storage::{FileStorage, MemoryStorage, StoragePort};
pub use story_entry::{NewStory, StoryEntry};
pub use story_state::{Clock, StoryStore, SystemClock, STORAGE_KEY};
pub use validation::{validate, Field, FieldError, StoryForm, ValidationReport};
