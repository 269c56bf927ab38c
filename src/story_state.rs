use crate::error::{Result, StoreError};
use crate::storage::StoragePort;
use crate::story_entry::{NewStory, StoryEntry};
use chrono::{DateTime, Local};

/// Every page of the site reads and writes the same key.
pub const STORAGE_KEY: &str = "studentStories";

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// The persisted story collection, newest first.
///
/// Nothing is cached: every call goes back to storage, so two stores over the
/// same backing data always agree.
pub struct StoryStore<S, C = SystemClock> {
    storage: S,
    clock: C,
}

impl<S: StoragePort> StoryStore<S> {
    pub fn new(storage: S) -> Self {
        StoryStore {
            storage,
            clock: SystemClock,
        }
    }
}

impl<S: StoragePort, C: Clock> StoryStore<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        StoryStore { storage, clock }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Saves a story and reports whether it made it to storage. Failures are
    /// logged, never raised.
    pub fn save(&mut self, story: NewStory) -> bool {
        match self.save_story(story) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to save story");
                false
            }
        }
    }

    /// Stamps the story with an id and a date and puts it at the front of the
    /// stored collection.
    ///
    /// Ids are creation timestamps in milliseconds. When the clock has not moved
    /// past the largest stored id, the new id is that id plus one.
    pub fn save_story(&mut self, story: NewStory) -> Result<StoryEntry> {
        let mut stories = self.read_collection()?;

        let now = self.clock.now();
        let mut id = now.timestamp_millis();
        if let Some(max_id) = stories.iter().map(|s| s.id).max() {
            if max_id >= id {
                id = max_id.checked_add(1).ok_or(StoreError::IdExhausted)?;
            }
        }

        let entry = StoryEntry::new(id, now, story);
        stories.insert(0, entry.clone());

        let serialized = serde_json::to_string(&stories)?;
        self.storage.set(STORAGE_KEY, &serialized)?;
        tracing::info!(id = entry.id, total = stories.len(), "story saved");
        Ok(entry)
    }

    /// Returns the stored stories, or nothing when the stored data is missing
    /// or unreadable.
    pub fn load(&self) -> Vec<StoryEntry> {
        match self.read_collection() {
            Ok(stories) => stories,
            Err(e) => {
                tracing::warn!(error = %e, "stored stories are unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn debug_stories(&self) -> Vec<StoryEntry> {
        let stories = self.load();
        tracing::info!(count = stories.len(), "all saved stories: {:?}", stories);
        stories
    }

    fn read_collection(&self) -> Result<Vec<StoryEntry>> {
        let Some(serialized) = self.storage.get(STORAGE_KEY)? else {
            return Ok(Vec::new());
        };
        // A stored `null` counts as nothing saved yet.
        let stories: Option<Vec<StoryEntry>> = serde_json::from_str(&serialized)?;
        Ok(stories.unwrap_or_default())
    }
}
