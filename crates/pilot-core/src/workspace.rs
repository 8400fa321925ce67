//! Workspace - the application state.
//!
//! Owns the post store and settings, writes each aggregate back to the
//! key-value store after it changes, and raises notifications. There is a
//! single writer; callers serialize access.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::{PersonaPatch, Post, PostDraft, PostStatus, Settings};
use crate::error::DomainError;
use crate::generation::GenerationRequest;
use crate::planner::{CampaignSession, GenerationPlan};
use crate::ports::{KeyValueStore, Notifier, StoreError};
use crate::scheduler::WallClock;
use crate::store::{PostStore, StatusChange};

pub const POSTS_KEY: &str = "social_pilot_posts";
pub const SETTINGS_KEY: &str = "social_pilot_settings";
pub const LAST_REMINDED_KEY: &str = "last_remind_time";

/// Queue size below which the user is reminded to generate more posts.
pub const LOW_QUEUE_THRESHOLD: usize = 3;
/// Minimum gap between two low-queue reminders.
pub const REMINDER_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

const PUBLISHED_TITLE: &str = "Post Published!";
const LOW_QUEUE_TITLE: &str = "Queue is Low!";
const LOW_QUEUE_BODY: &str =
    "Your content queue is looking empty. Time to generate more posts?";

/// Source of the current time.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct Workspace {
    posts: PostStore,
    settings: Settings,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    clock: Clock,
    wall_clock: WallClock,
}

impl Workspace {
    /// Load both aggregates using the system clock and local noon.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, DomainError> {
        Self::load_with(store, notifier, Arc::new(Utc::now), WallClock::Local).await
    }

    pub async fn load_with(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        clock: Clock,
        wall_clock: WallClock,
    ) -> Result<Self, DomainError> {
        let posts = match store.get(POSTS_KEY).await? {
            Some(raw) => serde_json::from_str::<PostStore>(&raw)
                .map_err(|e| StoreError::Serialization(format!("posts: {e}")))?,
            None => PostStore::new(),
        };

        let settings = match store.get(SETTINGS_KEY).await? {
            Some(raw) => {
                let saved = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::Serialization(format!("settings: {e}")))?;
                Settings::from_saved(saved)?
            }
            None => Settings::default(),
        };

        info!(
            posts = posts.len(),
            personas = settings.personas.len(),
            "Workspace loaded"
        );

        let workspace = Self {
            posts,
            settings,
            store,
            notifier,
            clock,
            wall_clock,
        };
        workspace.remind_if_queue_low().await;
        Ok(workspace)
    }

    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    // --- Posts -----------------------------------------------------------

    /// Add approved drafts as a new, scheduled batch.
    pub async fn approve_drafts(&mut self, drafts: Vec<PostDraft>) -> Result<Vec<Post>, DomainError> {
        let now = self.now();
        let created = self.posts.add_batch(drafts, now, &self.wall_clock);
        info!(
            count = created.len(),
            first_slot = ?created.first().map(|p| p.scheduled_for),
            "Draft batch approved"
        );
        self.save_posts().await?;
        Ok(created)
    }

    /// Set a post's status. Publishing raises a notification.
    pub async fn set_status(
        &mut self,
        id: &str,
        status: PostStatus,
    ) -> Result<Option<StatusChange>, DomainError> {
        let Some(change) = self.posts.set_status(id, status) else {
            debug!(post_id = %id, "Status change for unknown post ignored");
            return Ok(None);
        };
        debug!(post_id = %id, from = %change.previous, to = %status, "Post status changed");

        if change.published() {
            let body = format!(
                "Your post about \"{}\" is now live on Facebook.",
                change.post.topic
            );
            self.notify(PUBLISHED_TITLE, &body).await;
        }

        self.save_posts().await?;
        Ok(Some(change))
    }

    pub async fn set_schedule(
        &mut self,
        id: &str,
        scheduled_for: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        if !self.posts.set_schedule(id, scheduled_for) {
            return Ok(false);
        }
        debug!(post_id = %id, %scheduled_for, "Post rescheduled");
        self.save_posts().await?;
        Ok(true)
    }

    pub async fn remove_post(&mut self, id: &str) -> Result<Option<Post>, DomainError> {
        let Some(removed) = self.posts.remove(id) else {
            return Ok(None);
        };
        debug!(post_id = %id, "Post deleted");
        self.save_posts().await?;
        Ok(Some(removed))
    }

    /// Reorder the queue. Returns `false` if `order` is not a permutation of
    /// the queued ids.
    pub async fn reorder_queue(&mut self, order: &[String]) -> Result<bool, DomainError> {
        if !self.posts.reorder_queue(order) {
            warn!(supplied = order.len(), queued = self.posts.queue_len(), "Queue reorder rejected");
            return Ok(false);
        }
        self.save_posts().await?;
        Ok(true)
    }

    // --- Settings and personas ------------------------------------------

    pub async fn replace_settings(&mut self, settings: Settings) -> Result<(), DomainError> {
        settings.validate()?;
        self.settings = settings;
        self.save_settings().await
    }

    /// Add a placeholder persona and return its id.
    pub async fn add_persona(&mut self) -> Result<String, DomainError> {
        let mut next = self.settings.clone();
        let id = next.personas.add();
        self.commit_settings(next).await?;
        Ok(id)
    }

    pub async fn update_persona(&mut self, id: &str, patch: PersonaPatch) -> Result<bool, DomainError> {
        let mut next = self.settings.clone();
        if !next.personas.update(id, patch) {
            return Ok(false);
        }
        self.commit_settings(next).await?;
        Ok(true)
    }

    /// Remove a persona. The last remaining persona is never removed.
    pub async fn remove_persona(&mut self, id: &str) -> Result<bool, DomainError> {
        let mut next = self.settings.clone();
        if !next.personas.remove(id) {
            debug!(persona_id = %id, remaining = next.personas.len(), "Persona removal refused");
            return Ok(false);
        }
        self.commit_settings(next).await?;
        Ok(true)
    }

    pub async fn add_pillar(&mut self, name: &str, description: &str) -> Result<(), DomainError> {
        let mut next = self.settings.clone();
        next.add_pillar(name, description)?;
        self.commit_settings(next).await
    }

    pub async fn remove_pillar(&mut self, name: &str) -> Result<bool, DomainError> {
        let mut next = self.settings.clone();
        if !next.remove_pillar(name) {
            return Ok(false);
        }
        self.commit_settings(next).await?;
        Ok(true)
    }

    pub async fn add_topic(&mut self, topic: &str) -> Result<bool, DomainError> {
        let mut next = self.settings.clone();
        if !next.add_topic(topic) {
            return Ok(false);
        }
        self.commit_settings(next).await?;
        Ok(true)
    }

    pub async fn remove_topic(&mut self, topic: &str) -> Result<bool, DomainError> {
        let mut next = self.settings.clone();
        if !next.remove_topic(topic) {
            return Ok(false);
        }
        self.commit_settings(next).await?;
        Ok(true)
    }

    // --- Generation ------------------------------------------------------

    /// Assemble the generation call for a session without sending it.
    pub fn generation_request(
        &self,
        session: &CampaignSession,
        selected_pillars: &[String],
    ) -> GenerationRequest {
        let plan = GenerationPlan::new(
            session,
            selected_pillars,
            &self.settings.content_pillars,
            &self.settings.personas,
        );
        GenerationRequest::new(&self.settings, self.posts.posts(), &plan, self.now())
    }

    // --- Persistence and notifications ----------------------------------

    async fn commit_settings(&mut self, next: Settings) -> Result<(), DomainError> {
        self.settings = next;
        self.save_settings().await
    }

    async fn save_settings(&self) -> Result<(), DomainError> {
        let raw = serde_json::to_string(&self.settings)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(SETTINGS_KEY, &raw).await?;
        debug!("Settings saved");
        Ok(())
    }

    async fn save_posts(&self) -> Result<(), DomainError> {
        let raw = serde_json::to_string(&self.posts)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(POSTS_KEY, &raw).await?;
        debug!(posts = self.posts.len(), "Posts saved");
        self.remind_if_queue_low().await;
        Ok(())
    }

    /// Send the low-queue reminder if the queue is short and no reminder was
    /// sent in the last 24 hours. Returns whether a reminder was sent.
    pub async fn remind_if_queue_low(&self) -> bool {
        if self.posts.is_empty() || self.posts.queue_len() >= LOW_QUEUE_THRESHOLD {
            return false;
        }

        let now = self.now().timestamp_millis();
        match self.store.get(LAST_REMINDED_KEY).await {
            Ok(raw) => {
                let last = raw.and_then(|r| r.trim().parse::<i64>().ok());
                if last.is_some_and(|last| now - last <= REMINDER_INTERVAL_MS) {
                    return false;
                }
            }
            Err(e) => {
                warn!(error = %e, "Could not read last reminder time");
                return false;
            }
        }

        self.notify(LOW_QUEUE_TITLE, LOW_QUEUE_BODY).await;
        if let Err(e) = self.store.set(LAST_REMINDED_KEY, &now.to_string()).await {
            warn!(error = %e, "Could not record reminder time");
        }
        true
    }

    async fn notify(&self, title: &str, body: &str) {
        if let Err(e) = self.notifier.notify(title, body).await {
            warn!(error = %e, title = %title, "Notification failed");
        }
    }
}
