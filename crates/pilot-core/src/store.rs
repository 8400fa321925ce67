//! Post store - the ordered, in-memory collection of posts.
//!
//! Mutations rebuild the whole collection and swap it in. Operations on an
//! unknown id do nothing.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Post, PostDraft, PostStatus, new_post_id};
use crate::scheduler::WallClock;

/// Result of a status change on an existing post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub previous: PostStatus,
    pub post: Post,
}

impl StatusChange {
    /// Whether this change published the post.
    pub fn published(&self) -> bool {
        self.post.status == PostStatus::Posted
    }
}

/// Post counts for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStats {
    pub drafts: usize,
    pub approved: usize,
    pub posted: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Post>", into = "Vec<Post>")]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Latest `scheduled_for` among approved posts.
    pub fn latest_approved(&self) -> Option<DateTime<Utc>> {
        self.posts
            .iter()
            .filter(|p| p.status == PostStatus::Approved)
            .map(|p| p.scheduled_for)
            .max()
    }

    /// Turn approved drafts into posts, schedule them and prepend them.
    ///
    /// Returns the created posts in batch order.
    pub fn add_batch(
        &mut self,
        drafts: Vec<PostDraft>,
        now: DateTime<Utc>,
        clock: &WallClock,
    ) -> Vec<Post> {
        let anchor = self.latest_approved().unwrap_or(now);
        let slots = clock.schedule(anchor, drafts.len());

        let mut taken: HashSet<String> = self.posts.iter().map(|p| p.id.clone()).collect();
        let created: Vec<Post> = drafts
            .into_iter()
            .zip(slots)
            .map(|(draft, scheduled_for)| {
                let mut post = Post::from_draft(draft, now, scheduled_for);
                while taken.contains(&post.id) {
                    post.id = new_post_id();
                }
                taken.insert(post.id.clone());
                post
            })
            .collect();

        let existing = std::mem::take(&mut self.posts);
        self.posts = created.iter().cloned().chain(existing).collect();
        created
    }

    /// Set the status of a post. Any transition is allowed.
    pub fn set_status(&mut self, id: &str, status: PostStatus) -> Option<StatusChange> {
        let mut change = None;
        self.posts = std::mem::take(&mut self.posts)
            .into_iter()
            .map(|mut post| {
                if post.id == id {
                    let previous = post.status;
                    post.status = status;
                    change = Some(StatusChange {
                        previous,
                        post: post.clone(),
                    });
                }
                post
            })
            .collect();
        change
    }

    /// Override a post's publication time. Collisions are not checked.
    pub fn set_schedule(&mut self, id: &str, scheduled_for: DateTime<Utc>) -> bool {
        match self.posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.scheduled_for = scheduled_for;
                true
            }
            None => false,
        }
    }

    /// Delete a post permanently.
    pub fn remove(&mut self, id: &str) -> Option<Post> {
        let index = self.posts.iter().position(|p| p.id == id)?;
        Some(self.posts.remove(index))
    }

    /// Posts in the queue (draft or approved), in stored order.
    pub fn queue(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.status.is_queued()).collect()
    }

    pub fn queue_len(&self) -> usize {
        self.posts.iter().filter(|p| p.status.is_queued()).count()
    }

    /// Replace the queue order. The remaining posts follow the queue in their
    /// existing relative order.
    ///
    /// `order` must be a permutation of the current queue ids; anything else
    /// leaves the store untouched and returns `false`.
    pub fn reorder_queue(&mut self, order: &[String]) -> bool {
        let mut expected: HashMap<&str, usize> = HashMap::new();
        for post in self.posts.iter().filter(|p| p.status.is_queued()) {
            *expected.entry(post.id.as_str()).or_default() += 1;
        }
        let mut supplied: HashMap<&str, usize> = HashMap::new();
        for id in order {
            *supplied.entry(id.as_str()).or_default() += 1;
        }
        if expected != supplied {
            return false;
        }

        let (queued, rest): (Vec<Post>, Vec<Post>) = std::mem::take(&mut self.posts)
            .into_iter()
            .partition(|p| p.status.is_queued());
        let mut by_id: HashMap<String, Post> =
            queued.into_iter().map(|p| (p.id.clone(), p)).collect();

        self.posts = order
            .iter()
            .filter_map(|id| by_id.remove(id))
            .chain(rest)
            .collect();
        true
    }

    pub fn stats(&self) -> PostStats {
        self.posts.iter().fold(PostStats::default(), |mut stats, post| {
            match post.status {
                PostStatus::Draft => stats.drafts += 1,
                PostStatus::Approved => stats.approved += 1,
                PostStatus::Posted => stats.posted += 1,
                PostStatus::Rejected => {}
            }
            stats
        })
    }

    /// Approved posts, soonest first.
    pub fn upcoming(&self, limit: usize) -> Vec<&Post> {
        let mut approved: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::Approved)
            .collect();
        approved.sort_by_key(|p| p.scheduled_for);
        approved.truncate(limit);
        approved
    }

    /// Published posts, newest first.
    pub fn history(&self) -> Vec<&Post> {
        let mut posted: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::Posted)
            .collect();
        posted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posted
    }
}

impl From<Vec<Post>> for PostStore {
    /// Builds a store from saved posts, dropping later duplicates of an id.
    fn from(posts: Vec<Post>) -> Self {
        let mut seen = HashSet::new();
        let posts = posts
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        Self { posts }
    }
}

impl From<PostStore> for Vec<Post> {
    fn from(store: PostStore) -> Self {
        store.posts
    }
}
