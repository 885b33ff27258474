//! In-memory storage backend for tests and ephemeral runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::{Booking, IdeaAnalysis, Mentor, User};
use crate::storage::{
    error::{StorageError, StorageResult},
    traits::*,
    types::*,
};

/// In-memory storage backend
#[derive(Default)]
pub struct MemoryBackend {
    mentors: Arc<RwLock<HashMap<String, Mentor>>>,
    bookings: Arc<RwLock<HashMap<String, Booking>>>,
    users: Arc<RwLock<HashMap<String, User>>>,
    ideas: Arc<RwLock<HashMap<String, IdeaAnalysis>>>,
    /// Highest mentor number issued; only advanced under the mentors write lock
    last_mentor_number: Arc<AtomicU64>,
}

impl MemoryBackend {
    /// Create a new, empty memory backend
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UnifiedStorage for MemoryBackend {
    fn mentors(&self) -> &dyn MentorStore {
        self
    }

    fn bookings(&self) -> &dyn BookingStore {
        self
    }

    fn users(&self) -> &dyn UserStore {
        self
    }

    fn ideas(&self) -> &dyn IdeaStore {
        self
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        Ok(HealthStatus {
            healthy: true,
            backend_type: "memory".to_string(),
            latency_ms: 0,
            errors: vec![],
        })
    }
}

fn email_taken_by_other(mentors: &HashMap<String, Mentor>, mentor: &Mentor) -> bool {
    mentors
        .values()
        .any(|m| m.id != mentor.id && m.email.eq_ignore_ascii_case(&mentor.email))
}

fn number_taken_by_other(mentors: &HashMap<String, Mentor>, mentor: &Mentor) -> bool {
    mentors
        .values()
        .any(|m| m.id != mentor.id && m.mentor_number == mentor.mentor_number)
}

#[async_trait]
impl MentorStore for MemoryBackend {
    async fn insert(&self, mut mentor: Mentor) -> StorageResult<Mentor> {
        let mut mentors = self.mentors.write().await;
        if mentors.contains_key(&mentor.id) {
            return Err(StorageError::duplicate("Mentor", "id", mentor.id));
        }
        if email_taken_by_other(&mentors, &mentor) {
            return Err(StorageError::duplicate("Mentor", "email", mentor.email));
        }
        mentor.mentor_number = self.last_mentor_number.fetch_add(1, Ordering::SeqCst) + 1;
        mentors.insert(mentor.id.clone(), mentor.clone());
        Ok(mentor)
    }

    async fn save(&self, mentor: &Mentor) -> StorageResult<()> {
        let mut mentors = self.mentors.write().await;
        if !mentors.contains_key(&mentor.id) {
            return Err(StorageError::missing("Mentor", mentor.id.clone()));
        }
        if email_taken_by_other(&mentors, mentor) {
            return Err(StorageError::duplicate("Mentor", "email", mentor.email.clone()));
        }
        if number_taken_by_other(&mentors, mentor) {
            return Err(StorageError::duplicate(
                "Mentor",
                "mentorNumber",
                mentor.mentor_number.to_string(),
            ));
        }
        mentors.insert(mentor.id.clone(), mentor.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Mentor>> {
        Ok(self.mentors.read().await.get(id).cloned())
    }

    async fn get_by_number(&self, number: u64) -> StorageResult<Option<Mentor>> {
        Ok(self
            .mentors
            .read()
            .await
            .values()
            .find(|m| m.mentor_number == number)
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> StorageResult<Option<Mentor>> {
        Ok(self
            .mentors
            .read()
            .await
            .values()
            .find(|m| m.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn list(&self, filter: MentorFilter) -> StorageResult<Vec<Mentor>> {
        let mentors = self.mentors.read().await;
        let matching: Vec<Mentor> = mentors
            .values()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        Ok(page(matching, |m| m.created_at, filter.skip, filter.limit))
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        Ok(self.mentors.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl BookingStore for MemoryBackend {
    async fn save(&self, booking: &Booking) -> StorageResult<()> {
        self.bookings
            .write()
            .await
            .insert(booking.id.clone(), booking.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn list(&self, filter: BookingFilter) -> StorageResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let matching: Vec<Booking> = bookings
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        Ok(page(matching, |b| b.created_at, filter.skip, filter.limit))
    }
}

#[async_trait]
impl UserStore for MemoryBackend {
    async fn insert(&self, user: &User) -> StorageResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.uid) {
            return Err(StorageError::duplicate("User", "uid", user.uid.clone()));
        }
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StorageError::duplicate("User", "email", user.email.clone()));
        }
        users.insert(user.uid.clone(), user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> StorageResult<()> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.uid) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(StorageError::missing("User", user.uid.clone())),
        }
    }

    async fn get(&self, uid: &str) -> StorageResult<Option<User>> {
        Ok(self.users.read().await.get(uid).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, filter: UserFilter) -> StorageResult<Vec<User>> {
        let users = self.users.read().await;
        let matching: Vec<User> = users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect();
        Ok(page(matching, |u| u.created_at, 0, filter.limit))
    }
}

#[async_trait]
impl IdeaStore for MemoryBackend {
    async fn save(&self, idea: &IdeaAnalysis) -> StorageResult<()> {
        self.ideas
            .write()
            .await
            .insert(idea.id.clone(), idea.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<IdeaAnalysis>> {
        Ok(self.ideas.read().await.get(id).cloned())
    }

    async fn list(&self, filter: IdeaFilter) -> StorageResult<Vec<IdeaAnalysis>> {
        let ideas = self.ideas.read().await;
        let matching: Vec<IdeaAnalysis> = ideas
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        Ok(page(matching, |i| i.created_at, filter.skip, filter.limit))
    }
}
