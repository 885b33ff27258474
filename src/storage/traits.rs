//! Core trait definitions for the storage abstraction layer

use async_trait::async_trait;

use super::error::StorageResult;
use super::types::*;
use crate::models::{Booking, IdeaAnalysis, Mentor, User};

/// Unified storage interface providing access to every collection
#[async_trait]
pub trait UnifiedStorage: Send + Sync {
    /// Get the mentor collection
    fn mentors(&self) -> &dyn MentorStore;

    /// Get the booking collection
    fn bookings(&self) -> &dyn BookingStore;

    /// Get the user collection
    fn users(&self) -> &dyn UserStore;

    /// Get the idea analysis collection
    fn ideas(&self) -> &dyn IdeaStore;

    /// Check the health of the storage backend
    async fn health_check(&self) -> StorageResult<HealthStatus>;
}

/// Mentor collection. Email is unique, compared case-insensitively.
#[async_trait]
pub trait MentorStore: Send + Sync {
    /// Insert a new mentor and assign it the next mentor number.
    /// Numbers only ever increase, so a deleted mentor's number is never
    /// reissued. Fails with `Duplicate` on a taken id or email.
    async fn insert(&self, mentor: Mentor) -> StorageResult<Mentor>;

    /// Overwrite an existing mentor, failing with `Missing` if absent and
    /// `Duplicate` if the email or mentor number belongs to another mentor
    async fn save(&self, mentor: &Mentor) -> StorageResult<()>;

    /// Load a mentor by primary id
    async fn get(&self, id: &str) -> StorageResult<Option<Mentor>>;

    /// Load a mentor by secondary numeric id
    async fn get_by_number(&self, number: u64) -> StorageResult<Option<Mentor>>;

    /// Load the mentor holding an unconsumed verification token
    async fn find_by_token(&self, token: &str) -> StorageResult<Option<Mentor>>;

    /// List mentors matching filter criteria, newest first
    async fn list(&self, filter: MentorFilter) -> StorageResult<Vec<Mentor>>;

    /// Remove a mentor, returning whether it existed
    async fn delete(&self, id: &str) -> StorageResult<bool>;
}

/// Booking collection. Bookings are never removed.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert or overwrite a booking
    async fn save(&self, booking: &Booking) -> StorageResult<()>;

    /// Load a booking by id
    async fn get(&self, id: &str) -> StorageResult<Option<Booking>>;

    /// List bookings matching filter criteria, newest first
    async fn list(&self, filter: BookingFilter) -> StorageResult<Vec<Booking>>;
}

/// User collection keyed by uid. Both uid and email are unique.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, failing with `Conflict` on a duplicate uid or email
    async fn insert(&self, user: &User) -> StorageResult<()>;

    /// Overwrite an existing user, failing with `NotFound` if absent
    async fn save(&self, user: &User) -> StorageResult<()>;

    /// Load a user by uid
    async fn get(&self, uid: &str) -> StorageResult<Option<User>>;

    /// Load a user by email
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// List users matching filter criteria, newest first
    async fn list(&self, filter: UserFilter) -> StorageResult<Vec<User>>;
}

/// Idea analysis collection. Deletion is a status change, not a removal.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    /// Insert or overwrite an idea analysis
    async fn save(&self, idea: &IdeaAnalysis) -> StorageResult<()>;

    /// Load an idea analysis by id, including soft-deleted ones
    async fn get(&self, id: &str) -> StorageResult<Option<IdeaAnalysis>>;

    /// List idea analyses matching filter criteria, newest first
    async fn list(&self, filter: IdeaFilter) -> StorageResult<Vec<IdeaAnalysis>>;
}
