//! File-based storage backend implementation
//!
//! Layout: `<base_dir>/<collection>/<key>.json`, one document per record.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::{Booking, IdeaAnalysis, Mentor, User};
use crate::storage::{
    config::{FileConfig, StorageConfig},
    error::{StorageError, StorageResult},
    traits::*,
    types::*,
};

const MENTORS: &str = "mentors";
const BOOKINGS: &str = "bookings";
const USERS: &str = "users";
const IDEAS: &str = "idea_analyses";
/// Highest mentor number ever issued, kept beside the collections
const MENTOR_SEQUENCE: &str = "mentor_sequence.json";

/// File-based storage backend
pub struct FileBackend {
    config: FileConfig,
    base_dir: PathBuf,
    /// Held across check-then-write sequences so unique keys stay unique
    write_lock: Arc<Mutex<()>>,
}

impl FileBackend {
    /// Create a new file backend
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        let file_config = config.file.clone();
        let base_dir = file_config.base_dir.clone();

        for collection in [MENTORS, BOOKINGS, USERS, IDEAS] {
            fs::create_dir_all(base_dir.join(collection)).await?;
        }

        debug!("File storage rooted at {}", base_dir.display());

        Ok(Self {
            config: file_config,
            base_dir,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Get path for a record in a collection
    fn get_path(&self, collection: &str, key: &str) -> PathBuf {
        self.base_dir
            .join(collection)
            .join(format!("{}.json", file_key(key)))
    }

    /// Read JSON file, `None` when it does not exist
    async fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> StorageResult<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(
                serde_json::from_str(&content)?,
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Write JSON file through a temporary sibling and rename
    async fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> StorageResult<()> {
        let content = if self.config.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Load every document in a collection, skipping unreadable files
    async fn read_all<T: for<'de> Deserialize<'de>>(&self, collection: &str) -> StorageResult<Vec<T>> {
        let dir = self.base_dir.join(collection);
        let mut records = Vec::new();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
            Err(e) => return Err(StorageError::Io(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read_json::<T>(&path).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }

        Ok(records)
    }
}

/// File-name-safe form of a record key
fn file_key(key: &str) -> String {
    let safe = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if safe {
        key.to_string()
    } else {
        let hex: String = key.bytes().map(|b| format!("{:02x}", b)).collect();
        format!("x{}", hex)
    }
}

#[async_trait]
impl UnifiedStorage for FileBackend {
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
        let start = std::time::Instant::now();

        // Try to write a test file
        let test_file = self.base_dir.join(".health_check");
        let result = fs::write(&test_file, "health_check").await;
        let _ = fs::remove_file(&test_file).await;

        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(match result {
            Ok(_) => HealthStatus {
                healthy: true,
                backend_type: "file".to_string(),
                latency_ms,
                errors: vec![],
            },
            Err(e) => HealthStatus {
                healthy: false,
                backend_type: "file".to_string(),
                latency_ms,
                errors: vec![e.to_string()],
            },
        })
    }
}

impl FileBackend {
    /// Last issued mentor number. Stores written before the sequence file
    /// existed fall back to the highest stored number.
    async fn last_mentor_number(&self, mentors: &[Mentor]) -> StorageResult<u64> {
        let recorded: Option<u64> = self.read_json(&self.base_dir.join(MENTOR_SEQUENCE)).await?;
        let highest = mentors.iter().map(|m| m.mentor_number).max().unwrap_or(0);
        Ok(recorded.unwrap_or(0).max(highest))
    }
}

fn email_taken_by_other(mentors: &[Mentor], mentor: &Mentor) -> bool {
    mentors
        .iter()
        .any(|m| m.id != mentor.id && m.email.eq_ignore_ascii_case(&mentor.email))
}

fn number_taken_by_other(mentors: &[Mentor], mentor: &Mentor) -> bool {
    mentors
        .iter()
        .any(|m| m.id != mentor.id && m.mentor_number == mentor.mentor_number)
}

#[async_trait]
impl MentorStore for FileBackend {
    async fn insert(&self, mut mentor: Mentor) -> StorageResult<Mentor> {
        let _guard = self.write_lock.lock().await;
        let path = self.get_path(MENTORS, &mentor.id);
        if path.exists() {
            return Err(StorageError::duplicate("Mentor", "id", mentor.id));
        }
        let mentors: Vec<Mentor> = self.read_all(MENTORS).await?;
        if email_taken_by_other(&mentors, &mentor) {
            return Err(StorageError::duplicate("Mentor", "email", mentor.email));
        }

        let number = self.last_mentor_number(&mentors).await? + 1;
        self.write_json(&self.base_dir.join(MENTOR_SEQUENCE), &number).await?;
        mentor.mentor_number = number;
        self.write_json(&path, &mentor).await?;
        Ok(mentor)
    }

    async fn save(&self, mentor: &Mentor) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.get_path(MENTORS, &mentor.id);
        if !path.exists() {
            return Err(StorageError::missing("Mentor", mentor.id.clone()));
        }
        let mentors: Vec<Mentor> = self.read_all(MENTORS).await?;
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
        self.write_json(&path, mentor).await
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Mentor>> {
        self.read_json(&self.get_path(MENTORS, id)).await
    }

    async fn get_by_number(&self, number: u64) -> StorageResult<Option<Mentor>> {
        let mentors: Vec<Mentor> = self.read_all(MENTORS).await?;
        Ok(mentors.into_iter().find(|m| m.mentor_number == number))
    }

    async fn find_by_token(&self, token: &str) -> StorageResult<Option<Mentor>> {
        let mentors: Vec<Mentor> = self.read_all(MENTORS).await?;
        Ok(mentors
            .into_iter()
            .find(|m| m.verification_token.as_deref() == Some(token)))
    }

    async fn list(&self, filter: MentorFilter) -> StorageResult<Vec<Mentor>> {
        let mentors: Vec<Mentor> = self.read_all(MENTORS).await?;
        let matching = mentors.into_iter().filter(|m| filter.matches(m)).collect();
        Ok(page(matching, |m| m.created_at, filter.skip, filter.limit))
    }

    async fn delete(&self, id: &str) -> StorageResult<bool> {
        let _guard = self.write_lock.lock().await;
        let path = self.get_path(MENTORS, id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[async_trait]
impl BookingStore for FileBackend {
    async fn save(&self, booking: &Booking) -> StorageResult<()> {
        let path = self.get_path(BOOKINGS, &booking.id);
        self.write_json(&path, booking).await
    }

    async fn get(&self, id: &str) -> StorageResult<Option<Booking>> {
        self.read_json(&self.get_path(BOOKINGS, id)).await
    }

    async fn list(&self, filter: BookingFilter) -> StorageResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self.read_all(BOOKINGS).await?;
        let matching = bookings.into_iter().filter(|b| filter.matches(b)).collect();
        Ok(page(matching, |b| b.created_at, filter.skip, filter.limit))
    }
}

#[async_trait]
impl UserStore for FileBackend {
    async fn insert(&self, user: &User) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.get_path(USERS, &user.uid);
        if path.exists() {
            return Err(StorageError::duplicate("User", "uid", user.uid.clone()));
        }
        let users: Vec<User> = self.read_all(USERS).await?;
        if users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StorageError::duplicate("User", "email", user.email.clone()));
        }
        self.write_json(&path, user).await
    }

    async fn save(&self, user: &User) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.get_path(USERS, &user.uid);
        if !path.exists() {
            return Err(StorageError::missing("User", user.uid.clone()));
        }
        self.write_json(&path, user).await
    }

    async fn get(&self, uid: &str) -> StorageResult<Option<User>> {
        self.read_json(&self.get_path(USERS, uid)).await
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let users: Vec<User> = self.read_all(USERS).await?;
        Ok(users
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn list(&self, filter: UserFilter) -> StorageResult<Vec<User>> {
        let users: Vec<User> = self.read_all(USERS).await?;
        let matching = users.into_iter().filter(|u| filter.matches(u)).collect();
        Ok(page(matching, |u| u.created_at, 0, filter.limit))
    }
}

#[async_trait]
impl IdeaStore for FileBackend {
    async fn save(&self, idea: &IdeaAnalysis) -> StorageResult<()> {
        let path = self.get_path(IDEAS, &idea.id);
        self.write_json(&path, idea).await
    }

    async fn get(&self, id: &str) -> StorageResult<Option<IdeaAnalysis>> {
        self.read_json(&self.get_path(IDEAS, id)).await
    }

    async fn list(&self, filter: IdeaFilter) -> StorageResult<Vec<IdeaAnalysis>> {
        let ideas: Vec<IdeaAnalysis> = self.read_all(IDEAS).await?;
        let matching = ideas.into_iter().filter(|i| filter.matches(i)).collect();
        Ok(page(matching, |i| i.created_at, filter.skip, filter.limit))
    }
}
