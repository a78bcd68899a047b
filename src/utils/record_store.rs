// src/utils/record_store.rs
use crate::models::{ContentPlan, ServiceError, SocialAccount, Team, User};
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// A record persisted as one JSON document per id.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

impl Record for User {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Team {
    const COLLECTION: &'static str = "teams";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for SocialAccount {
    const COLLECTION: &'static str = "accounts";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ContentPlan {
    const COLLECTION: &'static str = "plans";

    fn id(&self) -> &str {
        &self.id
    }
}

const COLLECTIONS: [&str; 4] = [
    User::COLLECTION,
    Team::COLLECTION,
    SocialAccount::COLLECTION,
    ContentPlan::COLLECTION,
];

// File-backed store: `<root>/<collection>/<id>.json`
#[derive(Clone)]
pub struct Store {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl Store {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ServiceError> {
        let root = root.into();
        for collection in COLLECTIONS {
            let dir = root.join(collection);
            if !dir.exists() {
                info!("Creating {} directory", dir.display());
                fs::create_dir_all(&dir).map_err(|e| {
                    error!("❌ Failed to create storage directory {}: {:?}", dir.display(), e);
                    ServiceError::InternalServerError
                })?;
            }
        }

        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serializes check-then-write sequences (uniqueness checks, bulk detaches).
    pub fn exclusive(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.write_lock.lock().map_err(|e| {
            error!("❌ Store write lock poisoned: {:?}", e);
            ServiceError::InternalServerError
        })
    }

    fn record_path<R: Record>(&self, id: &str) -> Option<PathBuf> {
        // Ids are UUIDs; anything else can't name a stored record
        uuid::Uuid::parse_str(id).ok()?;
        Some(self.root.join(R::COLLECTION).join(format!("{}.json", id)))
    }

    // Save a record, replacing any previous version
    pub fn save<R: Record>(&self, record: &R) -> Result<(), ServiceError> {
        let path = self.record_path::<R>(record.id()).ok_or_else(|| {
            error!("❌ Refusing to save {} record with invalid id: {}", R::COLLECTION, record.id());
            ServiceError::InternalServerError
        })?;

        let json = serde_json::to_string_pretty(record).map_err(|e| {
            error!("❌ Failed to serialize {} record: {:?}", R::COLLECTION, e);
            ServiceError::InternalServerError
        })?;

        // Write beside the target then rename so readers never see a partial document
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .and_then(|_| fs::rename(&tmp_path, &path))
            .map_err(|e| {
                error!("❌ Failed to write {}: {:?}", path.display(), e);
                ServiceError::InternalServerError
            })?;

        debug!("Saved {} record {}", R::COLLECTION, record.id());
        Ok(())
    }

    // Find a record by ID
    pub fn find<R: Record>(&self, id: &str) -> Result<Option<R>, ServiceError> {
        let path = match self.record_path::<R>(id) {
            Some(path) => path,
            None => return Ok(None),
        };

        if !path.exists() {
            return Ok(None);
        }

        read_record(&path).map(Some)
    }

    pub fn list<R: Record>(&self) -> Result<Vec<R>, ServiceError> {
        let dir = self.root.join(R::COLLECTION);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            error!("❌ Failed to read {}: {:?}", dir.display(), e);
            ServiceError::InternalServerError
        })?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                error!("❌ Failed to read directory entry in {}: {:?}", dir.display(), e);
                ServiceError::InternalServerError
            })?;
            let path = entry.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                records.push(read_record(&path)?);
            }
        }

        Ok(records)
    }

    pub fn find_where<R, F>(&self, predicate: F) -> Result<Option<R>, ServiceError>
    where
        R: Record,
        F: Fn(&R) -> bool,
    {
        Ok(self.list::<R>()?.into_iter().find(|record| predicate(record)))
    }

    // Hard delete; returns false when nothing was stored under the id
    pub fn delete<R: Record>(&self, id: &str) -> Result<bool, ServiceError> {
        let path = match self.record_path::<R>(id) {
            Some(path) if path.exists() => path,
            _ => return Ok(false),
        };

        fs::remove_file(&path).map_err(|e| {
            error!("❌ Failed to delete {}: {:?}", path.display(), e);
            ServiceError::InternalServerError
        })?;

        debug!("Deleted {} record {}", R::COLLECTION, id);
        Ok(true)
    }

    // Remove every record of every collection
    pub fn clear(&self) -> Result<(), ServiceError> {
        for collection in COLLECTIONS {
            let dir = self.root.join(collection);
            if dir.exists() {
                fs::remove_dir_all(&dir).map_err(|e| {
                    error!("❌ Failed to clear {}: {:?}", dir.display(), e);
                    ServiceError::InternalServerError
                })?;
            }
            fs::create_dir_all(&dir).map_err(|e| {
                error!("❌ Failed to recreate {}: {:?}", dir.display(), e);
                ServiceError::InternalServerError
            })?;
        }

        info!("🧹 Cleared storage at {}", self.root.display());
        Ok(())
    }
}

fn read_record<R: Record>(path: &Path) -> Result<R, ServiceError> {
    let content = fs::read_to_string(path).map_err(|e| {
        error!("❌ Failed to read {}: {:?}", path.display(), e);
        ServiceError::InternalServerError
    })?;

    serde_json::from_str(&content).map_err(|e| {
        error!("❌ Failed to parse {}: {:?}", path.display(), e);
        ServiceError::InternalServerError
    })
}
