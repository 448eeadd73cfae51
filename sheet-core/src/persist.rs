//! Loading and saving prerequisite trees and character sheets.
//!
//! Documents are JSON. Anything malformed aborts the load: there is no
//! partial result and no substitution of defaults for bad values.

use crate::entity::Entity;
use crate::prereq::PrereqList;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, instrument};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current document version.
pub const DOCUMENT_VERSION: u32 = 1;

/// A stored prerequisite tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrereqDocument {
    /// Format version for compatibility checking.
    pub version: u32,
    pub prereqs: PrereqList,
}

impl PrereqDocument {
    pub fn new(prereqs: PrereqList) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            prereqs,
        }
    }

    /// Parse a document, rejecting other versions.
    pub fn from_json(content: &str) -> Result<Self, PersistError> {
        let doc: Self = serde_json::from_str(content)?;
        if doc.version != DOCUMENT_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: DOCUMENT_VERSION,
                found: doc.version,
            });
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to a JSON file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = self.to_json()?;
        fs::write(path.as_ref(), content).await?;
        debug!(children = self.prereqs.len(), "saved prerequisites");
        Ok(())
    }

    /// Load from a JSON file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path.as_ref()).await?;
        let doc = Self::from_json(&content)?;
        debug!(children = doc.prereqs.len(), "loaded prerequisites");
        Ok(doc)
    }
}

/// Load a character sheet from a JSON file.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub async fn load_entity_json(path: impl AsRef<Path>) -> Result<Entity, PersistError> {
    let content = fs::read_to_string(path.as_ref()).await?;
    let entity: Entity = serde_json::from_str(&content)?;
    debug!(name = %entity.name, "loaded entity");
    Ok(entity)
}

/// Save a character sheet to a JSON file.
pub async fn save_entity_json(entity: &Entity, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let content = serde_json::to_string_pretty(entity)?;
    fs::write(path, content).await?;
    Ok(())
}
