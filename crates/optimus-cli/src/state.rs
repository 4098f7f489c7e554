use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use optimus_core::{SelectionContext, SelectionListener};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const STATE_FILE: &str = "selection.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub target_app_id: Option<String>,
    pub selected_at: Option<DateTime<Utc>>,
}

/// The target application, persisted between invocations.
#[derive(Debug)]
pub struct SelectionStore {
    path: PathBuf,
    state: SelectionState,
}

impl SelectionStore {
    /// Load the store kept in `dir`. A missing file is an empty selection; an
    /// unreadable one is logged and treated the same.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(STATE_FILE);

        let state = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed selection state {}: {}", path.display(), e);
                SelectionState::default()
            })
        } else {
            SelectionState::default()
        };

        tracing::debug!("Selection state: {:?}", state);
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn target(&self) -> Option<&str> {
        self.state.target_app_id.as_deref()
    }

    pub fn context(&self) -> SelectionContext {
        SelectionContext {
            target_app_id: self.state.target_app_id.clone(),
        }
    }

    pub fn set(&mut self, app_id: &str) {
        self.state = SelectionState {
            target_app_id: Some(app_id.to_string()),
            selected_at: Some(Utc::now()),
        };
    }

    pub fn clear(&mut self) {
        self.state = SelectionState::default();
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        tracing::debug!("Saved selection to {}", self.path.display());
        Ok(())
    }
}

impl SelectionListener for SelectionStore {
    fn on_select_application(&mut self, app_id: &str) {
        self.set(app_id);
    }
}
