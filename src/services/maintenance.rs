// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-flag maintenance mode.
//!
//! Maintenance is enabled exactly when the marker file exists. The marker
//! holds the notice shown to visitors. A sidecar `<marker>.revision` file
//! keeps the revision counter across disable/enable cycles, so admins can
//! make optimistic writes with `expectedRevision`.
//!
//! Reads never fail: a missing, unreadable or corrupt marker reads as
//! "disabled".

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// On-disk marker contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    #[serde(default)]
    pub message: String,
    pub estimated_end: Option<DateTime<Utc>>,
    /// Absent in hand-written markers
    #[serde(default)]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revision: u64,
}

/// Current maintenance state as served by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MaintenanceStatus {
    pub enabled: bool,
    pub message: String,
    pub estimated_end: Option<DateTime<Utc>>,
    pub activated_at: Option<DateTime<Utc>>,
    pub revision: u64,
}

impl MaintenanceStatus {
    fn disabled(revision: u64) -> Self {
        Self {
            enabled: false,
            message: String::new(),
            estimated_end: None,
            activated_at: None,
            revision,
        }
    }
}

impl From<MaintenanceRecord> for MaintenanceStatus {
    fn from(record: MaintenanceRecord) -> Self {
        Self {
            enabled: true,
            message: record.message,
            estimated_end: record.estimated_end,
            activated_at: record.activated_at,
            revision: record.revision,
        }
    }
}

/// Admin request to turn maintenance on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnableMaintenance {
    #[serde(default)]
    pub message: String,
    pub estimated_end: Option<DateTime<Utc>>,
    pub expected_revision: Option<u64>,
}

/// Marker-file store. Writes within one process are serialized.
pub struct MaintenanceStore {
    path: PathBuf,
    revision_path: PathBuf,
    write_lock: Mutex<()>,
}

impl MaintenanceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut revision_path = path.clone().into_os_string();
        revision_path.push(".revision");
        Self {
            path,
            revision_path: revision_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current status. Fails open to "disabled".
    pub async fn status(&self) -> MaintenanceStatus {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<MaintenanceRecord>(&bytes) {
                Ok(mut record) => {
                    if record.revision == 0 {
                        record.revision = self.stored_revision().await;
                    }
                    record.into()
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Corrupt maintenance marker, treating maintenance as disabled"
                    );
                    MaintenanceStatus::disabled(self.stored_revision().await)
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                MaintenanceStatus::disabled(self.stored_revision().await)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Unreadable maintenance marker, treating maintenance as disabled"
                );
                MaintenanceStatus::disabled(self.stored_revision().await)
            }
        }
    }

    /// Whether maintenance is currently enabled.
    pub async fn is_enabled(&self) -> bool {
        self.status().await.enabled
    }

    /// Turn maintenance on (or replace the notice if already on).
    pub async fn enable(&self, request: EnableMaintenance) -> Result<MaintenanceStatus> {
        let _guard = self.write_lock.lock().await;
        let current = self.status().await;
        check_revision(&current, request.expected_revision)?;

        let record = MaintenanceRecord {
            message: request.message.trim().to_string(),
            estimated_end: request.estimated_end,
            activated_at: Some(if current.enabled {
                current.activated_at.unwrap_or_else(Utc::now)
            } else {
                Utc::now()
            }),
            revision: current.revision + 1,
        };

        let json = serde_json::to_vec_pretty(&record)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialize maintenance: {}", e)))?;
        self.write_atomic(&self.path, &json).await?;
        self.write_revision(record.revision).await?;

        tracing::info!(
            revision = record.revision,
            estimated_end = ?record.estimated_end,
            "Maintenance mode enabled"
        );
        Ok(record.into())
    }

    /// Turn maintenance off. Disabling when already off is a no-op.
    pub async fn disable(&self, expected_revision: Option<u64>) -> Result<MaintenanceStatus> {
        let _guard = self.write_lock.lock().await;
        let current = self.status().await;
        check_revision(&current, expected_revision)?;

        let exists = tokio::fs::try_exists(&self.path).await.unwrap_or(false);
        if !exists {
            return Ok(current);
        }

        let revision = current.revision + 1;
        self.write_revision(revision).await?;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "Failed to remove maintenance marker: {}",
                    e
                )))
            }
        }

        tracing::info!(revision, "Maintenance mode disabled");
        Ok(MaintenanceStatus::disabled(revision))
    }

    async fn stored_revision(&self) -> u64 {
        tokio::fs::read_to_string(&self.revision_path)
            .await
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    async fn write_revision(&self, revision: u64) -> Result<()> {
        self.write_atomic(&self.revision_path, revision.to_string().as_bytes())
            .await
    }

    /// Write via a temp file and rename so readers never see partial JSON.
    async fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Create {}: {}", parent.display(), e))
            })?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Rename {}: {}", path.display(), e)))?;
        Ok(())
    }
}

fn check_revision(current: &MaintenanceStatus, expected: Option<u64>) -> Result<()> {
    match expected {
        Some(expected) if expected != current.revision => Err(AppError::Conflict(format!(
            "Maintenance revision is {}, expected {}",
            current.revision, expected
        ))),
        _ => Ok(()),
    }
}
