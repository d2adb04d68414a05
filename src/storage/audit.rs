// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 HelpSP

//! Audit logging for security-sensitive operations.
//!
//! Authentication events, money movements, and administrative actions are
//! appended to daily JSONL files under the data directory.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::database::StoreResult;

/// Types of auditable events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    // Account events
    UserRegistered,
    LoginSuccess,
    LoginFailure,

    // Application events
    ApplicationSubmitted,
    ApplicationStatusChanged,

    // Review events
    ReviewSubmitted,
    ReviewUpdated,
    ReviewDeleted,

    // Wallet events
    CardSaved,
    DepositRequested,
    WithdrawalRequested,

    // Admin events
    BalanceOverridden,
    SiteContentUpdated,
}

/// An audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: AuditEventType,
    /// User who triggered the event (if known).
    pub user_id: Option<u64>,
    /// Resource affected (application, review, etc.).
    pub resource_id: Option<u64>,
    /// Resource type.
    pub resource_type: Option<String>,
    /// Additional details as JSON.
    pub details: Option<serde_json::Value>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message if the operation failed.
    pub error: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event.
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            user_id: None,
            resource_id: None,
            resource_type: None,
            details: None,
            success: true,
            error: None,
        }
    }

    /// Set the acting user.
    pub fn with_user(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set the affected resource.
    pub fn with_resource(mut self, resource_type: impl Into<String>, resource_id: u64) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id);
        self
    }

    /// Add details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as failed with an error message.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }
}

/// Append-only audit log backed by daily JSONL files.
pub struct AuditRepository {
    dir: PathBuf,
}

impl AuditRepository {
    /// Create an audit repository rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn day_file(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{date}.jsonl"))
    }

    /// Log an audit event.
    ///
    /// Events are appended to a daily log file, one JSON object per line.
    pub fn log(&self, event: &AuditEvent) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let date = event.timestamp.format("%Y-%m-%d").to_string();
        let line = serde_json::to_string(event)?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(self.day_file(&date))?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Read audit events for a specific date (`YYYY-MM-DD`).
    ///
    /// A day with no log file reads as empty.
    pub fn read_events(&self, date: &str) -> StoreResult<Vec<AuditEvent>> {
        let content = match std::fs::read_to_string(self.day_file(date)) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut events = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(line)?);
        }
        Ok(events)
    }
}

/// Helper macro for logging audit events from request handlers.
///
/// Write failures are reported on the trace log rather than surfaced to the
/// client.
#[macro_export]
macro_rules! audit_log {
    ($store:expr, $event_type:expr, $user:expr) => {{
        let event = $crate::storage::AuditEvent::new($event_type).with_user($user.id);
        if let Err(err) = $store.audit().log(&event) {
            tracing::warn!(error = %err, "failed to write audit event");
        }
    }};
    ($store:expr, $event_type:expr, $user:expr, $resource_type:expr, $resource_id:expr) => {{
        let event = $crate::storage::AuditEvent::new($event_type)
            .with_user($user.id)
            .with_resource($resource_type, $resource_id);
        if let Err(err) = $store.audit().log(&event) {
            tracing::warn!(error = %err, "failed to write audit event");
        }
    }};
}
