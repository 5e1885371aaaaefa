//! # Election Entities

use el_01_ledger_store::{HistoryEntry, TxId};
use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::fmt;

/// Election phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    Initialized,
    Started,
    Finished,
}

impl fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initialized => "initialized",
            Self::Started => "started",
            Self::Finished => "finished",
        };
        f.write_str(s)
    }
}

/// Current state of an election, stored under the election id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionRecord {
    pub election_id: String,
    pub election_name: String,
    pub status: ElectionStatus,
    pub updated_at: Timestamp,
}

/// Secondary index entry: election name → election id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionNameEntry {
    pub election_name: String,
    pub election_id: String,
}

/// Result of a lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResponse {
    pub status: ElectionStatus,
    pub message: String,
    pub record: ElectionRecord,
}

impl ElectionResponse {
    pub fn new(message: impl Into<String>, record: ElectionRecord) -> Self {
        Self {
            status: record.status,
            message: message.into(),
            record,
        }
    }
}

/// One committed value of an election record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionHistoryEntry {
    pub tx_id: TxId,
    pub timestamp: Timestamp,
    pub record: ElectionRecord,
}

impl ElectionHistoryEntry {
    pub fn new(entry: HistoryEntry, record: ElectionRecord) -> Self {
        Self {
            tx_id: entry.tx_id,
            timestamp: entry.timestamp,
            record,
        }
    }
}
