use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OutboundResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionRecord {
    pub timestamp: DateTime<Utc>,
    pub inbound: String,
    pub outbound: OutboundResult,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub phone: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub interactions: Vec<InteractionRecord>,
}

impl Lead {
    pub fn new(phone: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            phone: phone.to_string(),
            status: LeadStatus::New,
            created_at: Utc::now(),
            interactions: Vec::new(),
        }
    }

    pub fn last_interaction(&self) -> Option<&InteractionRecord> {
        self.interactions.last()
    }
}
