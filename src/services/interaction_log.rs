use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::OwnedMutexGuard;

use crate::models::{InteractionRecord, Lead, OutboundResult};

#[derive(Debug, Default)]
pub struct InteractionLog {
    leads: Mutex<HashMap<String, Lead>>,
    turns: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_interaction(&self, phone: &str) -> Option<InteractionRecord> {
        self.leads()
            .get(phone)
            .and_then(|lead| lead.last_interaction().cloned())
    }

    pub fn log_interaction(&self, phone: &str, inbound: &str, outbound: OutboundResult) -> Lead {
        let mut leads = self.leads();
        let lead = leads
            .entry(phone.to_string())
            .or_insert_with(|| Lead::new(phone));

        lead.interactions.push(InteractionRecord {
            timestamp: Utc::now(),
            inbound: inbound.to_string(),
            outbound,
        });

        if tracing::enabled!(tracing::Level::DEBUG) {
            match serde_json::to_string_pretty(&*lead) {
                Ok(dump) => tracing::debug!(phone, "lead updated: {dump}"),
                Err(e) => tracing::debug!(phone, error = %e, "lead updated"),
            }
        }

        lead.clone()
    }

    pub fn lead(&self, phone: &str) -> Option<Lead> {
        self.leads().get(phone).cloned()
    }

    pub async fn begin_turn(&self, phone: &str) -> OwnedMutexGuard<()> {
        let turn = {
            let mut turns = self.turns.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(turns.entry(phone.to_string()).or_default())
        };
        turn.lock_owned().await
    }

    fn leads(&self) -> MutexGuard<'_, HashMap<String, Lead>> {
        self.leads.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::models::{LeadStatus, NextStep};

    fn result(step: NextStep) -> OutboundResult {
        OutboundResult::new(8, true, "reply", step)
    }

    #[test]
    fn test_unknown_caller_has_no_history() {
        let log = InteractionLog::new();
        assert!(log.last_interaction("+15550000000").is_none());
        assert!(log.lead("+15550000000").is_none());
    }

    #[test]
    fn test_log_creates_new_lead() {
        let log = InteractionLog::new();
        let lead = log.log_interaction("+15551110000", "hi", result(NextStep::Qualify));
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.phone, "+15551110000");
        assert_eq!(lead.interactions.len(), 1);
    }

    #[test]
    fn test_last_interaction_is_most_recent() {
        let log = InteractionLog::new();
        log.log_interaction("a", "first", result(NextStep::ScheduleCall));
        log.log_interaction("a", "second", result(NextStep::PostConfirmation));
        log.log_interaction("b", "other", result(NextStep::Qualify));

        let last = log.last_interaction("a").unwrap();
        assert_eq!(last.inbound, "second");
        assert_eq!(last.outbound.next_step, NextStep::PostConfirmation);
        assert_eq!(log.lead("a").unwrap().interactions.len(), 2);
    }

    #[test]
    fn test_last_interaction_is_idempotent() {
        let log = InteractionLog::new();
        log.log_interaction("a", "hello", result(NextStep::Qualify));
        let first = log.last_interaction("a");
        let second = log.last_interaction("a");
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_lead_identity_is_stable() {
        let log = InteractionLog::new();
        let first = log.log_interaction("a", "one", result(NextStep::Qualify));
        let second = log.log_interaction("a", "two", result(NextStep::Qualify));
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_turns_serialize_per_caller() {
        let log = Arc::new(InteractionLog::new());
        let guard = log.begin_turn("a").await;

        // Another caller is not held up.
        tokio::time::timeout(Duration::from_millis(100), log.begin_turn("b"))
            .await
            .expect("other caller should not block");

        // Same caller waits until the first turn ends.
        let waiting = tokio::time::timeout(Duration::from_millis(50), log.begin_turn("a")).await;
        assert!(waiting.is_err());

        drop(guard);
        tokio::time::timeout(Duration::from_millis(100), log.begin_turn("a"))
            .await
            .expect("turn should be free after release");
    }
}
