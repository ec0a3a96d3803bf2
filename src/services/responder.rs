use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{AvailabilityTable, InteractionRecord, OutboundResult};
use crate::services::ai::analyzer::analyze_message;
use crate::services::ai::LlmProvider;
use crate::services::qualifier::Qualifier;

#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(
        &self,
        message: &str,
        last: Option<&InteractionRecord>,
    ) -> anyhow::Result<OutboundResult>;
}

#[async_trait]
impl Responder for Qualifier {
    async fn respond(
        &self,
        message: &str,
        last: Option<&InteractionRecord>,
    ) -> anyhow::Result<OutboundResult> {
        Ok(Qualifier::respond(self, message, last.map(|r| &r.outbound)))
    }
}

pub struct ModelResponder {
    llm: Box<dyn LlmProvider>,
    availability: AvailabilityTable,
}

impl ModelResponder {
    pub fn new(llm: Box<dyn LlmProvider>, availability: AvailabilityTable) -> Self {
        Self { llm, availability }
    }
}

#[async_trait]
impl Responder for ModelResponder {
    async fn respond(
        &self,
        message: &str,
        last: Option<&InteractionRecord>,
    ) -> anyhow::Result<OutboundResult> {
        analyze_message(self.llm.as_ref(), message, last, &self.availability).await
    }
}

pub struct ResponderSelector {
    model: Option<Box<dyn Responder>>,
    rules: Arc<Qualifier>,
    timeout: Duration,
}

impl ResponderSelector {
    pub fn rules_only(rules: Arc<Qualifier>) -> Self {
        Self {
            model: None,
            rules,
            timeout: Duration::ZERO,
        }
    }

    pub fn with_model(model: Box<dyn Responder>, rules: Arc<Qualifier>, timeout: Duration) -> Self {
        Self {
            model: Some(model),
            rules,
            timeout,
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn rules(&self) -> &Arc<Qualifier> {
        &self.rules
    }

    pub async fn respond(&self, message: &str, last: Option<&InteractionRecord>) -> OutboundResult {
        if let Some(model) = &self.model {
            tracing::debug!("using model responder");
            match tokio::time::timeout(self.timeout, model.respond(message, last)).await {
                Ok(Ok(result)) => return result,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "model responder failed, falling back to rules");
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_ms = self.timeout.as_millis() as u64,
                        "model responder timed out, falling back to rules"
                    );
                }
            }
        }

        self.rules.respond(message, last.map(|r| &r.outbound))
    }
}
