use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    Qualify,
    ConfirmTime,
    RequestSpecificDay,
    ScheduleCall,
    DiscussPricing,
    CollectSymptoms,
    CollectHistory,
    PostConfirmation,
    End,
}

impl NextStep {
    pub const ALL: [NextStep; 9] = [
        NextStep::Qualify,
        NextStep::ConfirmTime,
        NextStep::RequestSpecificDay,
        NextStep::ScheduleCall,
        NextStep::DiscussPricing,
        NextStep::CollectSymptoms,
        NextStep::CollectHistory,
        NextStep::PostConfirmation,
        NextStep::End,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NextStep::Qualify => "qualify",
            NextStep::ConfirmTime => "confirm_time",
            NextStep::RequestSpecificDay => "request_specific_day",
            NextStep::ScheduleCall => "schedule_call",
            NextStep::DiscussPricing => "discuss_pricing",
            NextStep::CollectSymptoms => "collect_symptoms",
            NextStep::CollectHistory => "collect_history",
            NextStep::PostConfirmation => "post_confirmation",
            NextStep::End => "end",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|step| step.as_str() == s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_options: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminate: Option<bool>,
}

impl ResultMetadata {
    pub fn options(appointment_id: Option<String>) -> Self {
        Self {
            appointment_id,
            show_options: Some(true),
            terminate: None,
        }
    }

    pub fn terminate() -> Self {
        Self {
            terminate: Some(true),
            ..Self::default()
        }
    }

    // New keys win; terminate never carries over.
    pub fn carry_forward(
        prior: Option<&ResultMetadata>,
        new: Option<ResultMetadata>,
    ) -> Option<ResultMetadata> {
        let Some(prior) = prior else {
            return new;
        };
        let new = new.unwrap_or_default();
        let merged = ResultMetadata {
            appointment_id: new.appointment_id.or_else(|| prior.appointment_id.clone()),
            show_options: new.show_options.or(prior.show_options),
            terminate: new.terminate,
        };
        if merged.is_empty() {
            None
        } else {
            Some(merged)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.appointment_id.is_none() && self.show_options.is_none() && self.terminate.is_none()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminate.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResult {
    pub score: u8,
    pub qualified: bool,
    pub response: String,
    pub next_step: NextStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResultMetadata>,
}

impl OutboundResult {
    pub fn new(score: u8, qualified: bool, response: impl Into<String>, next_step: NextStep) -> Self {
        Self {
            score,
            qualified,
            response: response.into(),
            next_step,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Option<ResultMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn appointment_id(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.appointment_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_step_labels_roundtrip() {
        for step in NextStep::ALL {
            assert_eq!(NextStep::parse(step.as_str()), Some(step));
        }
        assert_eq!(NextStep::parse("garbage"), None);
        assert_eq!(NextStep::parse(""), None);
    }

    #[test]
    fn test_next_step_serializes_as_label() {
        let json = serde_json::to_string(&NextStep::PostConfirmation).unwrap();
        assert_eq!(json, "\"post_confirmation\"");
    }

    #[test]
    fn test_carry_forward_keeps_appointment_id() {
        let prior = ResultMetadata::options(Some("appt-1".to_string()));
        let merged = ResultMetadata::carry_forward(Some(&prior), None).unwrap();
        assert_eq!(merged.appointment_id.as_deref(), Some("appt-1"));
        assert_eq!(merged.show_options, Some(true));
    }

    #[test]
    fn test_carry_forward_new_keys_win() {
        let prior = ResultMetadata {
            appointment_id: Some("old".to_string()),
            show_options: Some(false),
            terminate: None,
        };
        let new = ResultMetadata::options(Some("new".to_string()));
        let merged = ResultMetadata::carry_forward(Some(&prior), Some(new)).unwrap();
        assert_eq!(merged.appointment_id.as_deref(), Some("new"));
        assert_eq!(merged.show_options, Some(true));
    }

    #[test]
    fn test_carry_forward_drops_prior_terminate() {
        let prior = ResultMetadata::terminate();
        assert_eq!(ResultMetadata::carry_forward(Some(&prior), None), None);
    }

    #[test]
    fn test_outbound_result_wire_names() {
        let result = OutboundResult::new(9, true, "ok", NextStep::PostConfirmation)
            .with_metadata(Some(ResultMetadata::options(Some("a1".to_string()))));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["nextStep"], "post_confirmation");
        assert_eq!(json["metadata"]["appointmentId"], "a1");
        assert_eq!(json["metadata"]["showOptions"], true);
        assert!(json["metadata"].get("terminate").is_none());
    }
}
