use serde::Deserialize;

use crate::models::{AvailabilityTable, InteractionRecord, NextStep, OutboundResult, ResultMetadata};
use crate::services::ai::{LlmProvider, Message};

const SYSTEM_PROMPT: &str = r#"You are Vectus AI, a medical scheduling assistant from The Victor Collective. Be professional, precise and direct, with a calm authority that inspires confidence.

Rules:
1. If the patient's message suggests they are finished (for example "thanks", "that's all", "goodbye", or satisfaction with no further questions), set shouldTerminate to true.
2. When asked about availability, say you are checking and then ALWAYS give concrete times from the table below. Never stop at "let me check".
3. When the patient names specific days, answer with the actual times for those days, e.g. "For those days, I have: Tuesday at 2:00 PM and 3:30 PM, or Thursday at 2:00 PM and 3:30 PM. Which would work better for you?"
4. If the timeframe is vague ("next week", "afternoons"), offer two or three options and ask for a more specific preference. Never list everything at once.
5. Keep a friendly, helpful tone and make it clear you are actively working on the request.

Available time slots:
"#;

const RESPONSE_FORMAT: &str = r#"Respond ONLY with JSON (no markdown, no explanation) in this exact shape:
{"score": 1-10, "qualified": boolean, "response": "your reply", "nextStep": "next_step_id", "shouldTerminate": boolean}
Use one of these nextStep ids: "#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelReply {
    score: f64,
    #[serde(default)]
    qualified: bool,
    response: String,
    #[serde(default)]
    next_step: String,
    #[serde(default)]
    should_terminate: bool,
}

pub fn build_system_prompt(availability: &AvailabilityTable, last: Option<&InteractionRecord>) -> String {
    let mut prompt = format!("{SYSTEM_PROMPT}{}\n\n", availability.to_prompt_lines());

    if let Some(last) = last {
        prompt.push_str(&format!(
            "The last interaction was: Patient said \"{}\" and you responded about {}.\n\n",
            last.inbound,
            last.outbound.next_step.as_str()
        ));
    }

    let steps = NextStep::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    prompt.push_str(RESPONSE_FORMAT);
    prompt.push_str(&steps);
    prompt
}

pub async fn analyze_message(
    llm: &dyn LlmProvider,
    message: &str,
    last: Option<&InteractionRecord>,
    availability: &AvailabilityTable,
) -> anyhow::Result<OutboundResult> {
    let system = build_system_prompt(availability, last);
    let raw = llm.chat(&system, &[Message::user(message)]).await?;
    let reply = parse_model_reply(&raw)?;

    let prior = last.and_then(|r| r.outbound.metadata.as_ref());
    Ok(into_outbound(reply, prior))
}

fn parse_model_reply(raw: &str) -> anyhow::Result<ModelReply> {
    if let Ok(reply) = serde_json::from_str::<ModelReply>(raw) {
        return Ok(reply);
    }

    let trimmed = raw.trim();
    let cleaned = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    if let Ok(reply) = serde_json::from_str::<ModelReply>(cleaned) {
        return Ok(reply);
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(reply) = serde_json::from_str::<ModelReply>(&cleaned[start..=end]) {
                return Ok(reply);
            }
        }
    }

    anyhow::bail!("model reply is not the expected JSON: {raw}")
}

fn into_outbound(reply: ModelReply, prior: Option<&ResultMetadata>) -> OutboundResult {
    let score = if reply.score.is_finite() {
        reply.score.round().clamp(1.0, 10.0) as u8
    } else {
        1
    };

    let next_step = match NextStep::parse(&reply.next_step) {
        Some(step) => step,
        None if reply.should_terminate => NextStep::End,
        None => {
            tracing::warn!(label = %reply.next_step, "unrecognized next step from model, using qualify");
            NextStep::Qualify
        }
    };

    let own = reply.should_terminate.then(ResultMetadata::terminate);
    OutboundResult::new(score, reply.qualified, reply.response, next_step)
        .with_metadata(ResultMetadata::carry_forward(prior, own))
}
