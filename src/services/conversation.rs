use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::models::OutboundResult;
use crate::state::AppState;

pub async fn process_message(
    state: &Arc<AppState>,
    phone: &str,
    message: &str,
) -> anyhow::Result<OutboundResult> {
    let _turn = state.interactions.begin_turn(phone).await;

    let last = state.interactions.last_interaction(phone);

    tracing::info!(
        phone,
        last_step = last.as_ref().map(|r| r.outbound.next_step.as_str()).unwrap_or("none"),
        "processing message"
    );

    thinking_pause(state.config.thinking_delay_ms).await;

    let result = state.responder.respond(message, last.as_ref()).await;

    tracing::info!(
        phone,
        next_step = result.next_step.as_str(),
        score = result.score,
        qualified = result.qualified,
        "reply ready"
    );

    state
        .interactions
        .log_interaction(phone, message, result.clone());

    Ok(result)
}

async fn thinking_pause(base_ms: u64) {
    if base_ms == 0 {
        return;
    }
    let jitter = rand::thread_rng().gen_range(0..=base_ms);
    tokio::time::sleep(pause_duration(base_ms, jitter)).await;
}

fn pause_duration(base_ms: u64, jitter_ms: u64) -> Duration {
    Duration::from_millis(base_ms.saturating_add(jitter_ms))
}
