use std::sync::{Arc, LazyLock};

use rand::seq::SliceRandom;
use regex::Regex;

use crate::models::{AvailabilityTable, NextStep, OutboundResult, ResultMetadata};
use crate::services::appointments::AppointmentStore;

pub const CHECKING_PHRASES: [&str; 3] = [
    "SCANNING TEMPORAL DATABASE...",
    "ACCESSING QUANTUM CALENDAR...",
    "CALCULATING CHRONOLOGICAL VECTORS...",
];

const ENDING_PHRASES: [&str; 11] = [
    "done",
    "nope",
    "no",
    "bye",
    "goodbye",
    "thanks",
    "thank you",
    "that's all",
    "end",
    "terminate",
    "quit",
];

const VAGUE_TIME_PHRASES: [&str; 4] = ["next week", "afternoon", "morning", "evening"];
const SCHEDULING_WORDS: [&str; 3] = ["schedule", "appointment", "book"];
const PRICING_WORDS: [&str; 3] = ["price", "cost", "pricing"];

const SLOT_OFFER: &str = "Tomorrow at 10 AM or 2 PM, or Friday at 11 AM or 3 PM.";

static TIME_DIGIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:10|11|2|3)\b").expect("time digit pattern is valid")
});

pub fn is_time_response(message: &str) -> bool {
    let lc = message.to_lowercase();
    lc.contains("am")
        || lc.contains("pm")
        || lc.contains("tomorrow")
        || lc.contains("friday")
        || TIME_DIGIT.is_match(&lc)
}

pub fn is_ending_conversation(message: &str) -> bool {
    let lc = message.to_lowercase();
    ENDING_PHRASES.iter().any(|phrase| lc.contains(phrase))
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

pub struct Qualifier {
    availability: AvailabilityTable,
    appointments: Arc<AppointmentStore>,
}

impl Qualifier {
    pub fn new(appointments: Arc<AppointmentStore>) -> Self {
        Self::with_availability(appointments, AvailabilityTable::reference())
    }

    pub fn with_availability(
        appointments: Arc<AppointmentStore>,
        availability: AvailabilityTable,
    ) -> Self {
        Self {
            availability,
            appointments,
        }
    }

    pub fn appointments(&self) -> &Arc<AppointmentStore> {
        &self.appointments
    }

    pub fn respond(&self, message: &str, last: Option<&OutboundResult>) -> OutboundResult {
        let continued = last.and_then(|prev| self.continue_conversation(message, prev));
        let result = continued.unwrap_or_else(|| self.classify(message));

        let prior = last.and_then(|prev| prev.metadata.as_ref());
        let metadata = ResultMetadata::carry_forward(prior, result.metadata.clone());
        result.with_metadata(metadata)
    }

    fn continue_conversation(&self, message: &str, last: &OutboundResult) -> Option<OutboundResult> {
        match last.next_step {
            NextStep::ScheduleCall => Some(self.schedule_call(message)),
            NextStep::CollectSymptoms => Some(self.collect_symptoms(message, last)),
            NextStep::CollectHistory => Some(self.collect_history(message, last)),
            NextStep::PostConfirmation => Some(post_confirmation(message)),
            NextStep::Qualify
            | NextStep::ConfirmTime
            | NextStep::RequestSpecificDay
            | NextStep::DiscussPricing
            | NextStep::End => None,
        }
    }

    fn schedule_call(&self, message: &str) -> OutboundResult {
        if !is_time_response(message) {
            return OutboundResult::new(
                8,
                true,
                format!("I have these time slots available: {SLOT_OFFER} Which one works best for you?"),
                NextStep::ScheduleCall,
            );
        }

        let appointment = self.appointments.create(message);
        OutboundResult::new(
            9,
            true,
            format!(
                "APPOINTMENT CONFIRMED FOR {}.\n\nWould you like to:\n1. Share any symptoms or concerns\n2. Add medical history\n3. End conversation\n\nSelect an option or type 'done' if you're all set.",
                message.to_uppercase()
            ),
            NextStep::PostConfirmation,
        )
        .with_metadata(Some(ResultMetadata::options(Some(appointment.id))))
    }

    fn collect_symptoms(&self, message: &str, last: &OutboundResult) -> OutboundResult {
        if let Some(id) = last.appointment_id() {
            self.appointments.record_symptoms(id, message);
        }
        OutboundResult::new(
            9,
            true,
            format!(
                "SYMPTOMS LOGGED: {message}\n\nWould you like to:\n1. Add medical history\n2. End conversation\n\nSelect an option or type 'done' if you're all set."
            ),
            NextStep::PostConfirmation,
        )
        .with_metadata(Some(ResultMetadata::options(None)))
    }

    fn collect_history(&self, message: &str, last: &OutboundResult) -> OutboundResult {
        if let Some(id) = last.appointment_id() {
            self.appointments.record_history(id, message);
        }
        OutboundResult::new(
            9,
            true,
            "MEDICAL HISTORY LOGGED. Would you like to:\n1. Share symptoms or concerns\n2. End conversation\n\nSelect an option or type 'done' if you're all set.",
            NextStep::PostConfirmation,
        )
        .with_metadata(Some(ResultMetadata::options(None)))
    }

    fn classify(&self, message: &str) -> OutboundResult {
        let lc = message.to_lowercase();

        let days = self.availability.mentioned_days(&lc);
        if !days.is_empty() {
            return OutboundResult::new(
                9,
                true,
                format!(
                    "{} For those days, I have: {}. Which time works best for you?",
                    checking_phrase(),
                    self.availability.describe_days(&days)
                ),
                NextStep::ConfirmTime,
            );
        }

        if contains_any(&lc, &VAGUE_TIME_PHRASES) {
            return OutboundResult::new(
                8,
                true,
                format!(
                    "{} Here are some options for next week:\n- Monday at 2:00 PM and 3:30 PM\n- Tuesday at 2:00 PM and 3:30 PM\nWhich day would work better for you?",
                    checking_phrase()
                ),
                NextStep::RequestSpecificDay,
            );
        }

        if contains_any(&lc, &SCHEDULING_WORDS) {
            return OutboundResult::new(
                8,
                true,
                format!(
                    "Perfect! I'd be happy to help schedule that. We have slots available: {SLOT_OFFER} Which time works best for you?"
                ),
                NextStep::ScheduleCall,
            );
        }

        if contains_any(&lc, &PRICING_WORDS) {
            return OutboundResult::new(
                7,
                true,
                "I'd be happy to discuss pricing! Our plans start at $49/month for startups, with custom enterprise pricing available. Would you like to schedule a quick call to discuss your specific needs?",
                NextStep::DiscussPricing,
            );
        }

        OutboundResult::new(
            3,
            false,
            "Thanks for reaching out! To better assist you, could you share what specific challenges you're looking to solve?",
            NextStep::Qualify,
        )
    }
}

fn post_confirmation(message: &str) -> OutboundResult {
    let lc = message.to_lowercase();

    if contains_any(&lc, &["1", "symptoms", "concerns"]) {
        return OutboundResult::new(
            9,
            true,
            "Please share your symptoms or concerns.",
            NextStep::CollectSymptoms,
        );
    }
    if contains_any(&lc, &["2", "history", "medical"]) {
        return OutboundResult::new(
            9,
            true,
            "Please share any relevant medical history.",
            NextStep::CollectHistory,
        );
    }
    if lc.contains('3') || is_ending_conversation(&lc) {
        return OutboundResult::new(9, true, "INITIATING SHUTDOWN SEQUENCE...", NextStep::End)
            .with_metadata(Some(ResultMetadata::terminate()));
    }

    OutboundResult::new(
        9,
        true,
        "Would you like to:\n1. Share symptoms or concerns\n2. Add medical history\n3. End conversation\n\nSelect an option or type 'done' if you're all set.",
        NextStep::PostConfirmation,
    )
    .with_metadata(Some(ResultMetadata::options(None)))
}

fn checking_phrase() -> &'static str {
    CHECKING_PHRASES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(CHECKING_PHRASES[0])
}
