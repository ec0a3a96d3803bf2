use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::appointments::AppointmentStore;
use crate::services::interaction_log::InteractionLog;
use crate::services::qualifier::Qualifier;
use crate::services::responder::{ModelResponder, ResponderSelector};

pub struct AppState {
    pub config: AppConfig,
    pub interactions: InteractionLog,
    pub appointments: Arc<AppointmentStore>,
    pub responder: ResponderSelector,
}

impl AppState {
    pub fn new(config: AppConfig, llm: Option<Box<dyn LlmProvider>>) -> Self {
        let appointments = Arc::new(AppointmentStore::new());
        let rules = Arc::new(Qualifier::with_availability(
            Arc::clone(&appointments),
            config.availability.clone(),
        ));

        let responder = match llm {
            Some(llm) => {
                let model = ModelResponder::new(llm, config.availability.clone());
                ResponderSelector::with_model(
                    Box::new(model),
                    rules,
                    Duration::from_secs(config.llm_timeout_secs),
                )
            }
            None => ResponderSelector::rules_only(rules),
        };

        Self {
            config,
            interactions: InteractionLog::new(),
            appointments,
            responder,
        }
    }
}
