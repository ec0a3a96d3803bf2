pub mod ai;
pub mod appointments;
pub mod conversation;
pub mod interaction_log;
pub mod qualifier;
pub mod responder;
