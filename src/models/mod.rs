pub mod appointment;
pub mod availability;
pub mod conversation;
pub mod lead;

pub use appointment::{Appointment, AppointmentDetails, AppointmentStatus};
pub use availability::{AvailabilityTable, DaySlots};
pub use conversation::{NextStep, OutboundResult, ResultMetadata};
pub use lead::{InteractionRecord, Lead, LeadStatus};
