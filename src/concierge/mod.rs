//! Request orchestration: the progress bus and the concierge service

mod events;
mod service;

pub use events::ProgressBus;
pub use service::ConciergeService;
