pub mod chat;
pub mod clock;
pub mod config;
pub mod job;
pub mod state;

// Re-export main types for convenience
pub use chat::{ChatSimulator, ChatSnapshot, IdPolicy, DEFAULT_REPLY_DELAY, DEFAULT_REPLY_TEXT};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use job::{Contact, JobListing};
pub use state::{Message, Sender};
