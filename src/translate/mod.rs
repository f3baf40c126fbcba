pub mod interface;
pub mod intent_filter;
pub mod prompt;

pub use interface::*;
pub use intent_filter::{FilterMode, IntentFilter, RejectReason, Verdict};
