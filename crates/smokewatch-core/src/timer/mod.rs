mod engine;
mod format;

pub use engine::{CountdownEngine, CountdownState};
pub use format::format_hms;
