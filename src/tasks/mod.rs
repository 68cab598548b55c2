//! Background Tasks Module
//!
//! Contains background tasks that run periodically during service operation.
//!
//! # Tasks
//! - Session reaper: drops paging sessions detached past their grace period

mod reaper;

pub use reaper::spawn_session_reaper;
