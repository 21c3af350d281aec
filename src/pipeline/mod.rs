//! Feed Pipeline Module
//!
//! ```text
//! ReadingSource ──(interval / manual refresh)──▶ refresh_once ──▶ AppState
//!                      on FeedError: demo reading, connected = false
//! ```
//!
//! Scoring happens as each observation is stored, so handlers only read.

mod poller;
mod state;

pub use poller::{refresh_once, run_feed_poller};
pub use state::*;
