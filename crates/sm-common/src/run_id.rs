//! Audit stamp attached to every ranking response.
//!
//! `match_run_id` is a ULID minted once per process, so a history writer can
//! group every ranking a given deployment served; a restart starts a new
//! group. `matched_at` is taken per response.
//!
//! ```
//! use sm_common::run_id::{self, RunStamp};
//!
//! let stamp = RunStamp::now();
//! assert_eq!(stamp.match_run_id, run_id::get());
//! assert_eq!(stamp.match_run_id.len(), 26);
//! ```

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

static RUN_ID: Lazy<Ulid> = Lazy::new(Ulid::new);
static RUN_ID_TEXT: Lazy<String> = Lazy::new(|| RUN_ID.to_string());

/// The process-level run ID (26 characters, Crockford base32).
pub fn get() -> &'static str {
    &RUN_ID_TEXT
}

/// When this process minted its run ID.
pub fn started_at() -> DateTime<Utc> {
    DateTime::<Utc>::from(RUN_ID.datetime())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStamp {
    pub match_run_id: String,
    pub matched_at: DateTime<Utc>,
}

impl RunStamp {
    pub fn now() -> Self {
        Self {
            match_run_id: get().to_string(),
            matched_at: Utc::now(),
        }
    }
}
