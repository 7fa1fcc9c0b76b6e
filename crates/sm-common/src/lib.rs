pub mod api;
pub mod config;
pub mod logging;
pub mod matching;
pub mod run_id;
pub mod skill_normalizer;

pub use config::MatchConfig;
