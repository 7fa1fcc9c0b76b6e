pub mod health;
pub mod matching;
