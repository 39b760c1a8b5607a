pub mod adaptors;
pub mod ai;
pub mod auth;
pub mod errors;
pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod storage;
