//! Repository implementations

mod json_log;

pub use json_log::JsonLogRepository;
