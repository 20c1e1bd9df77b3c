//! Dispatch handlers

mod dispatch;

pub use dispatch::DispatchHandler;
