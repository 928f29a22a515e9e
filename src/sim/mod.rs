pub mod engine;
pub mod event;
