pub mod compression_service;
pub mod debounce;
pub mod error;
pub mod orchestrator;
pub mod session;
