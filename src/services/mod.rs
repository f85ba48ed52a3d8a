//! External service module
//!
//! This module contains the task store collaborator: the trait the controller
//! talks to and its HTTP and in-memory implementations.

pub mod task_api;
pub mod http;
pub mod memory;

// Re-export main types
pub use task_api::TaskApi;
pub use http::HttpTaskApi;
pub use memory::MemoryTaskApi;
