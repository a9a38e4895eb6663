//! Tool registry for managing and dispatching invocable operations

pub mod openapi_generator;
pub mod service;
pub mod types;

pub use openapi_generator::OpenApiToolGenerator;
pub use service::{RegistryPhase, ToolRegistry};
pub use types::{ToolDescriptor, ToolHandler, ToolListing, ToolOrigin};
