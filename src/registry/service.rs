//! Tool registry and dispatcher
//!
//! A single namespace into which hand-written and schema-generated tools are
//! registered under explicit keys. The registry has two lifecycle phases:
//! Building (accepts registrations, only during startup) and Serving (accepts
//! only invocations). The transition is one-way; once serving, the mapping is
//! immutable and concurrent lookups need no synchronization.

use crate::error::{BridgeError, Result};
use crate::registry::types::{ToolDescriptor, ToolListing};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Registry lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryPhase {
    /// Accepting registrations (startup)
    Building,
    /// Accepting only invocations
    Serving,
}

/// Process-wide namespace of invocable tools
pub struct ToolRegistry {
    tools: HashMap<String, ToolDescriptor>,
    phase: RegistryPhase,
}

impl ToolRegistry {
    /// Create an empty registry in the Building phase
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            phase: RegistryPhase::Building,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> RegistryPhase {
        self.phase
    }

    /// Register a single tool descriptor.
    ///
    /// Fails with `NameCollision` if the name is already taken, and with a
    /// registry error once the Building phase is over.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<()> {
        self.ensure_building()?;

        if self.tools.contains_key(&descriptor.name) {
            return Err(BridgeError::name_collision(&descriptor.name));
        }

        debug!(
            "Registered tool '{}' (origin: {})",
            descriptor.name, descriptor.origin
        );
        self.tools.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Register a batch of descriptors atomically.
    ///
    /// The whole batch is checked against existing names and within itself
    /// before anything is inserted; on any collision nothing is registered,
    /// so the exposed namespace is always a complete, consistent snapshot.
    pub fn register_all(&mut self, descriptors: Vec<ToolDescriptor>) -> Result<()> {
        self.ensure_building()?;

        let mut batch_names = HashSet::new();
        for descriptor in &descriptors {
            if self.tools.contains_key(&descriptor.name) || !batch_names.insert(&descriptor.name) {
                return Err(BridgeError::name_collision(&descriptor.name));
            }
        }

        let count = descriptors.len();
        for descriptor in descriptors {
            debug!(
                "Registered tool '{}' (origin: {})",
                descriptor.name, descriptor.origin
            );
            self.tools.insert(descriptor.name.clone(), descriptor);
        }
        info!("Registered {} tools ({} total)", count, self.tools.len());
        Ok(())
    }

    /// Transition Building -> Serving.
    ///
    /// Called once by the entry point before the server starts accepting
    /// external requests. There is no transition back.
    pub fn begin_serving(&mut self) {
        if self.phase == RegistryPhase::Building {
            self.phase = RegistryPhase::Serving;
            info!("Tool registry serving {} tools", self.tools.len());
        }
    }

    /// Invoke a tool by name.
    ///
    /// Unknown names fail with `UnknownTool` and have no side effect; any
    /// error raised by the descriptor's invocation propagates unchanged, so
    /// callers need not distinguish hand-written from generated origin.
    pub async fn invoke(&self, name: &str, arguments: &Value) -> Result<Value> {
        let descriptor = self
            .tools
            .get(name)
            .ok_or_else(|| BridgeError::unknown_tool(name))?;
        descriptor.invoke(arguments).await
    }

    /// Look up a descriptor by name
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Check whether a tool name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all registered tools, sorted by name for stable output
    pub fn list_tools(&self) -> Vec<ToolListing> {
        let mut listings: Vec<ToolListing> =
            self.tools.values().map(ToolDescriptor::listing).collect();
        listings.sort_by(|a, b| a.name.cmp(&b.name));
        listings
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    fn ensure_building(&self) -> Result<()> {
        if self.phase != RegistryPhase::Building {
            return Err(BridgeError::registry(
                "Cannot register tools after the registry started serving",
            ));
        }
        Ok(())
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
