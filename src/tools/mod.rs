//! Hand-written tools registered alongside the schema-generated ones

pub mod ncbi;
pub mod sparql;

pub use ncbi::NcbiSearchTool;
pub use sparql::{ExecuteSparqlTool, GetSparqlEndpointsTool};
