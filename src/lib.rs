//! TypeDoc to Zig
//!
//! Lowers the TypeDoc reflection of a TypeScript type library (and a
//! protocol built on it) into Zig declarations.
//!
//! ## Features
//!
//! - **Union Lowering**: literal unions become enums, nullable unions become
//!   optionals, everything else becomes a tagged union
//! - **Intersection Flattening**: composed interfaces are inlined field by field
//! - **Cross-Document Dedup**: each name is emitted once per run
//! - **Drift Checking**: compare generated output against the checked-in file
//!
//! ## Pipeline
//!
//! ```text
//! types.json ─┐
//!             ├─> SchemaSet ─> Walker ─> Emitter (types, protocol) ─> types.zig ─> zig fmt
//! protocol.json ┘
//! ```

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;
pub mod output;
pub mod schema;
pub mod walker;

pub use checksum::Checksum;
pub use codegen::{EmittedNames, Emitter, ExclusionFilter};
pub use config::GenConfig;
pub use error::{GenError, Result};
pub use schema::{Declaration, Resolver, SchemaDocument, SchemaHandle, SchemaSet, TypeNode};
pub use walker::{generate, GeneratedOutput, Walker};
