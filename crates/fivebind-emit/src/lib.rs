//! Rust wrapper generation for the libfive standard library.
//!
//! Turns a descriptor table into `impl Tree` blocks whose methods marshal
//! their arguments and call straight into the native stdlib.
//!
//! ## Modules
//!
//! - [`translate`]: Per-argument parameter syntax and marshaling expressions
//! - [`emit`]: One complete wrapper per descriptor
//! - [`assemble`]: Banner, imports, and the per-module `impl` block
//! - [`convention`]: Receiver-style vs free-function-style wrappers
//! - [`naming`]: Rename table and keyword escaping
//! - [`banner`]: Provenance banner
//! - [`text`]: The hand-written text module

pub mod assemble;
pub mod banner;
pub mod convention;
pub mod emit;
pub mod error;
pub mod naming;
pub mod text;
pub mod translate;

// Re-export key types for convenience
pub use assemble::{assemble, assemble_table, AssembleOptions, AssembledUnit, ConventionPlan};
pub use banner::Provenance;
pub use convention::CallingConvention;
pub use emit::emit;
pub use error::EmitError;
pub use naming::NamingPolicy;
pub use text::text_unit;
pub use translate::translate;
