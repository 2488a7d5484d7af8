//! Descriptor model and descriptor sources for fivebind.
//!
//! ## Modules
//!
//! - [`descriptor`]: Arguments, function descriptors, modules, and the table
//! - [`header`]: Parser for the `LIBFIVE_SECTION` / `LIBFIVE_STDLIB` header dialect
//! - [`table`]: Explicit TOML descriptor tables

pub mod descriptor;
pub mod error;
pub mod header;
pub mod table;

pub use descriptor::{ArgKind, Argument, DescriptorTable, FunctionDescriptor, Module};
pub use error::CoreError;
pub use header::{load_header, parse_header};
pub use table::TableFile;

/// Linkage prefix used by the libfive stdlib.
pub const DEFAULT_SYMBOL_PREFIX: &str = "libfivestd_";
