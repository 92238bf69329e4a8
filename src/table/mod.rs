//! # Table Metadata
//!
//! Client-side descriptions of server-side tables.
//!
//! ## Modules
//!
//! - [`cas_table`]: Plain table references (name, caslib, replace flag)
//! - [`image_table`]: Image tables and the names of their well-known columns
//! - [`renames`]: Column renames shared by the server call and the metadata
//! - [`naming`]: Unique names for generated and temporary tables
//! - [`temp`]: Dropping tables, including on failure paths

pub mod cas_table;
pub mod image_table;
pub mod naming;
pub mod renames;
pub mod temp;

pub use cas_table::CasTable;
pub use image_table::ImageTable;
pub use renames::{ColumnDirective, ColumnRenames, ImageColumn};
