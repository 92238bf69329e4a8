//! # Action Requests
//!
//! Typed parameter shapes for the server actions this crate calls. Each shape
//! serializes to exactly the parameter dictionary the server expects, so the
//! wire contract lives in one place.
//!
//! ## Modules
//!
//! - [`table`]: `table.dropTable`, `table.alterTable`, `table.columnInfo`
//! - [`fedsql`]: `fedSql.execDirect` and the statements built for it
//! - [`biomedimage`]: `biomedimage.quantifyBioMedImages`, `biomedimage.processBioMedImages`
//! - [`image`]: `image.processImages`

pub mod biomedimage;
pub mod fedsql;
pub mod image;
pub mod table;

use serde::Serialize;

/// Metadata columns an image-processing action can add to its output table.
///
/// Each action accepts its own subset; the server rejects the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetadataColumn {
    ChannelType,
    Dimension,
    Resolution,
    ImageFormat,
    Format,
    Position,
    Orientation,
    Spacing,
    Width,
    Height,
    Depth,
}

/// Output-side options shared by the image-processing actions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOptions {
    /// Decode the output images
    pub decode: bool,
    /// Metadata columns to add to the output table
    pub add_columns: Option<Vec<MetadataColumn>>,
    /// Columns copied from the input table to the output table
    pub copy_vars: Option<Vec<String>>,
}
