use log::debug;

use super::cas_table::CasTable;
use crate::actions::table::column_names;
use crate::client::Session;
use crate::error::Result;

/// A server-side table of images plus the names of its well-known columns.
///
/// Only metadata lives here; the pixels stay on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTable {
    pub table: CasTable,
    /// Column holding image binaries
    pub image: String,
    /// Column holding image dimensions
    pub dimension: String,
    /// Column holding image resolutions
    pub resolution: String,
    /// Column holding the format of the image binaries
    pub image_format: String,
    /// Column holding source file paths
    pub path: String,
    /// Column holding image labels
    pub label: String,
    /// Column identifying each image
    pub id: String,
    /// Column holding the byte length of each image binary
    pub size: String,
    /// Column holding the image type
    pub image_type: String,
}

impl ImageTable {
    /// Wrap `table` using the server's default column names.
    pub fn new(table: impl Into<CasTable>) -> Self {
        Self {
            table: table.into(),
            image: "image".to_string(),
            dimension: "dimension".to_string(),
            resolution: "resolution".to_string(),
            image_format: "imageFormat".to_string(),
            path: "_path_".to_string(),
            label: "_label_".to_string(),
            id: "_id_".to_string(),
            size: "_size_".to_string(),
            image_type: "_type_".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.table.name
    }

    /// Whether the table holds decoded images.
    ///
    /// Decoded tables expose the dimension, resolution and format of each
    /// image in their own columns; encoded tables carry only the blob. The
    /// check asks the server for the table's columns.
    pub async fn has_decoded_images<S: Session>(&self, session: &mut S) -> Result<bool> {
        let columns = column_names(session, &self.table).await?;
        let present = |wanted: &str| columns.iter().any(|c| c.eq_ignore_ascii_case(wanted));

        let decoded =
            present(&self.dimension) && present(&self.resolution) && present(&self.image_format);
        debug!(
            "Table {} holds {} images",
            self.table.name,
            if decoded { "decoded" } else { "encoded" }
        );
        Ok(decoded)
    }
}

impl From<CasTable> for ImageTable {
    fn from(table: CasTable) -> Self {
        Self::new(table)
    }
}
