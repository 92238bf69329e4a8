//! # Masking Sequence
//!
//! Masking runs as a fixed sequence of server calls:
//! 1. Rename the mask table's image columns to short canonical names
//! 2. Join the renamed mask columns onto the image table into a temporary table
//! 3. Run the masking step over the temporary table
//! 4. Drop the temporary table
//!
//! Only after all four succeed is new mask metadata produced with the short
//! names. On any failure after step 1 the temporary table is still dropped
//! and the rename is reverted, so the server-side table and the caller's
//! metadata keep agreeing.

use log::{error, info, warn};
use serde_json::Value;

use crate::actions::fedsql::exec_direct;
use crate::actions::table::alter_table;
use crate::client::Session;
use crate::error::Result;
use crate::table::temp::drop_after;
use crate::table::{CasTable, ColumnRenames, ImageColumn, ImageTable};

/// Canonical short names given to the mask table's columns.
pub const MASK_IMAGE: &str = "seg";
pub const MASK_DIMENSION: &str = "dim";
pub const MASK_RESOLUTION: &str = "res";
pub const MASK_FORMAT: &str = "form";

/// Prefix of the temporary joined table.
pub const IMAGES_TO_MASK_PREFIX: &str = "_images_to_mask_";

const SHORT_NAMES: [(ImageColumn, &str); 4] = [
    (ImageColumn::Image, MASK_IMAGE),
    (ImageColumn::Dimension, MASK_DIMENSION),
    (ImageColumn::Resolution, MASK_RESOLUTION),
    (ImageColumn::ImageFormat, MASK_FORMAT),
];

/// Result of a masking call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskOutcome {
    /// The masked images
    pub output: ImageTable,
    /// The mask table's metadata, with column names matching the server after the rename
    pub mask: ImageTable,
}

/// Renames applied to `mask`: the image column always, plus dimension,
/// resolution and format when the mask holds decoded images.
pub fn mask_renames(mask: &ImageTable, decoded: bool) -> ColumnRenames {
    let targets = if decoded {
        &SHORT_NAMES[..]
    } else {
        &SHORT_NAMES[..1]
    };
    ColumnRenames::from_table(mask, targets)
}

/// Everything one masking call sends to the server.
pub(crate) struct MaskingPlan {
    pub renames: ColumnRenames,
    pub join_sql: String,
    pub temp: CasTable,
    pub action: &'static str,
    pub params: Value,
}

pub(crate) async fn run<S: Session>(
    session: &mut S,
    mask: &ImageTable,
    plan: MaskingPlan,
) -> Result<ImageTable> {
    alter_table(session, &mask.table, &plan.renames.directives()).await?;

    let outcome = join_and_process(session, &plan.join_sql, plan.action, plan.params).await;
    let outcome = drop_after(session, &plan.temp, outcome).await;

    match outcome {
        Ok(()) => {
            info!("Masking complete; mask {} now uses short column names", mask.table.name);
            Ok(plan.renames.apply(mask))
        }
        Err(e) => {
            warn!("Masking failed, restoring column names of {}", mask.table.name);
            if let Err(revert_err) =
                alter_table(session, &mask.table, &plan.renames.reverse_directives()).await
            {
                error!(
                    "Column names of {} left renamed on the server: {}",
                    mask.table.name, revert_err
                );
            }
            Err(e)
        }
    }
}

async fn join_and_process<S: Session>(
    session: &mut S,
    join_sql: &str,
    action: &str,
    params: Value,
) -> Result<()> {
    exec_direct(session, join_sql).await?;
    session.invoke(action, params).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_mask_renames_four_columns() {
        let renames = mask_renames(&ImageTable::new("masks"), true);

        let pairs: Vec<(String, String)> = renames
            .directives()
            .into_iter()
            .map(|d| (d.name, d.rename))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("image".to_string(), "seg".to_string()),
                ("dimension".to_string(), "dim".to_string()),
                ("resolution".to_string(), "res".to_string()),
                ("imageFormat".to_string(), "form".to_string()),
            ]
        );
    }

    #[test]
    fn test_encoded_mask_renames_image_only() {
        let renames = mask_renames(&ImageTable::new("masks"), false);

        assert_eq!(renames.len(), 1);
        assert_eq!(renames.target(ImageColumn::Image), Some(MASK_IMAGE));
    }
}
