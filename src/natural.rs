//! # Natural Image Processing
//!
//! Masking of 2-D natural images through the `image` action set. Unlike the
//! biomedical variant, every image is kept: images without a matching mask
//! pass through the join with empty mask columns.

use log::info;

use crate::actions::fedsql::{mask_join_query, JoinKind};
use crate::actions::image::{
    BinaryOperation, BinaryOperationType, ImageStep, ProcessImagesRequest, StepSpec, PROCESS_IMAGES,
};
use crate::actions::ProcessOptions;
use crate::client::Session;
use crate::error::Result;
use crate::masking::{self, mask_renames, MaskOutcome, MaskingPlan, IMAGES_TO_MASK_PREFIX, MASK_IMAGE};
use crate::table::naming::scoped_name;
use crate::table::{CasTable, ImageColumn, ImageTable};

/// Action sets natural image operations rely on.
pub const NATURAL_ACTION_SETS: [&str; 2] = ["image", "fedsql"];

/// Natural image processing over one session.
pub struct NaturalImage<S> {
    session: S,
}

impl<S: Session> NaturalImage<S> {
    pub async fn new(mut session: S) -> Result<Self> {
        for action_set in NATURAL_ACTION_SETS {
            session.load_action_set(action_set).await?;
        }
        Ok(Self { session })
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// See [`mask_image`].
    pub async fn mask_image(
        &mut self,
        image: &ImageTable,
        mask: &ImageTable,
        options: &ProcessOptions,
        output: Option<CasTable>,
    ) -> Result<MaskOutcome> {
        mask_image(&mut self.session, image, mask, options, output).await
    }
}

/// Mask the images of `image` with the matching images of `mask`.
///
/// The result goes to `output`, or to a generated table when `None`. The
/// returned [`MaskOutcome::mask`] carries the mask table's renamed columns.
pub async fn mask_image<S: Session>(
    session: &mut S,
    image: &ImageTable,
    mask: &ImageTable,
    options: &ProcessOptions,
    output: Option<CasTable>,
) -> Result<MaskOutcome> {
    let casout = output.unwrap_or_else(CasTable::generated);
    let decoded = mask.has_decoded_images(session).await?;
    let renames = mask_renames(mask, decoded);
    let temp = CasTable::new(scoped_name(IMAGES_TO_MASK_PREFIX)).replacing();

    let step = ImageStep::Step {
        step: StepSpec::BinaryOperation {
            binary_operation: BinaryOperation {
                binary_operation_type: BinaryOperationType::MaskSpecific,
                image: MASK_IMAGE.to_string(),
                dimension: renames.target(ImageColumn::Dimension).map(str::to_string),
                resolution: renames.target(ImageColumn::Resolution).map(str::to_string),
                image_format: renames.target(ImageColumn::ImageFormat).map(str::to_string),
            },
        },
    };
    let params = serde_json::to_value(ProcessImagesRequest {
        table: &temp.as_input(),
        steps: vec![step],
        decode: Some(options.decode),
        add_columns: options.add_columns.as_deref(),
        casout: &casout,
        copy_vars: options.copy_vars.as_deref(),
    })?;

    let plan = MaskingPlan {
        join_sql: mask_join_query(&temp, mask, image, &renames, JoinKind::Right),
        renames,
        temp,
        action: PROCESS_IMAGES,
        params,
    };

    let mask = masking::run(session, mask, plan).await?;
    info!("Masked images of {} written to {}", image.name(), casout.name);
    Ok(MaskOutcome {
        output: ImageTable::new(casout),
        mask,
    })
}
