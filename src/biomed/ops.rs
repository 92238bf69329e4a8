//! Biomedical image operations, each taking the session explicitly.
//!
//! Every operation is a fixed sequence of server calls. Temporary tables get
//! call-scoped names and are dropped on every exit path.

use log::info;
use std::f64::consts::PI;

use crate::actions::biomedimage::{
    self, BinaryOperation, BinaryOperationType, Images, LabelConnectivity, ProcessRequest,
    QuantifyRequest, StepParameters,
};
use crate::actions::fedsql::{exec_direct, mask_join_query, sphericity_query, JoinKind};
use crate::actions::image::{
    process_images, FunctionOptions, FunctionType, ImageStep, MorphologyMethod,
    ProcessImagesRequest,
};
use crate::actions::ProcessOptions;
use crate::client::Session;
use crate::error::Result;
use crate::masking::{self, mask_renames, MaskOutcome, MaskingPlan, IMAGES_TO_MASK_PREFIX, MASK_IMAGE};
use crate::table::naming::scoped_name;
use crate::table::temp::drop_after;
use crate::table::{CasTable, ImageColumn, ImageTable};

/// Action sets every biomedical operation relies on.
pub const BIOMED_ACTION_SETS: [&str; 3] = ["image", "biomedimage", "fedsql"];

/// Prefix of the intermediate perimeter/content table.
pub const QUANTIFY_PREFIX: &str = "quantify_";

/// Copy variables the 2-D slices must carry to be reassembled into 3-D images.
pub const SLICE_VARS: [&str; 3] = ["_biomedid_", "_biomeddimension_", "_sliceindex_"];

/// Sphericity of a component with surface `perimeter` and volume `content`:
/// `(pi^(1/3) * (6 * content)^(2/3)) / perimeter`.
///
/// 1.0 for a perfect sphere, smaller for every other shape. `None` when
/// `perimeter` is zero.
pub fn sphericity(perimeter: f64, content: f64) -> Option<f64> {
    if perimeter == 0.0 {
        return None;
    }
    Some(PI.cbrt() * (6.0 * content).powf(2.0 / 3.0) / perimeter)
}

/// Options of a biomedical masking call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskOptions {
    /// Pixel intensity of the input image background
    pub input_background: i64,
    /// Pixel intensity written to the masked-out region
    pub output_background: i64,
    pub process: ProcessOptions,
}

/// Write the sphericity of every connected component of `image_table` to
/// `sphericity_out`, one row per component with columns path, `_perimeter_`,
/// `_content_` and `sphericity`.
pub async fn quantify_sphericity<S: Session>(
    session: &mut S,
    image_table: &ImageTable,
    use_spacing: bool,
    input_background: f64,
    label_connectivity: LabelConnectivity,
    sphericity_out: &CasTable,
) -> Result<()> {
    let quantify = CasTable::new(scoped_name(QUANTIFY_PREFIX));

    let outcome = quantify_then_derive(
        session,
        image_table,
        use_spacing,
        input_background,
        label_connectivity,
        &quantify,
        sphericity_out,
    )
    .await;

    drop_after(session, &quantify, outcome).await?;
    info!("Sphericity written to {}", sphericity_out.name);
    Ok(())
}

async fn quantify_then_derive<S: Session>(
    session: &mut S,
    image_table: &ImageTable,
    use_spacing: bool,
    input_background: f64,
    label_connectivity: LabelConnectivity,
    quantify: &CasTable,
    sphericity_out: &CasTable,
) -> Result<()> {
    let request = QuantifyRequest::perimeter_and_content(
        &image_table.table,
        &image_table.path,
        use_spacing,
        input_background,
        label_connectivity,
        quantify,
    );
    biomedimage::quantify(session, &request).await?;

    exec_direct(
        session,
        &sphericity_query(sphericity_out, quantify, &image_table.path),
    )
    .await
}

/// Mask the images of `image` with the matching images of `mask`, writing
/// the result to `casout`.
///
/// The mask table's columns are renamed on the server; the returned
/// [`MaskOutcome::mask`] describes it afterwards. `mask` itself is untouched.
pub async fn mask_image<S: Session>(
    session: &mut S,
    image: &ImageTable,
    mask: &ImageTable,
    casout: &CasTable,
    options: &MaskOptions,
) -> Result<MaskOutcome> {
    let decoded = mask.has_decoded_images(session).await?;
    let renames = mask_renames(mask, decoded);
    let temp = CasTable::new(scoped_name(IMAGES_TO_MASK_PREFIX));

    let binaryoperation = BinaryOperation {
        binaryoperationtype: BinaryOperationType::MaskSpecific,
        image: MASK_IMAGE.to_string(),
        dimension: renames.target(ImageColumn::Dimension).map(str::to_string),
        resolution: renames.target(ImageColumn::Resolution).map(str::to_string),
        imageformat: renames.target(ImageColumn::ImageFormat).map(str::to_string),
        output_background: options.output_background,
        input_background: options.input_background,
    };
    let params = serde_json::to_value(ProcessRequest {
        images: Images { table: &temp },
        steps: vec![StepParameters::BinaryOperation { binaryoperation }.into()],
        decode: Some(options.process.decode),
        addcolumns: options.process.add_columns.as_deref(),
        casout,
        copyvars: options.process.copy_vars.as_deref(),
    })?;

    let plan = MaskingPlan {
        join_sql: mask_join_query(&temp, mask, image, &renames, JoinKind::Inner),
        renames,
        temp,
        action: biomedimage::PROCESS,
        params,
    };

    let mask = masking::run(session, mask, plan).await?;
    Ok(MaskOutcome {
        output: ImageTable::new(casout.clone()),
        mask,
    })
}

/// Copy variables for the 2-D slices: the caller's list plus every
/// [`SLICE_VARS`] entry it lacks.
pub fn slice_copy_vars(copy_vars: Option<&[String]>) -> Vec<String> {
    let mut vars: Vec<String> = copy_vars.map(<[String]>::to_vec).unwrap_or_default();
    for var in SLICE_VARS {
        if !vars.iter().any(|v| v == var) {
            vars.push(var.to_string());
        }
    }
    vars
}

/// Morphological gradient of every 3-D grayscale image in `images`.
///
/// The images are exported to 2-D slices, the gradient is taken slice by
/// slice, and the slices are imported back to 3-D into `output` (a generated
/// table when `None`).
pub async fn morphological_gradient<S: Session>(
    session: &mut S,
    images: &ImageTable,
    kernel_width: u32,
    kernel_height: u32,
    copy_vars: Option<&[String]>,
    output: Option<CasTable>,
) -> Result<ImageTable> {
    let image_2d = CasTable::generated().replacing();
    let gradient_2d = CasTable::generated().replacing();
    let gradient_3d = output.unwrap_or_else(|| CasTable::generated().replacing());

    let outcome = gradient_steps(
        session,
        images,
        kernel_width,
        kernel_height,
        copy_vars,
        [&image_2d, &gradient_2d, &gradient_3d],
    )
    .await;
    let outcome = drop_after(session, &image_2d, outcome).await;
    drop_after(session, &gradient_2d, outcome).await?;

    info!("Morphological gradient of {} written to {}", images.name(), gradient_3d.name);
    Ok(ImageTable::new(gradient_3d))
}

async fn gradient_steps<S: Session>(
    session: &mut S,
    images: &ImageTable,
    kernel_width: u32,
    kernel_height: u32,
    copy_vars: Option<&[String]>,
    [image_2d, gradient_2d, gradient_3d]: [&CasTable; 3],
) -> Result<()> {
    biomedimage::process(
        session,
        &ProcessRequest {
            images: Images {
                table: &images.table,
            },
            steps: vec![StepParameters::Export.into()],
            decode: None,
            addcolumns: None,
            casout: image_2d,
            copyvars: copy_vars,
        },
    )
    .await?;

    let slice_vars = slice_copy_vars(copy_vars);
    process_images(
        session,
        &ProcessImagesRequest {
            table: &image_2d.as_input(),
            steps: vec![ImageStep::Function {
                options: FunctionOptions {
                    functiontype: FunctionType::Morphology,
                    method: MorphologyMethod::Gradient,
                    kernel_width,
                    kernel_height,
                },
            }],
            decode: None,
            add_columns: None,
            casout: gradient_2d,
            copy_vars: Some(&slice_vars),
        },
    )
    .await?;

    biomedimage::process(
        session,
        &ProcessRequest {
            images: Images {
                table: &gradient_2d.as_input(),
            },
            steps: vec![StepParameters::Import { targetdimension: 3 }.into()],
            decode: None,
            addcolumns: None,
            casout: gradient_3d,
            copyvars: copy_vars,
        },
    )
    .await
}
