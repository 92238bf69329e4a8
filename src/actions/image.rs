//! Actions of the `image` action set.

use log::info;
use serde::Serialize;

use super::MetadataColumn;
use crate::client::Session;
use crate::error::Result;
use crate::table::CasTable;

pub const PROCESS_IMAGES: &str = "image.processImages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinaryOperationType {
    MaskSpecific,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryOperation {
    pub binary_operation_type: BinaryOperationType,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_format: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stepType")]
pub enum StepSpec {
    #[serde(rename = "BINARY_OPERATION")]
    BinaryOperation {
        #[serde(rename = "binaryOperation")]
        binary_operation: BinaryOperation,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FunctionType {
    Morphology,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MorphologyMethod {
    Gradient,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionOptions {
    pub functiontype: FunctionType,
    pub method: MorphologyMethod,
    #[serde(rename = "kernelWidth")]
    pub kernel_width: u32,
    #[serde(rename = "kernelHeight")]
    pub kernel_height: u32,
}

/// One entry of the `steps` list: a typed step or a function step.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ImageStep {
    Step { step: StepSpec },
    Function { options: FunctionOptions },
}

/// Parameters of `image.processImages`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessImagesRequest<'a> {
    pub table: &'a CasTable,
    pub steps: Vec<ImageStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_columns: Option<&'a [MetadataColumn]>,
    pub casout: &'a CasTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_vars: Option<&'a [String]>,
}

pub async fn process_images<S: Session>(
    session: &mut S,
    request: &ProcessImagesRequest<'_>,
) -> Result<()> {
    session
        .invoke(PROCESS_IMAGES, serde_json::to_value(request)?)
        .await?;
    info!("Processed {} into {}", request.table.name, request.casout.name);
    Ok(())
}
