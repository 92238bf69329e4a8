//! Actions of the `biomedimage` action set.

use log::info;
use serde::Serialize;

use super::MetadataColumn;
use crate::client::Session;
use crate::error::Result;
use crate::table::CasTable;

pub const QUANTIFY: &str = "biomedimage.quantifyBioMedImages";
pub const PROCESS: &str = "biomedimage.processBioMedImages";

/// Adjacency rule for connected components.
///
/// `Face` joins voxels sharing a face; `Vertex` also joins voxels that only
/// touch at an edge or corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LabelConnectivity {
    Face,
    Vertex,
}

/// The `images` parameter.
#[derive(Debug, Serialize)]
pub struct Images<'a> {
    pub table: &'a CasTable,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Component,
}

#[derive(Debug, Clone, Serialize)]
pub struct Quantity {
    pub quantityparameters: QuantityParameters,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "quantitytype", rename_all = "lowercase")]
pub enum QuantityParameters {
    Perimeter,
    Content {
        #[serde(rename = "useSpacing")]
        use_spacing: bool,
    },
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelType {
    Basic,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabelParameters {
    #[serde(rename = "labelType")]
    pub label_type: LabelType,
    pub connectivity: LabelConnectivity,
}

/// Parameters of `biomedimage.quantifyBioMedImages`.
#[derive(Debug, Serialize)]
pub struct QuantifyRequest<'a> {
    pub images: Images<'a>,
    pub copyvars: Vec<&'a str>,
    pub region: Region,
    pub quantities: Vec<Quantity>,
    pub labelparameters: LabelParameters,
    pub inputbackground: f64,
    pub casout: &'a CasTable,
}

impl<'a> QuantifyRequest<'a> {
    /// Perimeter and content of every connected component in `images`.
    pub fn perimeter_and_content(
        images: &'a CasTable,
        path_column: &'a str,
        use_spacing: bool,
        input_background: f64,
        connectivity: LabelConnectivity,
        casout: &'a CasTable,
    ) -> Self {
        Self {
            images: Images { table: images },
            copyvars: vec![path_column],
            region: Region::Component,
            quantities: vec![
                Quantity {
                    quantityparameters: QuantityParameters::Perimeter,
                },
                Quantity {
                    quantityparameters: QuantityParameters::Content { use_spacing },
                },
            ],
            labelparameters: LabelParameters {
                label_type: LabelType::Basic,
                connectivity,
            },
            inputbackground: input_background,
            casout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperationType {
    MaskSpecific,
}

/// The `binaryoperation` of a `binary_operation` step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryOperation {
    pub binaryoperationtype: BinaryOperationType,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imageformat: Option<String>,
    #[serde(rename = "outputBackground")]
    pub output_background: i64,
    #[serde(rename = "inputBackground")]
    pub input_background: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "steptype")]
pub enum StepParameters {
    #[serde(rename = "binary_operation")]
    BinaryOperation { binaryoperation: BinaryOperation },
    /// 3-D images to 2-D slices
    #[serde(rename = "export")]
    Export,
    /// 2-D slices back to images of `targetdimension` dimensions
    #[serde(rename = "import")]
    Import { targetdimension: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub stepparameters: StepParameters,
}

impl From<StepParameters> for Step {
    fn from(stepparameters: StepParameters) -> Self {
        Self { stepparameters }
    }
}

/// Parameters of `biomedimage.processBioMedImages`.
#[derive(Debug, Serialize)]
pub struct ProcessRequest<'a> {
    pub images: Images<'a>,
    pub steps: Vec<Step>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addcolumns: Option<&'a [MetadataColumn]>,
    pub casout: &'a CasTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyvars: Option<&'a [String]>,
}

pub async fn quantify<S: Session>(session: &mut S, request: &QuantifyRequest<'_>) -> Result<()> {
    session
        .invoke(QUANTIFY, serde_json::to_value(request)?)
        .await?;
    info!(
        "Quantified components of {} into {}",
        request.images.table.name, request.casout.name
    );
    Ok(())
}

pub async fn process<S: Session>(session: &mut S, request: &ProcessRequest<'_>) -> Result<()> {
    session.invoke(PROCESS, serde_json::to_value(request)?).await?;
    info!(
        "Processed {} into {} ({} step(s))",
        request.images.table.name,
        request.casout.name,
        request.steps.len()
    );
    Ok(())
}
