use log::info;

use super::ops::{self, MaskOptions, BIOMED_ACTION_SETS};
use crate::actions::biomedimage::LabelConnectivity;
use crate::client::Session;
use crate::error::Result;
use crate::masking::MaskOutcome;
use crate::table::{CasTable, ImageTable};

/// Biomedical image processing over one session.
///
/// Construction loads the `image`, `biomedimage` and `fedsql` action sets.
/// The session is not checked for liveness; a dead session surfaces as an
/// error from the first operation.
///
/// # Examples
///
/// ```rust,ignore
/// let session = RemoteSession::connect("127.0.0.1:5570").await?;
/// let mut biomed = BiomedImage::new(session).await?;
///
/// biomed
///     .quantify_sphericity(
///         &ImageTable::new("input"),
///         true,
///         0.0,
///         LabelConnectivity::Face,
///         &CasTable::new("output_sph"),
///     )
///     .await?;
/// ```
pub struct BiomedImage<S> {
    session: S,
}

impl<S: Session> BiomedImage<S> {
    pub async fn new(mut session: S) -> Result<Self> {
        for action_set in BIOMED_ACTION_SETS {
            session.load_action_set(action_set).await?;
        }
        info!("Loaded action sets: {}", BIOMED_ACTION_SETS.join(", "));
        Ok(Self { session })
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// Replace the session. No action sets are loaded on the new one.
    pub fn set_session(&mut self, session: S) {
        self.session = session;
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// See [`ops::quantify_sphericity`].
    pub async fn quantify_sphericity(
        &mut self,
        image_table: &ImageTable,
        use_spacing: bool,
        input_background: f64,
        label_connectivity: LabelConnectivity,
        sphericity_out: &CasTable,
    ) -> Result<()> {
        ops::quantify_sphericity(
            &mut self.session,
            image_table,
            use_spacing,
            input_background,
            label_connectivity,
            sphericity_out,
        )
        .await
    }

    /// See [`ops::mask_image`].
    pub async fn mask_image(
        &mut self,
        image: &ImageTable,
        mask: &ImageTable,
        casout: &CasTable,
        options: &MaskOptions,
    ) -> Result<MaskOutcome> {
        ops::mask_image(&mut self.session, image, mask, casout, options).await
    }

    /// See [`ops::morphological_gradient`].
    pub async fn morphological_gradient(
        &mut self,
        images: &ImageTable,
        kernel_width: u32,
        kernel_height: u32,
        copy_vars: Option<&[String]>,
        output: Option<CasTable>,
    ) -> Result<ImageTable> {
        ops::morphological_gradient(
            &mut self.session,
            images,
            kernel_width,
            kernel_height,
            copy_vars,
            output,
        )
        .await
    }
}
