//! # Biomedical Image Processing
//!
//! ## Wrapper ([`biomed_image`])
//! [`BiomedImage`] owns a session, loads the action sets it needs once, and
//! exposes the operations as methods.
//!
//! ## Operations ([`ops`])
//! The same operations as free functions taking `&mut impl Session`, for
//! callers that manage the session themselves:
//! - Sphericity of connected components
//! - Masking with a mask image table
//! - Morphological gradient of 3-D grayscale images

pub mod biomed_image;
pub mod ops;

pub use biomed_image::BiomedImage;
pub use ops::{sphericity, MaskOptions};
