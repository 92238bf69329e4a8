pub mod actions;
pub mod annotation;
pub mod biomed;
pub mod client;
pub mod common;
pub mod error;
pub mod logging;
pub mod masking;
pub mod natural;
pub mod table;

pub use actions::biomedimage::LabelConnectivity;
pub use actions::{MetadataColumn, ProcessOptions};
pub use annotation::{AnnotationLabel, AnnotationType, Project, Task};
pub use biomed::{BiomedImage, MaskOptions};
pub use client::{ActionMetrics, RemoteSession, Session};
pub use error::{CasError, Result};
pub use masking::MaskOutcome;
pub use natural::NaturalImage;
pub use table::{CasTable, ImageTable};
