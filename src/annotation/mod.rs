//! # Annotation Projects
//!
//! Bookkeeping for images sent out for annotation: a [`Project`] holds the
//! labels annotators may use and one [`Task`] per posted image table. Projects
//! serialize to JSON and can be saved to and resumed from server storage
//! through [`store`].

pub mod project;
pub mod store;

pub use project::{task_name, AnnotationLabel, AnnotationType, Credentials, Project, Task};
pub use store::{resume, save};
