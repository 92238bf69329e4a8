use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actions::table::row_count;
use crate::client::Session;
use crate::error::{CasError, Result};
use crate::table::ImageTable;

/// Kind of annotation a project collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnotationType {
    ObjectDetection,
    ImageClassification,
}

/// A label annotators can attach to an image region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationLabel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl AnnotationLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Login for the annotation server.
///
/// The password is never serialized; a saved project keeps only the token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// One batch of images handed to annotators, backed by a server-side table.
///
/// Images are addressed by frame number, `start_image_id..=end_image_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
    pub image_table_name: String,
    pub start_image_id: u64,
    pub end_image_id: u64,
}

impl Task {
    /// A task covering every row of `image_table`.
    pub async fn for_table<S: Session>(session: &mut S, image_table: &ImageTable) -> Result<Self> {
        let rows = row_count(session, &image_table.table).await?;
        if rows == 0 {
            return Err(CasError::EmptyTable(image_table.name().to_string()));
        }

        Ok(Self {
            task_id: None,
            image_table_name: image_table.name().to_string(),
            start_image_id: 0,
            end_image_id: rows - 1,
        })
    }

    pub fn image_count(&self) -> u64 {
        self.end_image_id - self.start_image_id + 1
    }

    pub fn image_table(&self) -> ImageTable {
        ImageTable::new(self.image_table_name.as_str())
    }
}

/// Name of a new annotation task created from session `session_id`.
pub fn task_name(session_id: &str) -> String {
    format!("CAS_{}_UUID_{}", session_id, Uuid::new_v4())
}

/// An annotation project: its labels and the tasks posted to it.
///
/// The project round-trips through JSON so it can be stored in a server-side
/// table and resumed later (see [`super::store`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    pub project_name: String,
    pub project_version: u32,
    #[serde(default)]
    pub credentials: Credentials,
    pub annotation_type: AnnotationType,
    #[serde(default)]
    pub labels: Vec<AnnotationLabel>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(project_name: impl Into<String>, annotation_type: AnnotationType) -> Self {
        Self {
            url: None,
            project_id: None,
            project_name: project_name.into(),
            project_version: 1,
            credentials: Credentials::default(),
            annotation_type,
            labels: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn with_labels(mut self, labels: Vec<AnnotationLabel>) -> Self {
        self.labels = labels;
        self
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
