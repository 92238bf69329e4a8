//! Saving annotation projects to server storage and resuming them.
//!
//! A project is stored as a one-row table with a single `project_json`
//! column, saved as `<relative_path>/<project_name>.sashdat`. Each task's
//! image table is saved next to it under its own name.

use csv::Writer;
use log::info;
use std::io;

use super::project::Project;
use crate::actions::table::{fetch_rows, load_table, save_table, upload_csv, FETCH};
use crate::client::Session;
use crate::error::{CasError, Result};
use crate::table::CasTable;

/// Column of the project table holding the serialized project.
pub const PROJECT_COLUMN: &str = "project_json";

fn sashdat_path(relative_path: &str, table_name: &str) -> String {
    format!("{}/{}.sashdat", relative_path, table_name)
}

/// CSV text with a `project_json` header and one row holding `json`.
fn project_csv(json: &str) -> Result<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([PROJECT_COLUMN])?;
    writer.write_record([json])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| io::Error::new(e.error().kind(), e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Save `project` and the image tables of its tasks under `caslib`.
///
/// The project table is uploaded under the project's name, replacing any
/// loaded table of that name. `replace` governs only the saved files.
pub async fn save<S: Session>(
    session: &mut S,
    project: &Project,
    caslib: &str,
    relative_path: &str,
    replace: bool,
) -> Result<()> {
    let project_table = CasTable::new(project.project_name.as_str()).replacing();
    let data = project_csv(&project.to_json()?)?;
    upload_csv(session, &project_table, &[PROJECT_COLUMN], &data).await?;

    save_table(
        session,
        &project_table,
        caslib,
        &sashdat_path(relative_path, &project.project_name),
        replace,
    )
    .await?;

    for task in project.tasks() {
        save_table(
            session,
            &task.image_table().table,
            caslib,
            &sashdat_path(relative_path, &task.image_table_name),
            replace,
        )
        .await?;
    }

    info!(
        "Saved project {} with {} task(s) to {}:{}",
        project.project_name,
        project.tasks().len(),
        caslib,
        relative_path
    );
    Ok(())
}

/// Load a project saved by [`save`] and reload the image tables of its tasks.
pub async fn resume<S: Session>(
    session: &mut S,
    project_name: &str,
    caslib: &str,
    relative_path: &str,
) -> Result<Project> {
    let project_table = CasTable::new(project_name).replacing();
    load_table(
        session,
        caslib,
        &sashdat_path(relative_path, project_name),
        &project_table,
    )
    .await?;

    let rows = fetch_rows(session, &project_table, 1).await?;
    let json = rows
        .first()
        .and_then(|row| row.get(PROJECT_COLUMN))
        .and_then(|value| value.as_str())
        .ok_or_else(|| CasError::UnexpectedResponse {
            action: FETCH.to_string(),
            detail: format!("no {} in project table {}", PROJECT_COLUMN, project_name),
        })?;
    let project = Project::from_json(json)?;

    for task in project.tasks() {
        load_table(
            session,
            caslib,
            &sashdat_path(relative_path, &task.image_table_name),
            &CasTable::new(task.image_table_name.as_str()).replacing(),
        )
        .await?;
    }

    info!(
        "Resumed project {} with {} task(s)",
        project.project_name,
        project.tasks().len()
    );
    Ok(project)
}
