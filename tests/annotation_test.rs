mod common;

use cas_biomed::annotation::{self, store::PROJECT_COLUMN};
use cas_biomed::{AnnotationLabel, AnnotationType, CasError, ImageTable, Project, Task};
use common::RecordingSession;
use serde_json::json;

const UPLOAD: &str = "table.upload";
const SAVE: &str = "table.save";
const LOAD: &str = "table.loadTable";
const FETCH: &str = "table.fetch";

fn project_with_tasks() -> Project {
    let mut project = Project::new("MyDemoProject", AnnotationType::ObjectDetection)
        .with_labels(vec![AnnotationLabel::new("Mountain").with_color("orange")]);
    for (table, end) in [("encoded_photos", 4), ("decoded_photos", 2)] {
        project.add_task(Task {
            task_id: None,
            image_table_name: table.to_string(),
            start_image_id: 0,
            end_image_id: end,
        });
    }
    project
}

#[tokio::test]
async fn test_task_from_table_info() {
    let mut session =
        RecordingSession::new().responding("table.tableInfo", json!({"TableInfo": [{"Rows": 7}]}));

    let task = Task::for_table(&mut session, &ImageTable::new("photos"))
        .await
        .unwrap();

    assert_eq!(task.end_image_id, 6);
    assert_eq!(task.image_table().name(), "photos");
}

#[tokio::test]
async fn test_save_uploads_project_then_saves_tables() {
    let mut session = RecordingSession::new();
    let project = project_with_tasks();

    annotation::save(&mut session, &project, "bigdata", "cvat_test", true)
        .await
        .unwrap();

    assert_eq!(session.actions(), vec![UPLOAD, SAVE, SAVE, SAVE]);

    let upload = session.only(UPLOAD);
    assert_eq!(
        upload.params["casOut"],
        json!({"name": "MyDemoProject", "replace": true})
    );
    assert_eq!(
        upload.params["importOptions"]["vars"],
        json!([{"name": PROJECT_COLUMN, "type": "VARCHAR"}])
    );
    assert!(upload.params["data"]
        .as_str()
        .unwrap()
        .starts_with("project_json\n"));

    let saves = session.calls_to(SAVE);
    assert_eq!(saves[0].params["table"], json!({"name": "MyDemoProject"}));
    assert_eq!(saves[0].params["name"], "cvat_test/MyDemoProject.sashdat");
    assert_eq!(saves[0].params["caslib"], "bigdata");
    assert_eq!(saves[0].params["replace"], true);
    assert_eq!(saves[1].params["name"], "cvat_test/encoded_photos.sashdat");
    assert_eq!(saves[2].params["name"], "cvat_test/decoded_photos.sashdat");
}

#[tokio::test]
async fn test_resume_restores_saved_project() {
    let saved = project_with_tasks();
    let mut session = RecordingSession::new().responding(
        FETCH,
        json!({"Fetch": [{ "project_json": saved.to_json().unwrap() }]}),
    );

    let project = annotation::resume(&mut session, "MyDemoProject", "bigdata", "cvat_test")
        .await
        .unwrap();

    assert_eq!(project, saved);
    assert_eq!(session.actions(), vec![LOAD, FETCH, LOAD, LOAD]);

    let loads = session.calls_to(LOAD);
    assert_eq!(loads[0].params["path"], "cvat_test/MyDemoProject.sashdat");
    assert_eq!(loads[0].params["caslib"], "bigdata");
    assert_eq!(loads[1].params["casOut"]["name"], "encoded_photos");
    assert_eq!(loads[2].params["path"], "cvat_test/decoded_photos.sashdat");
    assert_eq!(session.only(FETCH).params["to"], 1);
}

#[tokio::test]
async fn test_resume_without_project_row_fails() {
    let mut session = RecordingSession::new().responding(FETCH, json!({"Fetch": []}));

    let result = annotation::resume(&mut session, "MyDemoProject", "bigdata", "cvat_test").await;

    assert!(matches!(result, Err(CasError::UnexpectedResponse { .. })));
    assert_eq!(session.actions(), vec![LOAD, FETCH]);
}

#[tokio::test]
async fn test_failed_upload_saves_nothing() {
    let mut session = RecordingSession::new().failing(UPLOAD);

    let result =
        annotation::save(&mut session, &project_with_tasks(), "bigdata", "cvat_test", false).await;

    assert!(result.is_err());
    assert_eq!(session.actions(), vec![UPLOAD]);
}
