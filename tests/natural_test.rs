mod common;

use cas_biomed::{CasError, CasTable, ImageTable, NaturalImage, ProcessOptions};
use common::{RecordingSession, DECODED_COLUMNS, ENCODED_COLUMNS};
use serde_json::json;

#[tokio::test]
async fn test_construction_loads_image_and_fedsql() {
    let images = NaturalImage::new(RecordingSession::new()).await.unwrap();
    let session = images.into_session();

    let sets: Vec<&str> = session
        .calls
        .iter()
        .filter_map(|c| c.params["actionSet"].as_str())
        .collect();
    assert_eq!(sets, vec!["image", "fedsql"]);
}

#[tokio::test]
async fn test_natural_mask_keeps_unmatched_images() {
    let mut images = NaturalImage::new(RecordingSession::new().with_columns(&DECODED_COLUMNS))
        .await
        .unwrap();
    images.session_mut().clear();

    let outcome = images
        .mask_image(
            &ImageTable::new("photos"),
            &ImageTable::new("masks"),
            &ProcessOptions::default(),
            None,
        )
        .await
        .unwrap();

    let session = images.into_session();
    assert_eq!(
        session.actions(),
        vec![
            "table.columnInfo",
            "table.alterTable",
            "fedSql.execDirect",
            "image.processImages",
            "table.dropTable"
        ]
    );

    let query = session.only("fedSql.execDirect").params["query"]
        .as_str()
        .unwrap();
    assert!(query.contains("{options replace=true}"));
    assert!(query.contains("from masks as a right join photos as b on a._id_=b._id_"));

    let process = session.only("image.processImages");
    let temp = session.only("table.dropTable").params["name"].as_str().unwrap();
    assert_eq!(process.params["table"], json!({ "name": temp }));
    assert_eq!(
        process.params["steps"],
        json!([{"step": {
            "stepType": "BINARY_OPERATION",
            "binaryOperation": {
                "binaryOperationType": "MASK_SPECIFIC",
                "image": "seg",
                "dimension": "dim",
                "resolution": "res",
                "imageFormat": "form"
            }
        }}])
    );

    let output = process.params["casout"]["name"].as_str().unwrap();
    assert!(output.starts_with("_biomed_"));
    assert_eq!(outcome.output.name(), output);
    assert_eq!(outcome.mask.image_format, "form");
}

#[tokio::test]
async fn test_natural_mask_honours_output_table() {
    let mut images = NaturalImage::new(RecordingSession::new().with_columns(&ENCODED_COLUMNS))
        .await
        .unwrap();
    images.session_mut().clear();

    let options = ProcessOptions {
        decode: true,
        add_columns: None,
        copy_vars: Some(vec!["_label_".to_string()]),
    };
    let outcome = images
        .mask_image(
            &ImageTable::new("photos"),
            &ImageTable::new("masks"),
            &options,
            Some(CasTable::new("masked").replacing()),
        )
        .await
        .unwrap();

    let session = images.into_session();
    let process = session.only("image.processImages");
    assert_eq!(
        process.params["casout"],
        json!({"name": "masked", "replace": true})
    );
    assert_eq!(process.params["decode"], true);
    assert_eq!(process.params["copyVars"], json!(["_label_"]));
    assert_eq!(
        process.params["steps"][0]["step"]["binaryOperation"],
        json!({"binaryOperationType": "MASK_SPECIFIC", "image": "seg"})
    );
    assert_eq!(outcome.output.name(), "masked");
    assert_eq!(outcome.mask.image, "seg");
}

#[tokio::test]
async fn test_natural_mask_failed_join_restores_names() {
    let mut images = NaturalImage::new(
        RecordingSession::new()
            .with_columns(&ENCODED_COLUMNS)
            .failing("fedSql.execDirect"),
    )
    .await
    .unwrap();
    images.session_mut().clear();

    let result = images
        .mask_image(
            &ImageTable::new("photos"),
            &ImageTable::new("masks"),
            &ProcessOptions::default(),
            Some(CasTable::new("masked")),
        )
        .await;

    match result {
        Err(CasError::Remote { action, .. }) => assert_eq!(action, "fedSql.execDirect"),
        other => panic!("expected join failure, got {:?}", other),
    }

    let session = images.into_session();
    assert_eq!(
        session.actions(),
        vec![
            "table.columnInfo",
            "table.alterTable",
            "fedSql.execDirect",
            "table.dropTable",
            "table.alterTable"
        ]
    );
    assert_eq!(
        session.calls_to("table.alterTable")[1].params["columns"],
        json!([{"name": "seg", "rename": "image"}])
    );
}
