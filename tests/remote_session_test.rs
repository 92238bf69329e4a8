use std::sync::{Arc, Mutex};

use cas_biomed::common::connection::Connection;
use cas_biomed::common::messages::{Message, STATUS_OK};
use cas_biomed::{
    ActionMetrics, BiomedImage, CasTable, ImageTable, LabelConnectivity, MaskOptions,
    RemoteSession,
};
use serde_json::{json, Value};
use tokio::io::DuplexStream;

/// Minimal compute server: records each action and answers it successfully.
/// Tables it is asked about hold decoded images.
async fn fake_server(stream: DuplexStream) -> Vec<(String, Value)> {
    let mut conn = Connection::new(stream);
    let mut seen = Vec::new();

    while let Ok(Some(Message::Action {
        request_id,
        action,
        params,
    })) = conn.read_message().await
    {
        let result = if action == "table.columnInfo" {
            json!({"ColumnInfo": [
                {"Column": "image"},
                {"Column": "dimension"},
                {"Column": "resolution"},
                {"Column": "imageFormat"},
                {"Column": "_id_"}
            ]})
        } else {
            json!({})
        };
        seen.push((action, params));

        let reply = Message::ActionResult {
            request_id,
            status: STATUS_OK,
            result,
            error: None,
        };
        if conn.write_message(&reply).await.is_err() {
            break;
        }
    }

    seen
}

#[tokio::test]
async fn test_biomed_operations_over_the_wire() {
    let (client, server) = tokio::io::duplex(64 * 1024);
    let server = tokio::spawn(fake_server(server));

    let metrics = Arc::new(Mutex::new(ActionMetrics::new("wire".to_string())));
    let session = RemoteSession::new(client).with_metrics(metrics.clone());
    let mut biomed = BiomedImage::new(session).await.unwrap();

    biomed
        .quantify_sphericity(
            &ImageTable::new("lesions"),
            true,
            0.0,
            LabelConnectivity::Face,
            &CasTable::new("lesion_sph"),
        )
        .await
        .unwrap();

    let outcome = biomed
        .mask_image(
            &ImageTable::new("scans"),
            &ImageTable::new("segmentations"),
            &CasTable::new("masked"),
            &MaskOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(outcome.mask.image, "seg");

    biomed.into_session().close().await.unwrap();
    let seen = server.await.unwrap();

    let actions: Vec<&str> = seen.iter().map(|(a, _)| a.as_str()).collect();
    assert_eq!(
        actions,
        vec![
            "builtins.loadActionSet",
            "builtins.loadActionSet",
            "builtins.loadActionSet",
            "biomedimage.quantifyBioMedImages",
            "fedSql.execDirect",
            "table.dropTable",
            "table.columnInfo",
            "table.alterTable",
            "fedSql.execDirect",
            "biomedimage.processBioMedImages",
            "table.dropTable",
        ]
    );
    assert_eq!(seen[7].1["columns"].as_array().map(Vec::len), Some(4));

    let stats = metrics.lock().unwrap().aggregate();
    assert_eq!(stats.total_actions, 11);
    assert_eq!(stats.failed_actions, 0);
    assert_eq!(stats.calls_per_action.get("table.dropTable"), Some(&2));
}
