use chrono::{SecondsFormat, Utc};
use tokio::io::{duplex, AsyncReadExt};
use tokio::sync::mpsc;

use crate::{ContentType, Handler, JsonHandler, ResourceAudit};

async fn emit_through_handler(indent: bool, records: Vec<ResourceAudit>) -> String {
    let (writer, mut reader) = duplex(64 * 1024);
    let handler = JsonHandler::new(writer, indent);

    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(async move { handler.handle(rx).await });

    for record in records {
        tx.send(record).await.expect("handler is consuming");
    }
    drop(tx);
    task.await.expect("handler task joins").expect("handler ok");

    let mut out = String::new();
    reader.read_to_string(&mut out).await.expect("read output");
    out
}

fn audit(id: &str) -> ResourceAudit {
    ResourceAudit {
        content_type: ContentType::Exchange,
        request_time: Utc::now(),
        record: serde_json::json!({"Id": id, "Operation": "UserLoggedIn"}),
    }
}

#[tokio::test]
async fn writes_one_enriched_json_document_per_line() {
    let first = audit("r1");
    let request_time = first.request_time;
    let out = emit_through_handler(false, vec![first, audit("r2")]).await;

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);

    let value: serde_json::Value = serde_json::from_str(lines[0]).expect("valid json line");
    assert_eq!(value["ContentType"], "Audit.Exchange");
    assert_eq!(value["Record"]["Id"], "r1");
    assert_eq!(
        value["RequestTime"],
        serde_json::json!(request_time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    );

    let value: serde_json::Value = serde_json::from_str(lines[1]).expect("valid json line");
    assert_eq!(value["Record"]["Id"], "r2");
}

#[tokio::test]
async fn indented_output_is_still_valid_json() {
    let out = emit_through_handler(true, vec![audit("r1")]).await;
    assert!(out.lines().count() > 1, "indented output spans lines");

    let value: serde_json::Value = serde_json::from_str(out.trim()).expect("valid json");
    assert_eq!(value["Record"]["Id"], "r1");
}

#[tokio::test]
async fn empty_stream_completes_cleanly() {
    let out = emit_through_handler(false, Vec::new()).await;
    assert!(out.is_empty());
}
