//! Tests for [`ya_disk::YaDiskClient`] against a mockito server standing in for the Disk REST API.

use bytes::Bytes;
use futures::{stream, StreamExt};
use loader_core::{ConflictKind, StorageError};
use mockito::Matcher;
use ya_disk::{RemoteStorage, YaDiskClient};

const TOKEN: &str = "test-token";

fn client(server: &mockito::ServerGuard) -> YaDiskClient {
    YaDiskClient::new(&server.url(), TOKEN).unwrap()
}

#[tokio::test]
async fn test_check_token_accepted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_header("authorization", "OAuth test-token")
        .with_status(200)
        .with_body(r#"{"total_space": 10}"#)
        .create_async()
        .await;

    assert!(client(&server).check_token(TOKEN).await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_check_token_rejected() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(401)
        .with_body(r#"{"error": "UnauthorizedError"}"#)
        .create_async()
        .await;

    assert!(!client(&server).check_token("stale").await.unwrap());
}

#[tokio::test]
async fn test_check_token_server_error_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/")
        .with_status(503)
        .with_body(r#"{"message": "maintenance"}"#)
        .create_async()
        .await;

    match client(&server).check_token(TOKEN).await.unwrap_err() {
        StorageError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let client = YaDiskClient::new("http://127.0.0.1:1", TOKEN).unwrap();
    let err = client.check_token(TOKEN).await.unwrap_err();
    assert!(matches!(err, StorageError::Transport(_)));
}

#[tokio::test]
async fn test_is_dir() {
    let mut server = mockito::Server::new_async().await;
    let _dir = server
        .mock("GET", "/resources")
        .match_query(Matcher::UrlEncoded("path".into(), "temp_folder".into()))
        .with_status(200)
        .with_body(r#"{"type": "dir", "name": "temp_folder"}"#)
        .create_async()
        .await;
    let _file = server
        .mock("GET", "/resources")
        .match_query(Matcher::UrlEncoded("path".into(), "pl.xlsx".into()))
        .with_status(200)
        .with_body(r#"{"type": "file", "name": "pl.xlsx"}"#)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/resources")
        .match_query(Matcher::UrlEncoded("path".into(), "nope".into()))
        .with_status(404)
        .create_async()
        .await;

    let client = client(&server);
    assert!(client.is_dir("temp_folder").await.unwrap());
    assert!(!client.is_dir("pl.xlsx").await.unwrap());
    assert!(!client.is_dir("nope").await.unwrap());
}

#[tokio::test]
async fn test_mkdir_treats_existing_directory_as_success() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/resources")
        .match_query(Matcher::UrlEncoded("path".into(), "temp_folder".into()))
        .with_status(409)
        .with_body(r#"{"error": "DiskPathPointsToExistentDirectoryError"}"#)
        .create_async()
        .await;

    client(&server).mkdir("temp_folder").await.unwrap();
}

#[tokio::test]
async fn test_request_upload_link_maps_conflicts() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("GET", "/resources/upload")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("path".into(), "temp_folder/a.xlsx".into()),
            Matcher::UrlEncoded("overwrite".into(), "false".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"href": "https://uploader.test/a", "method": "PUT"}"#)
        .create_async()
        .await;
    let _exists = server
        .mock("GET", "/resources/upload")
        .match_query(Matcher::UrlEncoded("path".into(), "temp_folder/b.xlsx".into()))
        .with_status(409)
        .with_body(r#"{"error": "DiskResourceAlreadyExistsError"}"#)
        .create_async()
        .await;
    let _locked = server
        .mock("GET", "/resources/upload")
        .match_query(Matcher::UrlEncoded("path".into(), "temp_folder/c.xlsx".into()))
        .with_status(423)
        .with_body(r#"{"error": "DiskResourceLockedError"}"#)
        .create_async()
        .await;

    let client = client(&server);
    assert_eq!(
        client.request_upload_link("temp_folder/a.xlsx").await.unwrap(),
        "https://uploader.test/a"
    );
    match client.request_upload_link("temp_folder/b.xlsx").await.unwrap_err() {
        StorageError::Conflict { kind, path } => {
            assert_eq!(kind, ConflictKind::PathExists);
            assert_eq!(path, "temp_folder/b.xlsx");
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
    match client.request_upload_link("temp_folder/c.xlsx").await.unwrap_err() {
        StorageError::Conflict { kind, .. } => assert_eq!(kind, ConflictKind::Locked),
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_by_link_streams_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/upload/target")
        .match_body("abcde")
        .with_status(201)
        .create_async()
        .await;

    let chunks = stream::iter(
        ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(|c| Ok(Bytes::from_static(c.as_bytes()))),
    )
    .boxed();
    let url = format!("{}/upload/target", server.url());

    client(&server).upload_by_link(chunks, &url).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_buffer_requests_link_then_puts_bytes() {
    let mut server = mockito::Server::new_async().await;
    let href = format!("{}/upload/pl", server.url());
    let link = server
        .mock("GET", "/resources/upload")
        .match_query(Matcher::UrlEncoded("path".into(), "temp_folder/pl.xlsx".into()))
        .with_status(200)
        .with_body(format!(r#"{{"href": "{href}", "method": "PUT"}}"#))
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/upload/pl")
        .match_body("payload")
        .with_status(201)
        .create_async()
        .await;

    client(&server)
        .upload_buffer(Bytes::from_static(b"payload"), "temp_folder/pl.xlsx")
        .await
        .unwrap();
    link.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn test_upload_to_locked_link_is_conflict() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/upload/busy")
        .with_status(423)
        .create_async()
        .await;
    let url = format!("{}/upload/busy", server.url());

    let err = client(&server)
        .upload_by_link(stream::empty().boxed(), &url)
        .await
        .unwrap_err();
    assert!(err.is_recoverable());
}
