use super::*;
use crate::credentials::CredentialForm;
use mockito::Matcher;
use serde_json::json;

fn credentials(folder: &str) -> Credentials {
    CredentialForm::new("ghp_test", "octocat", "pictures", folder)
        .validate()
        .unwrap()
}

fn client_for(server: &mockito::ServerGuard) -> ContentsClient {
    ContentsClient::with_config(ClientConfig::new().with_api_url(server.url())).unwrap()
}

fn file_entry(name: &str, size: u64) -> serde_json::Value {
    json!({
        "name": name,
        "path": format!("images/{}", name),
        "type": "file",
        "size": size,
        "sha": format!("sha-{}", name),
        "download_url": format!("https://raw.example.com/images/{}", name),
    })
}

fn dir_entry(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "path": format!("images/{}", name),
        "type": "dir",
        "size": 0,
        "sha": format!("sha-{}", name),
        "download_url": null,
    })
}

// Configuration

#[test]
fn test_client_config_default() {
    let config = ClientConfig::new();
    assert_eq!(config.api_url, "https://api.github.com");
    assert_eq!(config.timeout_seconds, None);
    assert_eq!(config.max_idle_per_host, 10);
    assert!(config.user_agent.starts_with("repix/"));
}

#[test]
fn test_client_config_builder_chaining() {
    let config = ClientConfig::new()
        .with_timeout(120)
        .with_max_idle_per_host(50)
        .with_user_agent("tests");
    assert_eq!(config.timeout_seconds, Some(120));
    assert_eq!(config.max_idle_per_host, 50);
    assert_eq!(config.user_agent, "tests");
}

#[test]
fn test_client_rejects_invalid_api_url() {
    let result = ContentsClient::with_config(ClientConfig::new().with_api_url("not a url"));
    assert!(matches!(result, Err(RepixError::Config { .. })));
}

#[test]
fn test_contents_url_with_folder() {
    let client = ContentsClient::new().unwrap();
    let url = client
        .contents_url(&credentials("images"), "images/cat.png")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.github.com/repos/octocat/pictures/contents/images/cat.png"
    );
}

#[test]
fn test_contents_url_for_root() {
    let client = ContentsClient::new().unwrap();
    let url = client.contents_url(&credentials(""), "").unwrap();
    assert_eq!(
        url.as_str(),
        "https://api.github.com/repos/octocat/pictures/contents"
    );
}

#[test]
fn test_contents_url_keeps_api_prefix_and_encodes() {
    let client = ContentsClient::with_config(
        ClientConfig::new().with_api_url("https://ghe.example.com/api/v3/"),
    )
    .unwrap();
    let url = client
        .contents_url(&credentials(""), "my pics/cat 1.png")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://ghe.example.com/api/v3/repos/octocat/pictures/contents/my%20pics/cat%201.png"
    );
}

// Request bodies

#[test]
fn test_write_request_omits_missing_sha() {
    let body = WriteRequest {
        message: "Add cat.png".to_string(),
        content: "AAAA".to_string(),
        sha: None,
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        json!({"message": "Add cat.png", "content": "AAAA"})
    );
}

#[test]
fn test_write_request_includes_sha() {
    let body = WriteRequest {
        message: "Update cat.png".to_string(),
        content: "AAAA".to_string(),
        sha: Some("abc123".to_string()),
    };
    assert_eq!(serde_json::to_value(&body).unwrap()["sha"], "abc123");
}

#[test]
fn test_entry_kind_unknown_type() {
    let kind: EntryKind = serde_json::from_str("\"mystery\"").unwrap();
    assert_eq!(kind, EntryKind::Unknown);
}

// Listing

#[tokio::test]
async fn test_list_directory_keeps_only_files() {
    let mut server = mockito::Server::new_async().await;
    let body = json!([
        file_entry("cat.png", 2048),
        dir_entry("thumbs"),
        file_entry("dog.jpg", 512),
        dir_entry("old"),
        dir_entry("raw"),
    ]);
    let mock = server
        .mock("GET", "/repos/octocat/pictures/contents/images")
        .match_header("authorization", "Bearer ghp_test")
        .match_header("accept", GITHUB_MEDIA_TYPE)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let files = client_for(&server)
        .list_directory(&credentials("images/"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].name, "cat.png");
    assert_eq!(files[0].size, 2048);
    assert_eq!(files[0].sha, "sha-cat.png");
    assert_eq!(files[1].name, "dog.jpg");
}

#[tokio::test]
async fn test_list_directory_root_when_folder_empty() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octocat/pictures/contents")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let files = client_for(&server)
        .list_directory(&credentials(""))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_list_directory_404_is_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/missing")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .list_directory(&credentials("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::NotFound { .. }));
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_list_directory_other_status_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/images")
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .list_directory(&credentials("images"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::Api { status_code: 401, .. }));
    assert_eq!(err.to_string(), "GitHub API error: 401");
}

#[tokio::test]
async fn test_list_directory_single_object_is_format_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/images/cat.png")
        .with_status(200)
        .with_body(file_entry("cat.png", 10).to_string())
        .create_async()
        .await;

    let err = client_for(&server)
        .list_directory(&credentials("images/cat.png"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::Format { .. }));
}

// Single files

#[tokio::test]
async fn test_fetch_file_returns_content_and_sha() {
    let mut server = mockito::Server::new_async().await;
    let mut body = file_entry("cat.png", 3);
    body["content"] = json!("AQID\n");
    server
        .mock("GET", "/repos/octocat/pictures/contents/images/cat.png")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let file = client_for(&server)
        .fetch_file(&credentials("images"), "images/cat.png")
        .await
        .unwrap();

    assert_eq!(file.sha, "sha-cat.png");
    assert_eq!(file.kind, EntryKind::File);
    assert_eq!(file.content.as_deref(), Some("AQID\n"));
}

#[tokio::test]
async fn test_fetch_file_non_success_is_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/images/gone.png")
        .with_status(404)
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_file(&credentials("images"), "images/gone.png")
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::Fetch { status_code: Some(404), .. }));
}

#[tokio::test]
async fn test_fetch_file_on_directory_is_format_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/images")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_file(&credentials(""), "images")
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::Format { .. }));
}

#[tokio::test]
async fn test_probe_existing_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/images/cat.png")
        .with_status(200)
        .with_body(json!({"sha": "abc123", "name": "cat.png"}).to_string())
        .create_async()
        .await;

    let existing = client_for(&server)
        .probe_existing(&credentials("images"), "images/cat.png")
        .await
        .unwrap();

    assert_eq!(
        existing,
        ExistingFile::Found {
            sha: "abc123".to_string()
        }
    );
    assert_eq!(existing.sha(), Some("abc123"));
}

#[tokio::test]
async fn test_probe_existing_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/images/new.png")
        .with_status(404)
        .create_async()
        .await;

    let existing = client_for(&server)
        .probe_existing(&credentials("images"), "images/new.png")
        .await
        .unwrap();

    assert_eq!(existing, ExistingFile::NotFound);
    assert_eq!(existing.sha(), None);
}

#[tokio::test]
async fn test_probe_existing_server_error_is_distinct_from_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/images/cat.png")
        .with_status(502)
        .create_async()
        .await;

    let result = client_for(&server)
        .probe_existing(&credentials("images"), "images/cat.png")
        .await;

    assert!(matches!(result, Err(RepixError::Api { status_code: 502, .. })));
}

// Writes

#[tokio::test]
async fn test_put_file_sends_body_and_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/repos/octocat/pictures/contents/images/cat.png")
        .match_header("authorization", "Bearer ghp_test")
        .match_body(Matcher::Json(json!({
            "message": "Add cat.png",
            "content": "AAAA",
        })))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let request = WriteRequest {
        message: "Add cat.png".to_string(),
        content: "AAAA".to_string(),
        sha: None,
    };
    client_for(&server)
        .put_file(&credentials("images"), "images/cat.png", &request)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_put_file_error_carries_api_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/repos/octocat/pictures/contents/images/cat.png")
        .with_status(422)
        .with_body(r#"{"message":"Invalid request.\n\n\"sha\" wasn't supplied."}"#)
        .create_async()
        .await;

    let request = WriteRequest {
        message: "Add cat.png".to_string(),
        content: "AAAA".to_string(),
        sha: None,
    };
    let err = client_for(&server)
        .put_file(&credentials("images"), "images/cat.png", &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::Api { status_code: 422, .. }));
    assert!(err.to_string().contains("wasn't supplied"));
}

#[tokio::test]
async fn test_put_file_error_without_body_falls_back_to_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/repos/octocat/pictures/contents/cat.png")
        .with_status(500)
        .create_async()
        .await;

    let request = WriteRequest {
        message: "Add cat.png".to_string(),
        content: "AAAA".to_string(),
        sha: None,
    };
    let err = client_for(&server)
        .put_file(&credentials(""), "cat.png", &request)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "GitHub API error: 500");
}

#[tokio::test]
async fn test_delete_file_sends_sha() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/repos/octocat/pictures/contents/images/cat.png")
        .match_body(Matcher::Json(json!({
            "message": "Delete cat.png",
            "sha": "abc123",
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let request = DeleteRequest {
        message: "Delete cat.png".to_string(),
        sha: "abc123".to_string(),
    };
    client_for(&server)
        .delete_file(&credentials("images"), "images/cat.png", &request)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_file_conflict_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", "/repos/octocat/pictures/contents/images/cat.png")
        .with_status(409)
        .with_body(r#"{"message":"images/cat.png does not match abc123"}"#)
        .create_async()
        .await;

    let request = DeleteRequest {
        message: "Delete cat.png".to_string(),
        sha: "abc123".to_string(),
    };
    let err = client_for(&server)
        .delete_file(&credentials("images"), "images/cat.png", &request)
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::Api { status_code: 409, .. }));
    assert!(
        err.to_string()
            .starts_with("GitHub API rejected the delete request")
    );
}

// Downloads

#[tokio::test]
async fn test_download_is_unauthenticated() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/raw/cat.png")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body([0x89, b'P', b'N', b'G'])
        .create_async()
        .await;

    let bytes = client_for(&server)
        .download(&format!("{}/raw/cat.png", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_download_failure_is_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/raw/cat.png")
        .with_status(403)
        .create_async()
        .await;

    let err = client_for(&server)
        .download(&format!("{}/raw/cat.png", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::Fetch { status_code: Some(403), .. }));
}

#[tokio::test]
async fn test_download_connect_failure_hides_query_token() {
    let err = ContentsClient::new()
        .unwrap()
        .download("http://127.0.0.1:1/img.png?token=SECRET123")
        .await
        .unwrap_err();

    assert!(matches!(err, RepixError::Fetch { .. }));
    let message = err.to_string();
    assert!(message.contains("http://127.0.0.1:1/img.png"), "{message}");
    assert!(!message.contains('?'), "{message}");
    assert!(!message.contains("SECRET123"), "{message}");
    let source = std::error::Error::source(&err).unwrap().to_string();
    assert!(!source.contains("SECRET123"), "{source}");
}
