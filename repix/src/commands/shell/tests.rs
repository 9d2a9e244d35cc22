use super::*;
use librepix::CredentialForm;
use serde_json::json;
use std::time::Duration;

fn client_for(server: &mockito::ServerGuard) -> RepositoryImageClient {
    RepositoryImageClient::builder()
        .api_url(server.url())
        .refresh_delay(Duration::ZERO)
        .build()
        .unwrap()
}

fn session() -> Session {
    Session::new(CredentialForm::new("ghp_test", "octocat", "pictures", ""))
}

fn never(_: &str) -> bool {
    false
}

#[test]
fn test_parse_commands_with_arguments() {
    assert_eq!(
        "select ./cat.png".parse::<ShellCommand>().unwrap(),
        ShellCommand::Select(PathBuf::from("./cat.png"))
    );
    assert_eq!(
        "name  my cat.png ".parse::<ShellCommand>().unwrap(),
        ShellCommand::Name("my cat.png".to_string())
    );
    assert_eq!(
        "VIEW cat.png".parse::<ShellCommand>().unwrap(),
        ShellCommand::View("cat.png".to_string())
    );
    assert_eq!(
        "rm cat.png".parse::<ShellCommand>().unwrap(),
        ShellCommand::Delete("cat.png".to_string())
    );
}

#[test]
fn test_parse_aliases() {
    assert_eq!("refresh".parse::<ShellCommand>().unwrap(), ShellCommand::List);
    assert_eq!("ls".parse::<ShellCommand>().unwrap(), ShellCommand::List);
    assert_eq!("save".parse::<ShellCommand>().unwrap(), ShellCommand::Add);
    assert_eq!("exit".parse::<ShellCommand>().unwrap(), ShellCommand::Quit);
    assert_eq!("?".parse::<ShellCommand>().unwrap(), ShellCommand::Help);
}

#[test]
fn test_parse_missing_argument_shows_usage() {
    let err = "edit".parse::<ShellCommand>().unwrap_err();
    assert_eq!(err, "usage: edit <name>");
}

#[test]
fn test_parse_unknown_and_blank() {
    let err = "frobnicate".parse::<ShellCommand>().unwrap_err();
    assert!(err.contains("Unknown command 'frobnicate'"));
    assert_eq!("   ".parse::<ShellCommand>().unwrap_err(), "");
}

#[tokio::test]
async fn test_name_then_quit() {
    let server = mockito::Server::new_async().await;
    let client = client_for(&server);
    let mut session = session();

    let flow = execute(
        &client,
        &mut session,
        ShellCommand::Name("kitten.png".to_string()),
        &mut never,
    )
    .await
    .unwrap();
    assert_eq!(flow, Flow::Continue);
    assert_eq!(session.file_name(), "kitten.png");

    let flow = execute(&client, &mut session, ShellCommand::Quit, &mut never)
        .await
        .unwrap();
    assert_eq!(flow, Flow::Quit);
}

#[tokio::test]
async fn test_select_then_add_uploads_to_root() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("cat.png");
    std::fs::write(&file, b"meow").unwrap();

    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repos/octocat/pictures/contents/cat.png")
        .with_status(404)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/repos/octocat/pictures/contents/cat.png")
        .with_status(201)
        .create_async()
        .await;
    server
        .mock("GET", "/repos/octocat/pictures/contents")
        .with_status(200)
        .with_body(
            json!([{
                "name": "cat.png",
                "path": "cat.png",
                "type": "file",
                "size": 4,
                "sha": "abc",
                "download_url": null,
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let mut session = session();
    execute(&client, &mut session, ShellCommand::Select(file), &mut never)
        .await
        .unwrap();
    assert_eq!(session.file_name(), "cat.png");

    execute(&client, &mut session, ShellCommand::Add, &mut never)
        .await
        .unwrap();

    put.assert_async().await;
    assert!(session.pending().is_none());
    assert_eq!(session.listing().rows()[0].size, 4);
}

#[tokio::test]
async fn test_view_unknown_file_is_lookup_error() {
    let server = mockito::Server::new_async().await;
    let client = client_for(&server);
    let mut session = session();

    let err = execute(
        &client,
        &mut session,
        ShellCommand::View("cat.png".to_string()),
        &mut never,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RepixError::Validation { .. }));
    assert!(err.to_string().contains("Run 'list' first"));
    assert!(session.status().latest().is_none());
}

#[test]
fn test_describe_fresh_session() {
    let description = describe_session(&session());
    assert!(description.contains("credentials not validated"));
    assert!(description.contains("Staged file: (none)"));
    assert!(description.contains("Preview: (none)"));
}

#[test]
fn test_describe_validated_session_shows_root_folder() {
    let mut session = session();
    assert!(session.validate_credentials());
    assert!(describe_session(&session).contains("Repository: octocat/pictures (/)"));
}

#[test]
fn test_help_lists_every_command() {
    for word in ["select", "name", "add", "list", "view", "close", "edit", "delete", "status", "quit"] {
        assert!(HELP.contains(word), "help is missing {}", word);
    }
}
