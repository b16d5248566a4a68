use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::io::Write;

fn game_rest(endpoint: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("game-rest"));
    cmd.env_remove("GAME_REST_TOKEN")
        .env_remove("GAME_REST_QUERY")
        .env("GAME_REST_ENDPOINT", endpoint);
    cmd
}

#[test]
fn test_get_prints_body() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/scores?key=abc&page=2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"scores": [10, 20]}"#)
        .create();

    game_rest(&server.url())
        .args(["--query", "key=abc", "get", "/scores", "page=2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"scores": [10, 20]}"#));
}

#[test]
fn test_get_failure_prints_diagnostics() {
    let mut server = Server::new();
    let _mock = server.mock("GET", "/missing").with_status(404).create();

    game_rest(&server.url())
        .args(["get", "/missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""statusCode":"404""#))
        .stderr(predicate::str::contains(r#""connectionStatus":"ProtocolError""#));
}

#[test]
fn test_get_unauthorized_reports_rejected_token() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/me")
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .create();

    game_rest(&server.url())
        .env("GAME_REST_TOKEN", "stale")
        .args(["--require-auth", "get", "/me"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("auth token was rejected"));
}

#[test]
fn test_require_auth_without_token_fails_before_request() {
    let mut server = Server::new();
    let mock = server.mock("GET", Matcher::Any).expect(0).create();

    game_rest(&server.url())
        .args(["--require-auth", "get", "/me"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("auth token is required"));

    mock.assert();
}

#[test]
fn test_post_file_body() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/scores")
        .match_header("x-client-version", "2")
        .match_header("content-type", "application/json")
        .match_body(Matcher::JsonString(r#"{"points": 99}"#.to_string()))
        .with_status(201)
        .with_body(r#"{"id": 1}"#)
        .create();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"points": 99}}"#).unwrap();

    game_rest(&server.url())
        .args(["post", "/scores", "--file"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"id": 1}"#));

    mock.assert();
}

#[test]
fn test_missing_endpoint_fails() {
    let mut cmd = Command::new(cargo::cargo_bin!("game-rest"));
    cmd.env_remove("GAME_REST_ENDPOINT")
        .args(["get", "/scores"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("End point URL not specified"));
}

#[test]
fn test_connection_failure_prints_diagnostics() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    game_rest(&format!("http://{}", addr))
        .args(["get", "/scores"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#""connectionStatus":"ConnectFailure""#))
        .stderr(predicate::str::contains("could not be reached"));
}
