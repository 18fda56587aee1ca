#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with a clean environment rooted at `dir`.
fn moviestream(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("moviestream");
    cmd.env_remove("TMDB_API_KEY")
        .env_remove("RUST_LOG")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .arg("--dir")
        .arg(dir);
    cmd
}

fn register(dir: &Path) {
    moviestream(dir)
        .args([
            "register",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
            "--email",
            "ada@example.com",
            "--password",
            "hunter2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered ada@example.com"));
}

fn login(dir: &Path) {
    moviestream(dir)
        .args([
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "hunter2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as ada@example.com"));
}

#[test]
fn test_help_lists_commands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviestream");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("contact"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviestream");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_list_rejects_unknown_category() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviestream");
    cmd.args(["list", "--category", "documentaries"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

#[test]
fn test_register_login_logout_flow() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    register(dir.path());
    login(dir.path());
    moviestream(dir.path())
        .args(["embed", "--id", "27205"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://vidsrc.icu/embed/movie/27205"));

    moviestream(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    moviestream(dir.path())
        .args(["embed", "--id", "27205"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_register_rejects_blank_field() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    moviestream(dir.path())
        .args([
            "register",
            "--first-name",
            " ",
            "--last-name",
            "Lovelace",
            "--email",
            "ada@example.com",
            "--password",
            "hunter2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("first name is required"));
}

#[test]
fn test_login_wrong_password_is_denied() {
    // Arrange
    let dir = TempDir::new().unwrap();
    register(dir.path());

    // Act & Assert
    moviestream(dir.path())
        .args([
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "wrong",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Access Denied: Invalid email or password. Please try again.",
        ));
    moviestream(dir.path())
        .args(["embed", "--id", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_login_without_registration_is_denied() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    moviestream(dir.path())
        .args([
            "login",
            "--email",
            "ada@example.com",
            "--password",
            "hunter2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access Denied"));
}

#[test]
fn test_list_requires_registration() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    moviestream(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn test_list_without_api_key() {
    // Arrange
    let dir = TempDir::new().unwrap();
    register(dir.path());
    login(dir.path());

    // Act & Assert
    moviestream(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key is missing"));
}

#[test]
fn test_embed_tv_episode() {
    // Arrange
    let dir = TempDir::new().unwrap();
    register(dir.path());
    login(dir.path());

    // Act & Assert
    moviestream(dir.path())
        .args(["embed", "--id", "1399", "--season", "2", "--episode", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://vidsrc.icu/embed/tv/1399/2/5"));
}

#[test]
fn test_contact_requires_relay_config() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act & Assert
    moviestream(dir.path())
        .args([
            "contact",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--message",
            "Hello",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("contact relay is not configured"));
}

#[test]
fn test_completions_bash() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("moviestream");
    cmd.args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moviestream"));
}

#[tokio::test]
async fn test_list_popular_via_http() {
    // Arrange
    let mock_server = MockServer::start().await;
    let json_body = include_str!("../../../fixtures/tmdb/movie_popular_page1.json");
    Mock::given(method("GET"))
        .and(path("/3/movie/popular"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!(
            "[tmdb]\napi_key = \"test-key\"\nbase_url = \"{}/3\"\n",
            mock_server.uri()
        ),
    )
    .unwrap();
    let root = dir.path().to_path_buf();

    // Act
    let output = tokio::task::spawn_blocking(move || {
        register(&root);
        login(&root);
        moviestream(&root).arg("list").output().unwrap()
    })
    .await
    .unwrap();

    // Assert
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Moana 2"));
    assert!(stdout.contains("https://image.tmdb.org/t/p/w500/m0SbwFNCa9epW1X60deLqTHiP7x.jpg"));
    assert!(stdout.contains("Page 1 of 500"));
}
