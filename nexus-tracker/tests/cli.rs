use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

fn write_config(dir: &std::path::Path, base_url: &str) -> std::path::PathBuf {
    let config = dir.join("config.yaml");
    let yaml = format!(
        "nexus:\n  base_url: \"{base_url}\"\n  first_end_point: \"service/rest/v1/search?repository=libs-release\"\ntracking:\n  path: \"{}\"\npublish:\n  type: file\n  path: \"{}\"\ncredentials:\n  env_prefix: CLI_TEST\n",
        dir.join("tracking.json").display(),
        dir.join("records.jsonl").display(),
    );
    write(&config, yaml).expect("Writing temp config failed");
    config
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use nexus_tracker::cli::{run, Cli, Commands};

    let cli = Cli {
        command: Commands::Track {
            config: std::path::PathBuf::from("dummy.yaml"),
        },
    };

    let _ = run(cli).await;

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

#[test]
fn tracking_command_prints_persisted_state() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:1/");
    write(
        dir.path().join("tracking.json"),
        r#"{"libs-release": "20230201000000"}"#,
    )
    .unwrap();

    Command::cargo_bin("nexus-tracker")
        .expect("Binary exists")
        .arg("tracking")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"libs-release\": \"20230201000000\""));
}

#[test]
fn track_fails_for_missing_config() {
    Command::cargo_bin("nexus-tracker")
        .expect("Binary exists")
        .arg("track")
        .arg("--config")
        .arg("/definitely/not/here.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn track_fails_without_credentials() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:1/");

    Command::cargo_bin("nexus-tracker")
        .expect("Binary exists")
        .arg("track")
        .arg("--config")
        .arg(&config)
        .env_remove("CLI_TEST_USERID")
        .env_remove("CLI_TEST_PASSWD")
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials"));
}

#[test]
fn track_reports_unreachable_repository_manager() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:1/");

    Command::cargo_bin("nexus-tracker")
        .expect("Binary exists")
        .arg("track")
        .arg("--config")
        .arg(&config)
        .env("CLI_TEST_USERID", "ci-bot")
        .env("CLI_TEST_PASSWD", "s3cret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Discovery run failed"));

    assert!(
        !dir.path().join("tracking.json").exists(),
        "nothing should be tracked when the first page fails"
    );
}
