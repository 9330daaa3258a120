mod common;

use common::{launcher, settings, FakeHost, CWD};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_debug_launcher::config::Platform;
use test_debug_launcher::dap::{DapMessage, DapMessageContent, DapReader, DapWriter, StdioDebugService};
use test_debug_launcher::host::{DebugService, HostServices, WorkspaceFolder};
use test_debug_launcher::{DebugError, DebugLauncher, LaunchOptions, LaunchOutcome, TestFramework};
use tokio::io::DuplexStream;
use tokio::sync::oneshot;

/// Launcher whose debug service talks DAP over in-memory pipes; returns the
/// adapter's ends of those pipes.
fn piped_launcher(host: &Arc<FakeHost>) -> (DebugLauncher, DapReader<DuplexStream>, DapWriter<DuplexStream>) {
    let (service_out, adapter_in) = tokio::io::duplex(64 * 1024);
    let (adapter_out, service_in) = tokio::io::duplex(64 * 1024);

    let services = HostServices {
        workspace: host.clone(),
        fs: host.clone(),
        interpreters: host.clone(),
        environment: host.clone(),
        debug: Arc::new(StdioDebugService::new(service_in, service_out)),
    };
    let launcher = DebugLauncher::new(services, settings()).with_platform(Platform::Linux);
    (launcher, DapReader::new(adapter_in), DapWriter::new(adapter_out))
}

fn response(seq: u64, request_seq: u64, success: bool, message: Option<&str>) -> DapMessage {
    DapMessage {
        seq,
        content: DapMessageContent::Response {
            request_seq,
            success,
            command: "launch".into(),
            message: message.map(str::to_string),
            body: None,
        },
    }
}

fn event(seq: u64, name: &str) -> DapMessage {
    DapMessage {
        seq,
        content: DapMessageContent::Event {
            event: name.into(),
            body: None,
        },
    }
}

async fn expect_launch_request(reader: &mut DapReader<DuplexStream>) -> (u64, serde_json::Value) {
    let msg = reader.read_message().await.unwrap().expect("launch request");
    match msg.content {
        DapMessageContent::Request { command, arguments } => {
            assert_eq!(command, "launch");
            (msg.seq, arguments.expect("launch arguments"))
        }
        other => panic!("expected a request, got {other:?}"),
    }
}

#[tokio::test]
async fn session_runs_until_terminated_event() {
    let host = Arc::new(FakeHost::new().with_entries(json!([
        { "name": "dap tests", "type": "python", "request": "test", "stopOnEntry": true }
    ])));
    let (launcher, mut from_service, mut to_service) = piped_launcher(&host);

    let adapter = tokio::spawn(async move {
        let (seq, arguments) = expect_launch_request(&mut from_service).await;
        to_service.write_message(&event(1, "initialized")).await.unwrap();
        to_service.write_message(&response(2, seq, true, None)).await.unwrap();
        to_service.write_message(&event(3, "output")).await.unwrap();
        to_service.write_message(&event(4, "terminated")).await.unwrap();
        arguments
    });

    let opts = LaunchOptions::new(CWD, vec!["test_spam.py".into()], TestFramework::Pytest);
    let outcome = launcher.launch_debugger(&opts).await.unwrap();
    assert_eq!(outcome, LaunchOutcome::Terminated);

    let arguments = adapter.await.unwrap();
    assert_eq!(arguments["name"], "dap tests");
    assert_eq!(arguments["type"], "python");
    assert_eq!(arguments["request"], "launch");
    assert_eq!(arguments["program"], "/ext/pythonFiles/testlauncher.py");
    assert_eq!(arguments["args"], json!(["test_spam.py"]));
    assert_eq!(arguments["stopOnEntry"], true);
    assert_eq!(
        arguments["debugOptions"],
        json!(["StopOnEntry", "ShowReturnValue", "RedirectOutput", "Multiprocess"])
    );
}

#[tokio::test]
async fn closed_stream_ends_the_session() {
    let host = Arc::new(FakeHost::new());
    let (launcher, mut from_service, mut to_service) = piped_launcher(&host);

    tokio::spawn(async move {
        let (seq, _) = expect_launch_request(&mut from_service).await;
        to_service.write_message(&response(1, seq, true, None)).await.unwrap();
        drop(to_service);
    });

    let opts = LaunchOptions::new(CWD, Vec::new(), TestFramework::Unittest);
    assert_eq!(
        launcher.launch_debugger(&opts).await.unwrap(),
        LaunchOutcome::Terminated
    );
}

#[tokio::test]
async fn failed_launch_response_is_a_start_error() {
    let host = Arc::new(FakeHost::new());
    let (launcher, mut from_service, mut to_service) = piped_launcher(&host);

    tokio::spawn(async move {
        let (seq, _) = expect_launch_request(&mut from_service).await;
        to_service
            .write_message(&response(1, seq, false, Some("no python")))
            .await
            .unwrap();
    });

    let opts = LaunchOptions::new(CWD, Vec::new(), TestFramework::Pytest);
    let err = launcher.launch_debugger(&opts).await.unwrap_err();
    assert!(matches!(err, DebugError::StartRejected(ref msg) if msg == "no python"));
}

#[tokio::test]
async fn stream_closed_before_response_is_a_start_error() {
    let host = Arc::new(FakeHost::new());
    let (launcher, mut from_service, to_service) = piped_launcher(&host);

    tokio::spawn(async move {
        expect_launch_request(&mut from_service).await;
        drop(to_service);
    });

    let opts = LaunchOptions::new(CWD, Vec::new(), TestFramework::Pytest);
    let err = launcher.launch_debugger(&opts).await.unwrap_err();
    assert!(matches!(err, DebugError::StartRejected(_)));
}

#[tokio::test]
async fn terminated_before_launch_response_still_ends_the_session() {
    let host = Arc::new(FakeHost::new());
    let (launcher, mut from_service, mut to_service) = piped_launcher(&host);
    let (release, hold_open) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let (seq, _) = expect_launch_request(&mut from_service).await;
        to_service.write_message(&event(1, "terminated")).await.unwrap();
        to_service.write_message(&response(2, seq, true, None)).await.unwrap();
        // The adapter keeps the stream open; only the early event can end the wait.
        let _ = hold_open.await;
        drop((from_service, to_service));
    });

    let opts = LaunchOptions::new(CWD, Vec::new(), TestFramework::Pytest);
    let outcome = tokio::time::timeout(Duration::from_secs(5), launcher.launch_debugger(&opts))
        .await
        .expect("launch should finish once the session has terminated")
        .unwrap();
    assert_eq!(outcome, LaunchOutcome::Terminated);
    let _ = release.send(());
}

#[tokio::test]
async fn failed_start_releases_termination_subscribers() {
    let host = Arc::new(FakeHost::new());
    let config = launcher(&host)
        .resolve_configuration(&LaunchOptions::new(CWD, Vec::new(), TestFramework::Pytest))
        .await
        .unwrap();

    let (service_out, adapter_in) = tokio::io::duplex(64 * 1024);
    let (adapter_out, service_in) = tokio::io::duplex(64 * 1024);
    let service = StdioDebugService::new(service_in, service_out);
    let mut from_service = DapReader::new(adapter_in);
    let mut to_service = DapWriter::new(adapter_out);

    tokio::spawn(async move {
        let (seq, _) = expect_launch_request(&mut from_service).await;
        to_service
            .write_message(&response(1, seq, false, Some("no python")))
            .await
            .unwrap();
    });

    let terminated = service.on_session_terminated();
    let err = service
        .start_debugging(&WorkspaceFolder::new(CWD), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, DebugError::StartRejected(_)));
    // The sender was dropped rather than left waiting on a dead stream.
    assert!(terminated.await.is_err());
}
