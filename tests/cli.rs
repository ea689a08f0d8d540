mod common;

use std::process::Command;

fn sinklog() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sinklog"))
}

#[test]
fn stdout_lines_appear_once_in_call_order() {
    let output = sinklog()
        .args(["--level", "warning", "one", "two", "three"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "WARNING: one\nWARNING: two\nWARNING: three\n"
    );
}

#[test]
fn demo_sequence_covers_every_level() {
    let output = sinklog().output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "INFO: Application started with stdout logging\n\
         WARNING: Low memory condition detected\n\
         ERROR: An error occurred during processing\n\
         INFO: Application can also log to stdout\n\
         INFO: Network logging needs implementation\n"
    );
}

#[test]
fn file_destination_keeps_first_configuration_and_latest_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("application.log");

    let output = sinklog()
        .args(["--destination", "file", "--file"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "INFO: Network logging needs implementation\n"
    );
}

#[test]
fn file_write_failure_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("application.log");

    let output = sinklog()
        .args(["--destination", "file", "--file"])
        .arg(&path)
        .arg("lost")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("logger: failed writing log records to"));
    assert!(stderr.contains(path.to_str().unwrap()));
}

#[test]
fn unreachable_endpoint_is_reported_not_fatal() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let output = sinklog()
        .args(["--destination", "network", "--url"])
        .arg(format!("http://127.0.0.1:{}/logs", port))
        .arg("lost")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("logger: failed delivering log records to"));
}

#[test]
fn rejected_delivery_is_reported_not_fatal() {
    let (url, server) = common::serve(500, 1);

    let output = sinklog()
        .args(["--destination", "network", "--url", url.as_str(), "lost"])
        .output()
        .unwrap();
    server.join().unwrap();

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains(&format!(
        "logger: failed delivering log records to {}: unexpected status 500",
        url
    )));
}
