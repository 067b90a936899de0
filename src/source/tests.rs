use super::*;
use std::io::Read;

#[test]
fn test_default_command() {
    let cmd = ListxCommand::default();
    assert_eq!(cmd.program, "exiftool");
    assert_eq!(cmd.args, vec!["-listx"]);
    assert_eq!(cmd.to_string(), "exiftool -listx");
}

#[test]
fn test_spawn_missing_program() {
    let cmd = ListxCommand::new("exiftags-definitely-not-installed", ["-listx"]);
    let err = cmd.capture().unwrap_err();
    assert!(matches!(err, SourceError::Spawn { .. }));
    assert!(err.to_string().starts_with("command failed"));

    assert!(matches!(cmd.spawn().unwrap_err(), SourceError::Spawn { .. }));
}

#[cfg(unix)]
#[test]
fn test_capture_stdout() {
    let cmd = ListxCommand::new("sh", ["-c", "printf '<taginfo></taginfo>'"]);
    assert_eq!(cmd.capture().unwrap(), b"<taginfo></taginfo>");
}

#[cfg(unix)]
#[test]
fn test_capture_failure_reports_stderr() {
    let cmd = ListxCommand::new("sh", ["-c", "echo 'no such option' >&2; exit 3"]);
    match cmd.capture().unwrap_err() {
        SourceError::Failed { status, stderr, .. } => {
            assert_eq!(status.code(), Some(3));
            assert_eq!(stderr, "no such option");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn test_spawn_and_wait() {
    let cmd = ListxCommand::new("sh", ["-c", "printf '<taginfo/>'"]);
    let mut child = cmd.spawn().unwrap();
    let mut stdout = child.take_stdout().unwrap();
    assert!(child.take_stdout().is_none());

    let mut out = String::new();
    stdout.read_to_string(&mut out).unwrap();
    assert_eq!(out, "<taginfo/>");
    child.wait().unwrap();
}

#[cfg(unix)]
#[test]
fn test_large_stderr_does_not_block_stdout() {
    // Far more than a pipe buffer on stderr before anything reaches stdout
    let cmd = ListxCommand::new(
        "sh",
        ["-c", "head -c 262144 /dev/zero | tr '\\0' e >&2; printf '<taginfo/>'; exit 1"],
    );
    let mut child = cmd.spawn().unwrap();
    let mut out = String::new();
    child.take_stdout().unwrap().read_to_string(&mut out).unwrap();
    assert_eq!(out, "<taginfo/>");

    match child.wait().unwrap_err() {
        SourceError::Failed { stderr, .. } => {
            assert_eq!(stderr.len(), STDERR_LIMIT);
            assert!(stderr.bytes().all(|b| b == b'e'));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn test_wait_reports_stderr() {
    let cmd = ListxCommand::new("sh", ["-c", "echo 'bad lang' >&2; exit 4"]);
    let child = cmd.spawn().unwrap();
    match child.wait().unwrap_err() {
        SourceError::Failed { status, stderr, .. } => {
            assert_eq!(status.code(), Some(4));
            assert_eq!(stderr, "bad lang");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn test_kill_running_child() {
    let cmd = ListxCommand::new("sleep", ["30"]);
    let mut child = cmd.spawn().unwrap();
    child.kill().unwrap();
    // Killed by a signal, so no success status
    assert!(matches!(child.wait(), Err(SourceError::Failed { .. })));
}

#[cfg(unix)]
#[test]
fn test_kill_after_exit() {
    let cmd = ListxCommand::new("true", Vec::<String>::new());
    let mut child = cmd.spawn().unwrap();
    std::thread::sleep(std::time::Duration::from_millis(100));
    child.kill().unwrap();
    child.wait().unwrap();
}

#[test]
fn test_input_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("listx.xml");
    std::fs::write(&path, "<taginfo/>").unwrap();

    let source = InputSource::File(path.clone());
    let mut reader = source.open().unwrap();
    let mut content = String::new();
    reader.read_to_string(&mut content).unwrap();
    assert_eq!(content, "<taginfo/>");
    assert_eq!(source.to_string(), path.display().to_string());

    let missing = InputSource::File(dir.path().join("missing.xml"));
    assert!(matches!(missing.open(), Err(SourceError::Io(_))));
}

#[test]
fn test_deserialize_command() {
    let cmd: ListxCommand = toml::from_str("program = '/usr/bin/exiftool'").unwrap();
    assert_eq!(cmd.program, "/usr/bin/exiftool");
    assert_eq!(cmd.args, vec!["-listx"]);
}
