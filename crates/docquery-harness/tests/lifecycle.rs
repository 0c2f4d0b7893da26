//! Lifecycle tests against a stand-in `mongod` script
//!
//! The script records its arguments next to itself and then sleeps, which is
//! enough to exercise spawn, kill, bounded wait and directory cleanup without
//! a real server.

#![cfg(unix)]

use docquery_harness::{DocQueryError, HarnessConfig, HarnessState, Mongod};
use std::fs;
use std::net::TcpListener;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const SLEEPER: &str = "#!/bin/sh\necho \"$@\" > \"$0.args\"\nexec sleep 30\n";
const CRASHER: &str = "#!/bin/sh\nexit 3\n";

struct Fixture {
    root: TempDir,
}

impl Fixture {
    fn new(script: &str) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let root = tempfile::tempdir().unwrap();
        let bin = root.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let exe = bin.join("mongod");
        fs::write(&exe, script).unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        Self { root }
    }

    fn bin(&self) -> PathBuf {
        self.root.path().join("bin")
    }

    fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    fn config(&self, port: u16) -> HarnessConfig {
        HarnessConfig::default()
            .mongod_dir(self.bin())
            .data_dir(self.data_dir())
            .port(port)
    }

    fn args_file(&self) -> PathBuf {
        self.bin().join("mongod.args")
    }
}

/// Launch, retrying while a concurrently forked test still holds the script open.
fn launch(mongod: &mut Mongod) {
    for _ in 0..20 {
        match mongod.launch() {
            Ok(_) => return,
            Err(DocQueryError::Launch(msg)) if msg.contains("busy") => {
                thread::sleep(Duration::from_millis(20))
            }
            Err(e) => panic!("launch failed: {}", e),
        }
    }
    panic!("launch kept failing with a busy executable");
}

fn wait_for_file(path: &Path) -> String {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(contents) = fs::read_to_string(path) {
            if !contents.is_empty() {
                return contents;
            }
        }
        assert!(Instant::now() < deadline, "{} never written", path.display());
        thread::sleep(Duration::from_millis(10));
    }
}

fn unused_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[test]
fn test_start_passes_port_dbpath_and_flags() {
    let fixture = Fixture::new(SLEEPER);
    let mut mongod = Mongod::new(fixture.config(27701));
    launch(&mut mongod);
    assert_eq!(mongod.state(), HarnessState::Running);

    let args = wait_for_file(&fixture.args_file());
    let expected = format!(
        "--port 27701 --dbpath {} --smallfiles",
        fixture.data_dir().display()
    );
    assert_eq!(args.trim_end(), expected);

    mongod.stop();
    assert_eq!(mongod.state(), HarnessState::Terminated);
}

#[test]
fn test_start_wipes_existing_data_dir() {
    let fixture = Fixture::new(SLEEPER);
    let stale = fixture.data_dir().join("collection-0.wt");
    fs::create_dir_all(fixture.data_dir()).unwrap();
    fs::write(&stale, b"stale").unwrap();

    let mut mongod = Mongod::new(fixture.config(27702));
    launch(&mut mongod);

    assert!(fixture.data_dir().is_dir());
    assert!(!stale.exists());
    let handle = mongod.handle().unwrap();
    assert_eq!(handle.data_dir(), fixture.data_dir());
    assert_eq!(handle.port(), 27702);
}

#[test]
fn test_stop_kills_process_and_removes_dir() {
    let fixture = Fixture::new(SLEEPER);
    let mut mongod = Mongod::new(fixture.config(27703));
    launch(&mut mongod);

    let started = Instant::now();
    mongod.stop();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(mongod.handle().is_none());
    assert!(!fixture.data_dir().exists());

    // Idempotent
    mongod.stop();
    assert_eq!(mongod.state(), HarnessState::Terminated);
}

#[test]
fn test_drop_stops_server() {
    let fixture = Fixture::new(SLEEPER);
    {
        let mut mongod = Mongod::new(fixture.config(27704));
        launch(&mut mongod);
        assert!(fixture.data_dir().is_dir());
    }
    assert!(!fixture.data_dir().exists());
}

#[test]
fn test_second_launch_is_rejected() {
    let fixture = Fixture::new(SLEEPER);
    let mut mongod = Mongod::new(fixture.config(27705));
    launch(&mut mongod);
    let pid = mongod.handle().unwrap().pid();

    let err = mongod.launch().unwrap_err();
    assert!(matches!(err, DocQueryError::Launch(_)));
    assert_eq!(mongod.state(), HarnessState::Running);
    assert_eq!(mongod.handle().unwrap().pid(), pid);
}

#[test]
fn test_restart_after_stop() {
    let fixture = Fixture::new(SLEEPER);
    let mut mongod = Mongod::new(fixture.config(27706));
    launch(&mut mongod);
    mongod.stop();
    launch(&mut mongod);
    assert_eq!(mongod.state(), HarnessState::Running);
    assert!(fixture.data_dir().is_dir());
}

#[test]
fn test_missing_executable_fails_start() {
    let root = tempfile::tempdir().unwrap();
    let config = HarnessConfig::default()
        .mongod_dir(root.path().join("nowhere"))
        .data_dir(root.path().join("data"));

    let err = Mongod::start(config).unwrap_err();
    assert!(matches!(err, DocQueryError::Launch(_)));
    assert!(!root.path().join("data").exists());
}

#[test]
fn test_wait_until_ready_sees_listener() {
    let fixture = Fixture::new(SLEEPER);
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut mongod = Mongod::new(fixture.config(port));
    launch(&mut mongod);
    mongod.wait_until_ready(Duration::from_secs(2)).unwrap();
}

#[test]
fn test_wait_until_ready_uses_configured_host() {
    let fixture = Fixture::new(SLEEPER);
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut mongod = Mongod::new(fixture.config(port).host("127.0.0.1"));
    launch(&mut mongod);
    mongod.wait_until_ready(Duration::from_secs(2)).unwrap();
    assert_eq!(
        mongod.connection_string().to_uri(),
        format!("mongodb://127.0.0.1:{}/NormTests", port)
    );
}

#[test]
fn test_unconfigured_executable_dir_fails_start() {
    let root = tempfile::tempdir().unwrap();
    let config = HarnessConfig::default().data_dir(root.path().join("data"));

    let err = Mongod::start(config).unwrap_err();
    assert_eq!(
        err,
        DocQueryError::Launch("MONGOD_PATH is not configured".to_string())
    );
    assert!(!root.path().join("data").exists());
}

#[test]
fn test_wait_until_ready_times_out() {
    let fixture = Fixture::new(SLEEPER);
    let mut mongod = Mongod::new(fixture.config(unused_port()));
    launch(&mut mongod);

    let err = mongod
        .wait_until_ready(Duration::from_millis(300))
        .unwrap_err();
    assert!(matches!(err, DocQueryError::Timeout(_)));
}

#[test]
fn test_wait_until_ready_reports_early_exit() {
    let fixture = Fixture::new(CRASHER);
    let mut mongod = Mongod::new(fixture.config(unused_port()));
    launch(&mut mongod);

    let err = mongod.wait_until_ready(Duration::from_secs(5)).unwrap_err();
    assert!(matches!(err, DocQueryError::Launch(_)));

    // Stopping an already exited process is still fine.
    mongod.stop();
    assert_eq!(mongod.state(), HarnessState::Terminated);
}
