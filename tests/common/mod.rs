use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::TempDir;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

/// Isolated home, state file and activity log for one test.
pub struct Sandbox {
    dir: TempDir,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Some(path) = option_env!("CARGO_BIN_EXE_frz") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "frz.exe" } else { "frz" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve frz binary path for integration test"),
    }
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create sandbox dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_file(&self) -> PathBuf {
        self.root().join("data").join("freezers.json")
    }

    pub fn activity_log(&self) -> PathBuf {
        self.root().join("data").join("activity.jsonl")
    }

    pub fn run(&self, case_name: &str, args: &[&str]) -> CmdResult {
        self.run_with_stdin(case_name, args, "")
    }

    pub fn run_with_stdin(&self, case_name: &str, args: &[&str], stdin: &str) -> CmdResult {
        let log_root = std::env::temp_dir().join("frz-test-logs");
        fs::create_dir_all(&log_root).expect("create temp test log dir");

        let log_path = log_root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
        let bin_path = resolve_bin_path();

        let mut child = Command::new(&bin_path)
            .args(args)
            .env("HOME", self.root())
            .env("FRZ_STATE_FILE", self.state_file())
            .env("FRZ_ACTIVITY_LOG", self.activity_log())
            .env("FRZ_UI_HAPTICS", "false")
            .env("NO_COLOR", "1")
            .env("RUST_BACKTRACE", "1")
            .env_remove("FRZ_OUTPUT_FORMAT")
            .env_remove("FRZ_LAYOUT_PRESET")
            .env_remove("FRZ_UI_CONFIRM_DESTRUCTIVE")
            .env_remove("FRZ_SHARE_BASE_URL")
            .env_remove("FRZ_SHARE_OPENER")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn frz command");

        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(stdin.as_bytes()).expect("write stdin");
        }
        let output = child.wait_with_output().expect("wait for frz command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let mut log_content = String::new();
        log_content.push_str(&format!("case={case_name}\n"));
        log_content.push_str(&format!("bin={}\n", bin_path.display()));
        log_content.push_str(&format!("args={args:?}\n"));
        log_content.push_str(&format!("status={}\n", output.status));
        log_content.push_str("----- stdout -----\n");
        log_content.push_str(&stdout);
        log_content.push('\n');
        log_content.push_str("----- stderr -----\n");
        log_content.push_str(&stderr);
        log_content.push('\n');
        fs::write(&log_path, log_content).expect("write test log");

        CmdResult {
            status: output.status,
            stdout,
            stderr,
            log_path,
        }
    }
}
