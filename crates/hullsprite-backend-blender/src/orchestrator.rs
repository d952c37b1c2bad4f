//! Blender subprocess orchestrator.
//!
//! This module handles spawning Blender as a subprocess and managing
//! communication via JSON files.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::{BlenderError, BlenderResult};
use crate::job::RenderJob;
use crate::report::RenderReport;

const EMBEDDED_ENTRYPOINT_PY: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../blender/render_sprite.py"
));

/// Environment variable naming the Blender executable.
pub const BLENDER_PATH_ENV: &str = "BLENDER_PATH";
/// Environment variable naming an entrypoint script to use instead of the embedded one.
pub const ENTRYPOINT_ENV: &str = "HULLSPRITE_BLENDER_ENTRYPOINT";

/// Configuration for the Blender orchestrator.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Path to the Blender executable.
    pub blender_path: Option<PathBuf>,
    /// Path to the Python entrypoint script.
    pub entrypoint_path: Option<PathBuf>,
    /// Optional timeout; Blender is waited on indefinitely without one.
    pub timeout: Option<Duration>,
    /// Whether to capture Blender's stderr.
    pub capture_output: bool,
}

impl OrchestratorConfig {
    /// Creates a config that captures stderr and has no timeout.
    pub fn new() -> Self {
        Self {
            capture_output: true,
            ..Default::default()
        }
    }

    /// Creates a new config with the given entrypoint path.
    pub fn with_entrypoint(entrypoint_path: impl Into<PathBuf>) -> Self {
        Self {
            entrypoint_path: Some(entrypoint_path.into()),
            ..Self::new()
        }
    }

    /// Sets the Blender executable path.
    pub fn blender_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blender_path = Some(path.into());
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }
}

/// The Blender subprocess orchestrator.
pub struct Orchestrator {
    config: OrchestratorConfig,
}

struct ResolvedEntrypoint {
    path: PathBuf,
    _tempfile: Option<tempfile::NamedTempFile>,
}

impl Orchestrator {
    /// Creates a new orchestrator with default configuration.
    pub fn new() -> Self {
        Self {
            config: OrchestratorConfig::new(),
        }
    }

    /// Creates a new orchestrator with the given configuration.
    pub fn with_config(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    /// Finds the Blender executable path.
    pub fn find_blender(&self) -> BlenderResult<PathBuf> {
        // Check config override first
        if let Some(ref path) = self.config.blender_path {
            if path.exists() {
                return Ok(path.clone());
            }
            debug!(path = %path.display(), "configured Blender path does not exist");
        }

        if let Ok(path) = std::env::var(BLENDER_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        let blender_names = if cfg!(windows) {
            vec!["blender.exe", "blender"]
        } else {
            vec!["blender"]
        };

        for name in blender_names {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        let common_paths = if cfg!(windows) {
            vec![
                "C:\\Program Files\\Blender Foundation\\Blender 4.2\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 4.1\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 4.0\\blender.exe",
                "C:\\Program Files\\Blender Foundation\\Blender 3.6\\blender.exe",
            ]
        } else if cfg!(target_os = "macos") {
            vec![
                "/Applications/Blender.app/Contents/MacOS/Blender",
                "/Applications/Blender.app/Contents/MacOS/blender",
            ]
        } else {
            vec![
                "/usr/bin/blender",
                "/usr/local/bin/blender",
                "/snap/bin/blender",
                "/opt/blender/blender",
            ]
        };

        for path_str in common_paths {
            let path = PathBuf::from(path_str);
            if path.exists() {
                return Ok(path);
            }
        }

        Err(BlenderError::BlenderNotFound)
    }

    /// Asks Blender for its version string (first line of `blender --version`).
    pub fn blender_version(&self) -> BlenderResult<String> {
        let blender_path = self.find_blender()?;
        let output = Command::new(&blender_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .map_err(BlenderError::SpawnFailed)?;
        if !output.status.success() {
            return Err(BlenderError::process_failed(
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }

    fn resolve_entrypoint(&self) -> BlenderResult<ResolvedEntrypoint> {
        if let Some(ref path) = self.config.entrypoint_path {
            if path.exists() {
                return Ok(ResolvedEntrypoint {
                    path: path.clone(),
                    _tempfile: None,
                });
            }
            return Err(BlenderError::EntrypointNotFound { path: path.clone() });
        }

        if let Ok(path) = std::env::var(ENTRYPOINT_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(ResolvedEntrypoint {
                    path,
                    _tempfile: None,
                });
            }
            return Err(BlenderError::EntrypointNotFound { path });
        }

        // Last resort: write embedded entrypoint to a temp file.
        let mut file = tempfile::Builder::new()
            .prefix("hullsprite_render_sprite_")
            .suffix(".py")
            .tempfile()
            .map_err(BlenderError::Io)?;
        file.write_all(EMBEDDED_ENTRYPOINT_PY.as_bytes())
            .map_err(BlenderError::Io)?;
        file.flush().map_err(BlenderError::Io)?;

        Ok(ResolvedEntrypoint {
            path: file.path().to_path_buf(),
            _tempfile: Some(file),
        })
    }

    /// Runs Blender on a job file and reads back its report.
    ///
    /// `blender --background --factory-startup --python render_sprite.py -- --job <path> --report <path>`
    pub fn run(&self, job_path: &Path, report_path: &Path) -> BlenderResult<RenderReport> {
        let blender_path = self.find_blender()?;
        let entrypoint = self.resolve_entrypoint()?;

        let mut cmd = Command::new(&blender_path);
        cmd.arg("--background")
            .arg("--factory-startup")
            .arg("--python")
            .arg(&entrypoint.path)
            .arg("--")
            .arg("--job")
            .arg(job_path)
            .arg("--report")
            .arg(report_path)
            .stdin(Stdio::null());

        if self.config.capture_output {
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        info!(blender = %blender_path.display(), job = %job_path.display(), "spawning Blender");
        let child = cmd.spawn().map_err(BlenderError::SpawnFailed)?;
        let (status, stderr) = wait_with_timeout(child, self.config.timeout)?;

        // The entrypoint writes a report even when it exits non-zero; prefer
        // its message over the raw exit status.
        let report = read_report(report_path);
        if !status.success() {
            if let Ok(RenderReport {
                error: Some(message),
                ..
            }) = report
            {
                return Err(BlenderError::render_failed(message));
            }
            return Err(BlenderError::process_failed(
                status.code().unwrap_or(-1),
                stderr,
            ));
        }

        let report = report?;
        if !report.ok {
            return Err(BlenderError::render_failed(
                report.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        debug!(duration_ms = ?report.duration_ms, "Blender finished");
        Ok(report)
    }

    /// Writes the job to a temp directory, then runs Blender on it.
    pub fn run_job(&self, job: &RenderJob) -> BlenderResult<RenderReport> {
        let temp_dir = tempfile::tempdir().map_err(BlenderError::Io)?;
        let job_path = temp_dir.path().join("job.json");
        let report_path = temp_dir.path().join("report.json");

        let job_json = serde_json::to_string_pretty(job).map_err(BlenderError::SerializeFailed)?;
        std::fs::write(&job_path, job_json).map_err(BlenderError::WriteJobFailed)?;

        self.run(&job_path, &report_path)
    }
}

fn read_report(report_path: &Path) -> BlenderResult<RenderReport> {
    let content =
        std::fs::read_to_string(report_path).map_err(|e| BlenderError::ReadReportFailed {
            path: report_path.to_path_buf(),
            source: e,
        })?;
    serde_json::from_str(&content).map_err(BlenderError::ParseReportFailed)
}

fn wait_with_timeout(
    mut child: Child,
    timeout: Option<Duration>,
) -> BlenderResult<(ExitStatus, String)> {
    // Drain stderr on a separate thread so a chatty Blender cannot fill the pipe.
    let stderr_reader: Option<JoinHandle<String>> = child.stderr.take().map(|mut err| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = err.read_to_string(&mut buf);
            buf
        })
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if let Some(limit) = timeout {
                    if start.elapsed() > limit {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(BlenderError::Timeout {
                            timeout_secs: limit.as_secs(),
                        });
                    }
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(BlenderError::SpawnFailed(e)),
        }
    };

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    Ok((status, stderr))
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", script]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", script]);
            cmd
        }
    }

    #[test]
    fn test_config_builder() {
        let config = OrchestratorConfig::with_entrypoint("custom/path.py")
            .blender_path("/usr/bin/blender")
            .timeout_secs(600);

        assert_eq!(config.entrypoint_path, Some(PathBuf::from("custom/path.py")));
        assert_eq!(config.blender_path, Some(PathBuf::from("/usr/bin/blender")));
        assert_eq!(config.timeout, Some(Duration::from_secs(600)));
        assert!(config.capture_output);
        assert_eq!(OrchestratorConfig::new().timeout, None);
    }

    #[test]
    fn test_wait_captures_stderr() {
        let mut cmd = shell("echo hello 1>&2");
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        let child = cmd.spawn().unwrap();

        let (status, stderr) = wait_with_timeout(child, None).unwrap();
        assert!(status.success());
        assert!(stderr.to_lowercase().contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_times_out() {
        let mut cmd = shell("sleep 5");
        cmd.stderr(Stdio::piped());
        let child = cmd.spawn().unwrap();

        let err = wait_with_timeout(child, Some(Duration::from_millis(200))).unwrap_err();
        assert!(matches!(err, BlenderError::Timeout { .. }));
    }

    #[test]
    fn test_missing_configured_entrypoint_is_an_error() {
        let config = OrchestratorConfig::with_entrypoint("this/does/not/exist.py");
        let orchestrator = Orchestrator::with_config(config);
        assert!(matches!(
            orchestrator.resolve_entrypoint(),
            Err(BlenderError::EntrypointNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_entrypoint_falls_back_to_embedded() {
        // If the user has configured an environment override, don't stomp it.
        if std::env::var_os(ENTRYPOINT_ENV).is_some() {
            eprintln!("{} is set; skipping embedded entrypoint test", ENTRYPOINT_ENV);
            return;
        }

        let orchestrator = Orchestrator::new();
        let entrypoint = orchestrator.resolve_entrypoint().unwrap();
        assert!(entrypoint.path.exists());

        let content = std::fs::read_to_string(&entrypoint.path).unwrap();
        assert!(content.contains("Hullsprite Blender entrypoint"));
    }

    #[test]
    fn test_read_report_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        assert!(matches!(
            read_report(&path),
            Err(BlenderError::ReadReportFailed { .. })
        ));
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            read_report(&path),
            Err(BlenderError::ParseReportFailed(_))
        ));
    }
}
