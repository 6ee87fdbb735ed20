use anyhow::{Context, Result};
use chrono::Local;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Child;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use crate::command::CommandRunner;

/// Restricts a capture to a single access point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFilter {
    pub bssid: String,
    pub channel: String,
}

/// Arguments for `airodump-ng`, run through sudo.
pub fn airodump_args(prefix: &str, iface: &str, filter: Option<&CaptureFilter>) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "airodump-ng".into(),
        "-w".into(),
        prefix.into(),
        "--write-interval".into(),
        "1".into(),
        "--output-format".into(),
        "csv".into(),
    ];
    if let Some(filter) = filter {
        args.extend(["--bssid".into(), filter.bssid.clone()]);
        if !filter.channel.is_empty() {
            args.extend(["--channel".into(), filter.channel.clone()]);
        }
    }
    args.push(iface.into());
    args
}

/// A running external capture process.
///
/// The child is stopped on [`CaptureSession::stop`] or when the session is
/// dropped, whichever comes first.
pub struct CaptureSession {
    child: Option<Child>,
    stop_timeout: Duration,
}

impl CaptureSession {
    pub fn new(child: Child, stop_timeout: Duration) -> Self {
        CaptureSession {
            child: Some(child),
            stop_timeout,
        }
    }

    /// Start airodump-ng writing CSV snapshots into `workdir`.
    pub fn start_airodump(
        runner: &dyn CommandRunner,
        workdir: &Path,
        prefix: &str,
        iface: &str,
        filter: Option<&CaptureFilter>,
        stop_timeout: Duration,
    ) -> Result<Self> {
        let args = airodump_args(prefix, iface, filter);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let child = runner
            .spawn("sudo", &args, workdir)
            .context("Failed to start airodump-ng")?;
        Ok(Self::new(child, stop_timeout))
    }

    #[cfg(test)]
    fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// SIGTERM, wait up to the timeout, then SIGKILL. Errors are ignored.
    pub fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Ok(Some(_)) = child.try_wait() {
            return;
        }

        if let Ok(pid) = i32::try_from(child.id()) {
            kill(Pid::from_raw(pid), Signal::SIGTERM).ok();
        }

        let deadline = Instant::now() + self.stop_timeout;
        while Instant::now() < deadline {
            match child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) => thread::sleep(Duration::from_millis(50)),
                Err(_) => break,
            }
        }

        child.kill().ok();
        child.wait().ok();
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Newest `<prefix>-*.csv` in `dir` by modification time.
pub fn find_latest_csv(dir: &Path, prefix: &str) -> Option<PathBuf> {
    let head = format!("{}-", prefix);
    let entries = fs::read_dir(dir).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.starts_with(&head) && name.ends_with(".csv"))
        })
        .filter_map(|path| modified(&path).map(|time| (time, path)))
        .max_by_key(|(time, _)| *time)
        .map(|(_, path)| path)
}

/// Move every `*.csv` in `dir` into `dir/backup_dir` with a timestamp prefix.
///
/// Returns how many files were moved. A file that cannot be renamed stays
/// where it is.
pub fn backup_existing_csvs(dir: &Path, backup_dir: &str) -> Result<usize> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    let csv_files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().map_or(false, |ext| ext == "csv"))
        .collect();

    if csv_files.is_empty() {
        return Ok(0);
    }

    let target = dir.join(backup_dir);
    fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create {}", target.display()))?;

    let mut moved = 0;
    for file in csv_files {
        let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let dest = target.join(format!("{}-{}", stamp, name));
        if fs::rename(&file, &dest).is_ok() {
            moved += 1;
        }
    }

    Ok(moved)
}
