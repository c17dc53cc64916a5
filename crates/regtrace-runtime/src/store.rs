use crate::Result;
use regtrace_types::{EvalResult, TraceSession};
use std::path::{Path, PathBuf};

/// Well-known locations under the project-local `.regtrace/` directory.
///
/// The baseline file is the durable ground truth for comparisons; it is
/// only ever replaced wholesale (`--save-baseline`), never mutated by a
/// comparison.
#[derive(Debug, Clone)]
pub struct TraceStore {
    root: PathBuf,
}

impl TraceStore {
    pub fn new(project_root: &Path) -> Self {
        Self {
            root: project_root.join(".regtrace"),
        }
    }

    pub fn traces_dir(&self) -> PathBuf {
        self.root.join("traces")
    }

    pub fn baseline_path(&self) -> PathBuf {
        self.root.join("baseline.json")
    }

    pub fn results_path(&self) -> PathBuf {
        self.root.join("results.json")
    }

    /// Timestamped output path for a session. The start-time prefix keeps
    /// the traces directory sorted chronologically.
    pub fn session_path(&self, session: &TraceSession) -> PathBuf {
        let stamp = session.start_time.format("%Y%m%dT%H%M%S%3f");
        self.traces_dir()
            .join(format!("{}-{}.json", stamp, session.id))
    }

    /// Write a session as pretty JSON, creating parent directories.
    /// Write failures are fatal to the run (resource acquisition).
    pub fn save_session(&self, session: &TraceSession, path: &Path) -> Result<()> {
        write_json(path, session)
    }

    pub fn save_session_as_baseline(&self, session: &TraceSession) -> Result<PathBuf> {
        let path = self.baseline_path();
        write_json(&path, session)?;
        Ok(path)
    }

    pub fn save_results(&self, results: &EvalResult) -> Result<PathBuf> {
        let path = self.results_path();
        write_json(&path, results)?;
        Ok(path)
    }

    /// Read a baseline session. Absent file is "no comparison available";
    /// a malformed file is logged and likewise skipped.
    pub fn load_baseline_session(&self, path: &Path) -> Option<TraceSession> {
        load_json(path)
    }

    /// Read a baseline eval result, with the same missing/malformed policy.
    pub fn load_baseline_eval(&self, path: &Path) -> Option<EvalResult> {
        load_json(path)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(value)?;
    std::fs::write(path, data)?;
    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(_) => return None,
    };
    match serde_json::from_str(&data) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "baseline file is malformed, skipping comparison");
            None
        }
    }
}
