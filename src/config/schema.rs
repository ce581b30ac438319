use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the directory, relative to the trace directory, holding
/// content-addressed resource blobs.
pub const DEFAULT_RESOURCES_SUBDIR: &str = "resources";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Directory a recording was written to
    #[serde(default = "TraceConfig::default_trace_dir")]
    pub trace_dir: PathBuf,

    /// Resources directory, relative to `trace_dir`
    #[serde(default = "default_resources_subdir")]
    pub resources_subdir: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            trace_dir: Self::default_trace_dir(),
            resources_subdir: default_resources_subdir(),
        }
    }
}

impl TraceConfig {
    /// Config rooted at an explicit trace directory.
    pub fn for_trace_dir(trace_dir: impl Into<PathBuf>) -> Self {
        Self {
            trace_dir: trace_dir.into(),
            ..Self::default()
        }
    }

    /// Directory where resource blobs are stored, one file per content hash.
    pub fn resources_dir(&self) -> PathBuf {
        self.trace_dir.join(&self.resources_subdir)
    }

    fn default_trace_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("browsion")
            .join("traces")
    }
}

fn default_resources_subdir() -> String {
    DEFAULT_RESOURCES_SUBDIR.to_string()
}
