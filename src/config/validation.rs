use crate::config::schema::TraceConfig;
use crate::error::{Result, TraceError};

/// Validate trace configuration
pub fn validate_config(config: &TraceConfig) -> Result<()> {
    if config.trace_dir.as_os_str().is_empty() {
        return Err(TraceError::Validation(
            "Trace directory cannot be empty".to_string(),
        ));
    }

    let subdir = config.resources_subdir.trim();
    if subdir.is_empty() {
        return Err(TraceError::Validation(
            "Resources subdirectory cannot be empty".to_string(),
        ));
    }

    // Must stay inside the trace directory
    if subdir.starts_with('/')
        || subdir.starts_with('\\')
        || subdir.split(['/', '\\']).any(|c| c == "..")
    {
        return Err(TraceError::Validation(format!(
            "Resources subdirectory {:?} must be relative to the trace directory",
            config.resources_subdir
        )));
    }

    Ok(())
}
