use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Reference to a measurement definition: either a local file path or the
/// name of a definition already installed on the radar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DefinitionHandle(String);

impl DefinitionHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// True when the definition exists on this machine and has to be sent
    /// to the radar, false when it is assumed to live on the radar already.
    pub fn is_local(&self) -> bool {
        Path::new(&self.0).exists()
    }

    /// Whether the radar reporting `active` as its running definition means
    /// this one is running. The radar may report a bare file name for a
    /// local path, so this is a case-insensitive suffix match. It is loose:
    /// `OLD_SCAN_PPI.MDF` also matches an active `SCAN_PPI.MDF`.
    pub fn matches_active(&self, active: &str) -> bool {
        let active = active.trim();
        !active.is_empty() && self.0.to_lowercase().ends_with(&active.to_lowercase())
    }
}

impl fmt::Display for DefinitionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Path> for DefinitionHandle {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_matches_bare_name_ignoring_case() {
        let handle = DefinitionHandle::new("/data/mdf/SCAN_RHI0.MDF");
        assert!(handle.matches_active("scan_rhi0.mdf"));
        assert!(handle.matches_active("SCAN_RHI0.MDF"));
        assert!(handle.matches_active("/data/mdf/SCAN_RHI0.MDF"));
        assert!(!handle.matches_active("SCAN_RHI1.MDF"));
    }

    #[test]
    fn empty_active_name_never_matches() {
        let handle = DefinitionHandle::new("SCAN_PPI.MDF");
        assert!(!handle.matches_active(""));
        assert!(!handle.matches_active("  "));
    }

    #[test]
    fn shared_suffix_is_accepted() {
        let handle = DefinitionHandle::new("OLD_SCAN_PPI.MDF");
        assert!(handle.matches_active("SCAN_PPI.MDF"));
    }

    #[test]
    fn missing_file_is_not_local() {
        let handle = DefinitionHandle::new("/nonexistent/definitely/NOT_HERE.MDF");
        assert!(!handle.is_local());
    }
}
