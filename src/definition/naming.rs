use std::path::{Path, PathBuf};

use crate::planner::ScanKind;

pub const DEFINITION_EXTENSION: &str = "MDF";

/// File a definition of `kind` is written to. Multi-leg plans get the leg
/// index appended to the stem, e.g. `SCAN_SECTOR1.MDF`.
pub fn definition_path(workdir: &Path, kind: ScanKind, leg: Option<usize>) -> PathBuf {
    let file_name = match leg {
        Some(leg) => format!("{}{}.{}", kind, leg, DEFINITION_EXTENSION),
        None => format!("{}.{}", kind, DEFINITION_EXTENSION),
    };
    workdir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_document_uses_bare_kind() {
        let path = definition_path(Path::new("/data/mdf"), ScanKind::Elevation, None);
        assert_eq!(path, PathBuf::from("/data/mdf/SCAN_ELEVATION.MDF"));
    }

    #[test]
    fn legs_are_suffixed_before_extension() {
        let workdir = Path::new("mdf");
        assert_eq!(
            definition_path(workdir, ScanKind::Sector, Some(0)),
            PathBuf::from("mdf/SCAN_SECTOR0.MDF")
        );
        assert_eq!(
            definition_path(workdir, ScanKind::Sector, Some(1)),
            PathBuf::from("mdf/SCAN_SECTOR1.MDF")
        );
        assert_eq!(
            definition_path(workdir, ScanKind::Ppi, Some(0)),
            PathBuf::from("mdf/SCAN_PPI0.MDF")
        );
        assert_eq!(
            definition_path(workdir, ScanKind::Rhi, Some(0)),
            PathBuf::from("mdf/SCAN_RHI0.MDF")
        );
    }
}
