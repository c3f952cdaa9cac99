use std::fs;
use std::path::Path;

use super::store::{MeasurementDefinition, ScanDefinitionStore, StoreError};

/// Stores definitions as YAML documents on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDefinitionStore;

impl YamlDefinitionStore {
    pub fn new() -> Self {
        Self
    }
}

impl ScanDefinitionStore for YamlDefinitionStore {
    fn create(&self, path: &Path, definition: &MeasurementDefinition) -> Result<(), StoreError> {
        definition.validate()?;
        if let Some(folder) = path.parent() {
            fs::create_dir_all(folder)?;
        }
        fs::write(path, serde_yaml::to_string(definition)?)?;
        Ok(())
    }

    fn read(&self, path: &Path) -> Result<MeasurementDefinition, StoreError> {
        let content = fs::read_to_string(path)?;
        let definition: MeasurementDefinition = serde_yaml::from_str(&content)?;
        definition.validate()?;
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FrameRepeat;
    use crate::planner::AxisMove;

    fn sweep() -> AxisMove {
        AxisMove {
            elevation: 90.0,
            elevation_target: 60.0,
            azimuth: 0.0,
            azimuth_target: 0.0,
            elevation_speed: 1.0,
            azimuth_speed: 5.0,
        }
    }

    fn definition() -> MeasurementDefinition {
        MeasurementDefinition {
            chirp_program: 7,
            scans: vec![sweep()],
            frames: vec![FrameRepeat::once(0)],
            duration: 30,
            file_length: 30,
            calibration_interval: 1,
            basename: "RHISCAN".into(),
        }
    }

    #[test]
    fn written_document_reads_back_and_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("SCAN_RHI0.MDF");
        let store = YamlDefinitionStore::new();

        store.create(&path, &definition()).unwrap();
        let read = store.read(&path).unwrap();

        assert_eq!(read, definition());
        let summary = store.render(&read);
        assert!(summary.starts_with("RHISCAN (chirp program 7"));
        assert!(summary.contains("scan 0: elv 90.00° -> 60.00°"));
    }

    #[test]
    fn frames_outside_the_scan_list_are_rejected() {
        let mut bad = definition();
        bad.frames = vec![FrameRepeat {
            first: 0,
            last: 1,
            repetitions: 3,
        }];
        let dir = tempfile::tempdir().unwrap();
        let result = YamlDefinitionStore::new().create(&dir.path().join("X.MDF"), &bad);
        assert!(matches!(result, Err(StoreError::Invalid(_))));
    }

    #[test]
    fn unreadable_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GARBAGE.MDF");
        fs::write(&path, "chirp_program: [not, a, number]").unwrap();
        assert!(matches!(
            YamlDefinitionStore::new().read(&path),
            Err(StoreError::Parse(_))
        ));
        assert!(matches!(
            YamlDefinitionStore::new().read(&dir.path().join("MISSING.MDF")),
            Err(StoreError::Io(_))
        ));
    }
}
