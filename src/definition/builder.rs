use log::info;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::handle::DefinitionHandle;
use super::naming::definition_path;
use super::store::{FrameRepeat, MeasurementDefinition, ScanDefinitionStore, StoreError};
use crate::config::DefinitionsConfig;
use crate::planner::ScanPlan;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("definition {path} could not be written and read back: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

/// Reads a definition back and logs its summary.
pub fn review<S: ScanDefinitionStore>(
    store: &S,
    path: &Path,
) -> Result<MeasurementDefinition, StoreError> {
    let definition = store.read(path)?;
    info!("{}:\n{}", path.display(), store.render(&definition));
    Ok(definition)
}

/// Writes scan plans into measurement definition documents.
pub struct DefinitionBuilder<'a, S> {
    store: &'a S,
    workdir: PathBuf,
    chirp_program: u32,
    calibration_interval: u32,
}

impl<'a, S: ScanDefinitionStore> DefinitionBuilder<'a, S> {
    pub fn new(store: &'a S, config: &DefinitionsConfig) -> Self {
        Self {
            store,
            workdir: config.workdir.clone(),
            chirp_program: config.chirp_program,
            calibration_interval: config.calibration_interval,
        }
    }

    /// Returns the definitions to run in order. With `separate_files` (and
    /// always for one-shot plans) every sweep direction gets its own
    /// document and the list walks through the whole session leg by leg.
    /// Otherwise a single document lets the radar alternate the legs.
    pub fn build(
        &self,
        plan: &ScanPlan,
        basename: Option<&str>,
        separate_files: bool,
    ) -> Result<Vec<DefinitionHandle>, DefinitionError> {
        let basename = basename.unwrap_or_else(|| plan.kind.default_basename());

        if separate_files || plan.once {
            let mut legs = Vec::new();
            for (index, sweep) in plan.legs().into_iter().enumerate() {
                let path = definition_path(&self.workdir, plan.kind, Some(index));
                let definition = MeasurementDefinition {
                    chirp_program: self.chirp_program,
                    scans: vec![sweep],
                    frames: vec![FrameRepeat::once(0)],
                    duration: plan.one_scan_duration,
                    file_length: plan.one_scan_duration,
                    calibration_interval: self.calibration_interval,
                    basename: basename.to_string(),
                };
                self.write(&path, &definition)?;
                legs.push(DefinitionHandle::from_path(&path));
            }

            let repetitions = plan.pair_repetitions() as usize;
            Ok(legs
                .iter()
                .cycle()
                .take(legs.len() * repetitions)
                .cloned()
                .collect())
        } else {
            let path = definition_path(&self.workdir, plan.kind, None);
            let definition = MeasurementDefinition {
                chirp_program: self.chirp_program,
                scans: plan.legs(),
                frames: vec![FrameRepeat {
                    first: 0,
                    last: 1,
                    repetitions: plan.pair_repetitions(),
                }],
                duration: plan.total_duration,
                file_length: plan.one_scan_duration,
                calibration_interval: self.calibration_interval,
                basename: basename.to_string(),
            };
            self.write(&path, &definition)?;
            Ok(vec![DefinitionHandle::from_path(&path)])
        }
    }

    fn write(&self, path: &Path, definition: &MeasurementDefinition) -> Result<(), DefinitionError> {
        let wrap = |source| DefinitionError::Write {
            path: path.to_path_buf(),
            source,
        };
        self.store.create(path, definition).map_err(wrap)?;
        info!("Made {}", path.display());
        review(self.store, path).map_err(wrap)?;
        Ok(())
    }
}
