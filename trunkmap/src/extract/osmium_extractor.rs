use super::{CommandRunner, ExtractionError};
use crate::{
    model::{BboxOrder, BoundingBox},
    util::fs::create_parent_dirs,
};
use std::path::Path;

/// clips an OSM file to a bounding box with `osmium extract`.
pub struct OsmiumExtractor<'a> {
    program: String,
    bbox_order: BboxOrder,
    runner: &'a dyn CommandRunner,
}

impl<'a> OsmiumExtractor<'a> {
    pub fn new(program: &str, bbox_order: BboxOrder, runner: &'a dyn CommandRunner) -> Self {
        OsmiumExtractor {
            program: String::from(program),
            bbox_order,
            runner,
        }
    }

    /// argument list for one extraction. `--overwrite` is added when an
    /// existing output may be replaced.
    pub fn arguments(
        &self,
        source: &Path,
        bbox: &BoundingBox,
        output: &Path,
        overwrite: bool,
    ) -> Vec<String> {
        let mut args = vec![
            String::from("extract"),
            String::from("-b"),
            bbox.to_extract_arg(self.bbox_order),
            source.display().to_string(),
            String::from("-o"),
            output.display().to_string(),
        ];
        if overwrite {
            args.push(String::from("--overwrite"));
        }
        args
    }

    /// writes the part of `source` within `bbox` to `output`, creating its
    /// parent directories. the tool's stderr is returned verbatim on failure.
    pub fn extract(
        &self,
        source: &Path,
        bbox: &BoundingBox,
        output: &Path,
        overwrite: bool,
    ) -> Result<(), ExtractionError> {
        if !source.is_file() {
            return Err(ExtractionError::SourceMissing(source.to_path_buf()));
        }
        if output.exists() && !overwrite {
            return Err(ExtractionError::OutputExists(output.to_path_buf()));
        }
        create_parent_dirs(output).map_err(|e| ExtractionError::OutputDirectory {
            path: output.to_path_buf(),
            source: e,
        })?;

        let args = self.arguments(source, bbox, output, overwrite);
        log::info!("running: {} {}", self.program, args.join(" "));
        let result = self
            .runner
            .run(&self.program, &args)
            .map_err(|e| ExtractionError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;
        if !result.stdout.trim().is_empty() {
            log::debug!("{}", result.stdout.trim_end());
        }
        if result.success() {
            log::info!("wrote {}", output.display());
            Ok(())
        } else {
            Err(ExtractionError::CommandFailed {
                program: self.program.clone(),
                status: result.status,
                stderr: result.stderr,
            })
        }
    }
}
