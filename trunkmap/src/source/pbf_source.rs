use super::{
    build_clipped_graph,
    pbf_ops::{read_pbf, BUFFER_500M_IN_DEGREES},
    Extent, NetworkSource, SourceError,
};
use crate::{filter::NetworkFilter, model::RoadGraph};
use std::path::{Path, PathBuf};

/// a raw regional PBF file, streamed with a buffered extent filter.
pub struct PbfSource {
    path: PathBuf,
    filter: NetworkFilter,
    truncate_by_edge: bool,
}

impl PbfSource {
    pub fn new(path: &Path, filter: NetworkFilter, truncate_by_edge: bool) -> PbfSource {
        PbfSource {
            path: path.to_path_buf(),
            filter,
            truncate_by_edge,
        }
    }
}

impl NetworkSource for PbfSource {
    fn name(&self) -> &str {
        "pbf"
    }

    fn acquire(&self, extent: &Extent) -> Result<RoadGraph, SourceError> {
        let bbox = extent
            .bbox()
            .ok_or_else(|| SourceError::UnsupportedExtent(String::from(self.name())))?;
        log::info!("buffering extent for initial download filtering");
        let buffered = bbox.buffered(BUFFER_500M_IN_DEGREES);
        let (nodes, ways) = read_pbf(&self.path, &self.filter, Some(&buffered))?;
        Ok(build_clipped_graph(nodes, ways, bbox, self.truncate_by_edge))
    }
}
