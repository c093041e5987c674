use super::{
    build_clipped_graph, osm_xml_ops::read_osm_xml, pbf_ops::read_pbf, Extent, NetworkSource,
    SourceError,
};
use crate::{filter::NetworkFilter, model::RoadGraph};
use std::path::{Path, PathBuf};

/// a pre-clipped intermediate file written by the extraction tool. `.pbf`
/// files are read as PBF, `.osm` and `.xml` files as OSM XML.
pub struct ClippedFileSource {
    path: PathBuf,
    filter: NetworkFilter,
    truncate_by_edge: bool,
}

impl ClippedFileSource {
    pub fn new(path: &Path, filter: NetworkFilter, truncate_by_edge: bool) -> ClippedFileSource {
        ClippedFileSource {
            path: path.to_path_buf(),
            filter,
            truncate_by_edge,
        }
    }
}

impl NetworkSource for ClippedFileSource {
    fn name(&self) -> &str {
        "clipped extract"
    }

    fn acquire(&self, extent: &Extent) -> Result<RoadGraph, SourceError> {
        let bbox = extent
            .bbox()
            .ok_or_else(|| SourceError::UnsupportedExtent(String::from(self.name())))?;
        if !self.path.is_file() {
            return Err(SourceError::FileNotFound(self.path.clone()));
        }
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let (nodes, ways) = match extension.as_deref() {
            Some("pbf") => read_pbf(&self.path, &self.filter, None)?,
            Some("osm") | Some("xml") => read_osm_xml(&self.path, &self.filter)?,
            _ => return Err(SourceError::UnsupportedFormat(self.path.clone())),
        };
        Ok(build_clipped_graph(nodes, ways, bbox, self.truncate_by_edge))
    }
}
