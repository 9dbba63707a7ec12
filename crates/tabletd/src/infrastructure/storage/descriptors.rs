//! Tablet descriptor configuration loading.
//!
//! Each supported tablet model is described by one JSON file in the
//! descriptor directory.  Detection walks the candidates in directory
//! order and binds the first model whose hardware is attached, so a file
//! that fails to parse is skipped with a warning rather than aborting
//! detection of the remaining models.

use std::path::PathBuf;

use tablet_core::TabletDescriptor;
use tracing::{debug, warn};

/// Supplies the candidate tablet models detection walks through.
pub trait DescriptorSource: Send {
    /// Returns the candidates in detection order.
    fn candidates(&self) -> Vec<TabletDescriptor>;
}

/// Loads `*.json` descriptor files from one directory.
pub struct FileDescriptorSource {
    dir: PathBuf,
}

impl FileDescriptorSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DescriptorSource for FileDescriptorSource {
    fn candidates(&self) -> Vec<TabletDescriptor> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "cannot read descriptor directory");
                return Vec::new();
            }
        };

        let mut descriptors = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot read descriptor file");
                    continue;
                }
            };
            match serde_json::from_str::<TabletDescriptor>(&content) {
                Ok(descriptor) => {
                    debug!(path = %path.display(), tablet = descriptor.name.as_str(), "descriptor loaded");
                    descriptors.push(descriptor);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping malformed descriptor");
                }
            }
        }
        descriptors
    }
}

/// A fixed in-memory candidate list, for tests and embedded defaults.
pub struct StaticDescriptorSource {
    descriptors: Vec<TabletDescriptor>,
}

impl StaticDescriptorSource {
    pub fn new(descriptors: Vec<TabletDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl DescriptorSource for StaticDescriptorSource {
    fn candidates(&self) -> Vec<TabletDescriptor> {
        self.descriptors.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("tabletd_desc_{}_{}", label, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn descriptor_json(name: &str, vendor_id: u16, product_id: u16) -> String {
        format!(
            r#"{{
    "name": "{name}",
    "vendor_id": {vendor_id},
    "product_id": {product_id},
    "width": 152.0,
    "height": 95.0,
    "max_x": 15200,
    "max_y": 9500,
    "max_pressure": 2047
}}"#
        )
    }

    #[test]
    fn test_loads_descriptors_from_json_files() {
        // Arrange
        let dir = temp_dir("load");
        std::fs::write(dir.join("model_a.json"), descriptor_json("Model A", 1, 2)).unwrap();
        let source = FileDescriptorSource::new(&dir);

        // Act
        let candidates = source.candidates();

        // Assert – optional fields fall back to their serde defaults
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Model A");
        assert_eq!(candidates[0].report_id, 0x01);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_descriptor_is_skipped_not_fatal() {
        let dir = temp_dir("malformed");
        std::fs::write(dir.join("bad.json"), "{ not json").unwrap();
        std::fs::write(dir.join("good.json"), descriptor_json("Good", 3, 4)).unwrap();
        let source = FileDescriptorSource::new(&dir);

        let candidates = source.candidates();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Good");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_non_json_files_are_ignored() {
        let dir = temp_dir("ignore");
        std::fs::write(dir.join("readme.txt"), "not a descriptor").unwrap();
        let source = FileDescriptorSource::new(&dir);

        assert!(source.candidates().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_directory_yields_empty_list() {
        let source = FileDescriptorSource::new("/nonexistent/descriptor/dir");

        assert!(source.candidates().is_empty());
    }
}
