use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::control_spec::RawControl;
use crate::memtree::{MemNode, NodeSpec};
use crate::ConfigError;

/// A page: the filterable items plus the distance controls attached to them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFile {
    #[serde(default)]
    pub items: Vec<NodeSpec>,
    #[serde(default)]
    pub controls: Vec<RawControl>,
}

impl PageFile {
    /// Materializes the item descriptions as live nodes.
    #[must_use]
    pub fn build_items(&self) -> Vec<MemNode> {
        self.items.iter().map(MemNode::from_spec).collect()
    }
}

/// Load and validate a page description from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_page(path: &Path) -> Result<PageFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PageFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_page(&content)
}

/// Parse and validate a page description from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the text does not parse or fails validation.
pub fn parse_page(content: &str) -> Result<PageFile, ConfigError> {
    let page: PageFile = serde_yaml::from_str(content).map_err(ConfigError::PageFileParse)?;
    validate_page(&page)?;
    Ok(page)
}

fn validate_page(page: &PageFile) -> Result<(), ConfigError> {
    for control in &page.controls {
        if control.group.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "control '{}' has an empty group",
                control.name
            )));
        }
        if control.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "control in group '{}' has an empty name",
                control.group
            )));
        }
        if control.max_distance.is_some_and(|d| !d.is_finite() || d < 0.0) {
            return Err(ConfigError::Validation(format!(
                "control '{}' has an invalid max_distance",
                control.name
            )));
        }
    }
    Ok(())
}
