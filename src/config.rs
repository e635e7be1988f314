use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HuffmanError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Inputs at least this long are counted in parallel chunks.
    pub parallel_threshold: usize,
    /// Symbols per chunk when counting in parallel.
    pub chunk_size: usize,
    /// Decode every artifact right after building it and compare with the
    /// input before handing it out.
    pub verify: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 1 << 20,
            chunk_size: 256 * 1024,
            verify: false,
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(HuffmanError::Config("chunk_size must be positive".into()));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: CodecConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
