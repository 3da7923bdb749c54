// Configuration files: TOML on disk into OptimizerConfig

use std::path::Path;

use crate::application::OptimizerConfig;
use crate::domain::OptimizerError;

pub fn load_config(path: impl AsRef<Path>) -> Result<OptimizerConfig, OptimizerError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| OptimizerError::Config(format!("{}: {}", path.display(), e)))?;
    parse_config(&text)
}

pub fn parse_config(text: &str) -> Result<OptimizerConfig, OptimizerError> {
    let config: OptimizerConfig =
        toml::from_str(text).map_err(|e| OptimizerError::Config(e.to_string()))?;
    config.validate().map_err(OptimizerError::Config)?;
    Ok(config)
}
