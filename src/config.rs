//! Tiler parameter files.
//!
//! A parameter file is a JSON or TOML document whose keys are
//! [`TilerParams`] fields. Missing keys take their defaults.

use crate::core::error::ConfigError;
use crate::texture::TilerParams;
use std::path::Path;

/// Load parameters from `path`, choosing the format by extension.
pub fn load_params(path: impl AsRef<Path>) -> Result<TilerParams, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if extension != "json" && extension != "toml" {
        return Err(ConfigError::UnsupportedFormat(extension));
    }

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let params = parse_params(&text, &extension)?;
    log::debug!("loaded parameters from {}", path.display());
    Ok(params)
}

/// Parse parameter text in the given format (`"json"` or `"toml"`).
pub fn parse_params(text: &str, format: &str) -> Result<TilerParams, ConfigError> {
    match format {
        "json" => Ok(serde_json::from_str(text)?),
        "toml" => Ok(toml::from_str(text)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{PatternType, TextureDirection};
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(".json", r#"{"tile_size": 256, "pattern_type": "rotate", "edge_blur": 20}"#);
        let params = load_params(file.path()).unwrap();
        assert_eq!(params.tile_size, 256);
        assert_eq!(params.pattern_type, PatternType::Rotate);
        assert_eq!(params.edge_blur, 20.0);
        assert_eq!(params.overlap, TilerParams::default().overlap);
    }

    #[test]
    fn test_load_toml() {
        let file = write_temp(
            ".toml",
            "overlap = 32\ntexture_direction = \"diagonal\"\ncolor_correction = true\n",
        );
        let params = load_params(file.path()).unwrap();
        assert_eq!(params.overlap, 32);
        assert_eq!(params.texture_direction, TextureDirection::Diagonal);
        assert!(params.color_correction);
    }

    #[test]
    fn test_errors() {
        let file = write_temp(".yaml", "tile_size: 256");
        assert!(matches!(
            load_params(file.path()),
            Err(ConfigError::UnsupportedFormat(ref ext)) if ext == "yaml"
        ));

        let file = write_temp(".json", r#"{"pattern_type": "spiral"}"#);
        assert!(matches!(load_params(file.path()), Err(ConfigError::Json(_))));

        let file = write_temp(".toml", "tile_size = \"big\"");
        assert!(matches!(load_params(file.path()), Err(ConfigError::Toml(_))));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_params(dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
