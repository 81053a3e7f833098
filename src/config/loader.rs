use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::core::{ReadinessConfig, ReportConfig};
use super::classifier::ClassifierConfig;
use super::scale::RatingScale;
use super::ConfigError;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".readiness.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document and reset any section whose values are invalid.
pub fn parse_and_validate_config(contents: &str) -> Result<ReadinessConfig, ConfigError> {
    let mut config = toml::from_str::<ReadinessConfig>(contents)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    if let Err(e) = config.scale.validate() {
        warn!("Invalid rating scale: {}. Using defaults.", e);
        config.scale = RatingScale::default();
    }
    if let Err(e) = config.classifier.validate() {
        warn!("Invalid classifier settings: {}. Using defaults.", e);
        config.classifier = ClassifierConfig::default();
    }
    if let Err(e) = config.reports.validate() {
        warn!("Invalid report settings: {}. Using defaults.", e);
        config.reports = ReportConfig::default();
    }

    Ok(config)
}

/// Load an explicitly requested config file; failures are reported, not hidden.
pub fn load_config_from(path: &Path) -> Result<ReadinessConfig, ConfigError> {
    let contents = read_config_file(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_and_validate_config(&contents)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<ReadinessConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{} in {}. Using defaults.", e, config_path.display());
            None
        }
    }
}

pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // "not found" is the normal case while walking up the tree
    if error.kind() != std::io::ErrorKind::NotFound {
        warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its ancestors, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.readiness.toml` from `start` upwards.
pub fn load_config_near(start: PathBuf) -> ReadinessConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            ReadinessConfig::default()
        })
}

pub fn load_config() -> ReadinessConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_near(dir),
        Err(e) => {
            warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            ReadinessConfig::default()
        }
    }
}

/// Default configuration rendered as TOML, as written by `readiness init`.
pub fn default_config_toml() -> Result<String, ConfigError> {
    toml::to_string_pretty(&ReadinessConfig::default())
        .map_err(|e| ConfigError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config, ReadinessConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [scale]
            max = 5

            [classifier]
            timeout_seconds = 5
            command = ["classify", "--json"]
        "#})
        .unwrap();

        assert_eq!(config.scale.min, 1);
        assert_eq!(config.scale.max, 5);
        assert_eq!(config.classifier.timeout_seconds, 5);
        assert_eq!(config.classifier.max_themes, 5);
        assert_eq!(
            config.classifier.command,
            Some(vec!["classify".to_string(), "--json".to_string()])
        );
        assert!(config.validation.allow_skipped_ratings);
    }

    #[test]
    fn invalid_section_falls_back_to_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [scale]
            min = 6
            max = 1

            [reports]
            top_items = 3
        "#})
        .unwrap();

        assert_eq!(config.scale, RatingScale::default());
        assert_eq!(config.reports.top_items, 3);
    }

    #[test]
    fn oversized_concurrency_falls_back_to_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [classifier]
            max_concurrent_requests = 9000000000000000000
            max_themes = 3
        "#})
        .unwrap();

        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = parse_and_validate_config("[scale\nmin = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn nearest_config_wins() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("cohorts").join("spring");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[reports]\nmin_impact_participants = 7\n",
        )
        .unwrap();

        let config = load_config_near(nested);
        assert_eq!(config.reports.min_impact_participants, 7);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn default_toml_parses_back() {
        let rendered = default_config_toml().unwrap();
        let parsed = parse_and_validate_config(&rendered).unwrap();
        assert_eq!(parsed, ReadinessConfig::default());
    }

    #[test]
    fn ancestors_are_bounded() {
        let start = PathBuf::from("/a/b/c/d");
        let dirs: Vec<PathBuf> = directory_ancestors(start, 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b"),
            ]
        );
    }
}
