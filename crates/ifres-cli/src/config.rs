mod defaults;

use crate::cli::DetectArgs;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use ifres::core::spatial::IndexKind;
use ifres::engine::config::{AtomFilter, DetectionConfig, DetectionConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialDetectionConfig {
    target_chain: Option<String>,
    cutoff: Option<f64>,
    partners: Option<Vec<String>>,
    model: Option<usize>,
    include_hydrogens: Option<bool>,
    index: Option<String>,
}

impl PartialDetectionConfig {
    /// Fields set in `top` win over fields set in `self`.
    fn overlay(self, top: Self) -> Self {
        Self {
            target_chain: top.target_chain.or(self.target_chain),
            cutoff: top.cutoff.or(self.cutoff),
            partners: top.partners.or(self.partners),
            model: top.model.or(self.model),
            include_hydrogens: top.include_hydrogens.or(self.include_hydrogens),
            index: top.index.or(self.index),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
struct PartialOutputConfig {
    directory: Option<PathBuf>,
}

/// The contents of a `detect` config file; every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    detection: Option<PartialDetectionConfig>,
    output: Option<PartialOutputConfig>,
}

/// Everything the `detect` command needs after all configuration sources are merged.
#[derive(Debug, Clone)]
pub struct DetectSettings {
    pub detection: DetectionConfig,
    pub output_dir: PathBuf,
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the config file when one is given; otherwise starts from an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolves the final settings. Precedence, highest first: `--set` values, command-line
    /// flags, the config file, built-in defaults.
    pub fn merge_with_cli(self, args: &DetectArgs) -> Result<DetectSettings> {
        let mut set_layer = Self::default();
        set_layer.apply_set_values(&args.set_values)?;
        let merged = self.overlay(Self::from_args(args)).overlay(set_layer);

        let defaults = DefaultsConfig::default();
        let detection = merged.detection.unwrap_or_default();
        let output = merged.output.unwrap_or_default();

        let index_kind = match detection.index {
            Some(name) => name
                .parse::<IndexKind>()
                .map_err(|e| CliError::Config(e.to_string()))?,
            None => defaults.index,
        };
        let include_hydrogens = detection
            .include_hydrogens
            .unwrap_or(defaults.include_hydrogens);

        let mut builder = DetectionConfigBuilder::new()
            .target_chain(detection.target_chain.unwrap_or(defaults.target_chain))
            .cutoff(detection.cutoff.unwrap_or(defaults.cutoff))
            .model_index(detection.model.unwrap_or(defaults.model))
            .atom_filter(if include_hydrogens {
                AtomFilter::AllAtoms
            } else {
                AtomFilter::HeavyAtomsOnly
            })
            .index_kind(index_kind);
        if let Some(partners) = detection.partners {
            builder = builder.partner_chains(partners);
        }

        let detection = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(DetectSettings {
            detection,
            output_dir: output.directory.unwrap_or(defaults.output_directory),
        })
    }

    fn from_args(args: &DetectArgs) -> Self {
        Self {
            detection: Some(PartialDetectionConfig {
                target_chain: args.chain.clone(),
                cutoff: args.cutoff,
                partners: (!args.partners.is_empty()).then(|| args.partners.clone()),
                model: args.model,
                include_hydrogens: args.include_hydrogens.then_some(true),
                index: args.index.clone(),
            }),
            output: Some(PartialOutputConfig {
                directory: args.output_dir.clone(),
            }),
        }
    }

    fn overlay(self, top: Self) -> Self {
        let detection = match (self.detection, top.detection) {
            (Some(base), Some(top)) => Some(base.overlay(top)),
            (base, top) => top.or(base),
        };
        let output = match (self.output, top.output) {
            (Some(base), Some(top)) => Some(PartialOutputConfig {
                directory: top.directory.or(base.directory),
            }),
            (base, top) => top.or(base),
        };
        Self { detection, output }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let value_str = value_str.trim();

            match key {
                "detection.target-chain" => {
                    self.detection_mut().target_chain = Some(value_str.to_string());
                }
                "detection.cutoff" => {
                    self.detection_mut().cutoff = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                    })?);
                }
                "detection.partners" => {
                    self.detection_mut().partners = Some(
                        value_str
                            .split(',')
                            .map(str::trim)
                            .filter(|id| !id.is_empty())
                            .map(str::to_string)
                            .collect(),
                    );
                }
                "detection.model" => {
                    self.detection_mut().model = Some(value_str.parse().map_err(|_| {
                        CliError::Config(format!(
                            "Invalid integer value for {}: {}",
                            key, value_str
                        ))
                    })?);
                }
                "detection.include-hydrogens" => {
                    self.detection_mut().include_hydrogens =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid boolean value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                "detection.index" => {
                    self.detection_mut().index = Some(value_str.to_string());
                }
                "output.directory" => {
                    self.output
                        .get_or_insert_with(Default::default)
                        .directory = Some(PathBuf::from(value_str));
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn detection_mut(&mut self) -> &mut PartialDetectionConfig {
        self.detection.get_or_insert_with(Default::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use ifres::engine::config::PartnerSelection;
    use std::fs;
    use tempfile::TempDir;

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let file_path = dir.path().join("ifres.toml");
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn detect_args(extra: &[&str]) -> DetectArgs {
        let mut args = vec!["ifres", "detect", "-i", "6m0j.cif"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Detect(args) => args,
            _ => panic!("Expected 'detect' subcommand"),
        }
    }

    #[test]
    fn defaults_apply_without_a_config_file() {
        let settings = PartialConfig::load(None)
            .unwrap()
            .merge_with_cli(&detect_args(&[]))
            .unwrap();

        assert_eq!(settings.detection.target_chain, "E");
        assert_eq!(settings.detection.cutoff, 8.0);
        assert_eq!(settings.detection.model_index, 0);
        assert_eq!(settings.detection.partners, PartnerSelection::AllOthers);
        assert_eq!(settings.detection.atom_filter, AtomFilter::HeavyAtomsOnly);
        assert_eq!(settings.detection.index_kind, IndexKind::KdTree);
        assert_eq!(settings.output_dir, PathBuf::from("data/target"));
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
        [detection]
        target-chain = "B"
        cutoff = 5.0
        partners = ["A", "C"]
        include-hydrogens = true
        index = "grid"

        [output]
        directory = "results"
        "#,
        );

        let settings = PartialConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&detect_args(&[]))
            .unwrap();

        assert_eq!(settings.detection.target_chain, "B");
        assert_eq!(settings.detection.cutoff, 5.0);
        assert_eq!(
            settings.detection.partners,
            PartnerSelection::Explicit(vec!["A".to_string(), "C".to_string()])
        );
        assert_eq!(settings.detection.atom_filter, AtomFilter::AllAtoms);
        assert_eq!(settings.detection.index_kind, IndexKind::Grid);
        assert_eq!(settings.output_dir, PathBuf::from("results"));
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
        [detection]
        target-chain = "B" # Will be overridden
        cutoff = 5.0 # Will be overridden
        model = 1
        "#,
        );

        let args = detect_args(&["-c", "H", "--cutoff", "6.5", "--partners", "L", "-o", "out"]);
        let settings = PartialConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(settings.detection.target_chain, "H");
        assert_eq!(settings.detection.cutoff, 6.5);
        assert_eq!(settings.detection.model_index, 1);
        assert_eq!(
            settings.detection.partners,
            PartnerSelection::Explicit(vec!["L".to_string()])
        );
        assert_eq!(settings.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn set_values_override_file_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
        [detection]
        cutoff = 5.0
        "#,
        );

        let args = detect_args(&[
            "--cutoff",
            "6.0",
            "-S",
            "detection.cutoff=4.5",
            "-S",
            "detection.partners=A, B",
            "-S",
            "output.directory=elsewhere",
        ]);
        let settings = PartialConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&args)
            .unwrap();

        assert_eq!(settings.detection.cutoff, 4.5);
        assert_eq!(
            settings.detection.partners,
            PartnerSelection::Explicit(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(settings.output_dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
        [detection]
        radius = 5.0
        "#,
        );

        let result = PartialConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for set_value in [
            "detection.cutoff",
            "detection.cutoff=far",
            "detection.radius=5",
        ] {
            let args = detect_args(&["-S", set_value]);
            let result = PartialConfig::default().merge_with_cli(&args);
            assert!(
                matches!(result, Err(CliError::Config(_))),
                "'{}' should be rejected",
                set_value
            );
        }
    }

    #[test]
    fn invalid_merged_values_fail_validation() {
        let unknown_index = detect_args(&["--index", "octree"]);
        assert!(matches!(
            PartialConfig::default().merge_with_cli(&unknown_index),
            Err(CliError::Config(_))
        ));

        let target_is_partner = detect_args(&["-c", "E", "--partners", "A,E"]);
        let result = PartialConfig::default().merge_with_cli(&target_is_partner);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("'E'")));

        let negative_cutoff = detect_args(&["-S", "detection.cutoff=-1"]);
        assert!(matches!(
            PartialConfig::default().merge_with_cli(&negative_cutoff),
            Err(CliError::Config(_))
        ));
    }
}
