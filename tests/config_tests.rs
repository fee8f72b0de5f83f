//! Integration tests for configuration loading, presets, and the manager.

use std::io::Write;

use iris::{ConfigError, ConfigManager, IrisConfig, Preset};

mod file_loading_tests {
    use super::*;

    #[test]
    fn test_load_from_tempfile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
preset = "aggressive"
enable_runtime_switching = true
"#
        )
        .unwrap();

        let config = IrisConfig::load(file.path()).unwrap();
        assert_eq!(config.preset, Preset::Aggressive);
        assert!(config.enable_runtime_switching);
        assert_eq!(config.iteration.max_follow_up_iterations, 5);
    }

    #[test]
    fn test_section_override_replaces_preset_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
preset = "quality"

[iteration]
max_follow_up_iterations = 7
"#
        )
        .unwrap();

        let config = IrisConfig::load(file.path()).unwrap();
        // Overridden table uses its own serde defaults, not the preset's.
        assert_eq!(config.iteration.max_follow_up_iterations, 7);
        assert_eq!(config.iteration.sufficiency_threshold, 0.7);
        // Untouched section keeps preset values.
        assert_eq!(config.merger.quality_threshold, 0.75);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[merger]
quality_threshold = 3.0
"#
        )
        .unwrap();

        assert!(matches!(
            IrisConfig::load(file.path()),
            Err(ConfigError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "preset = \"warp\"").unwrap();

        assert!(matches!(
            IrisConfig::load(file.path()),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iris.toml");

        assert!(matches!(
            IrisConfig::load(&path),
            Err(ConfigError::FileNotFound(_))
        ));

        let config = IrisConfig::load_or_default(&path).unwrap();
        assert_eq!(config.preset, Preset::Balanced);
    }
}

mod manager_tests {
    use super::*;

    #[test]
    fn test_manager_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iris.toml");
        std::fs::write(&path, "preset = \"balanced\"").unwrap();

        let manager = ConfigManager::new(&path).unwrap();
        assert_eq!(manager.config().preset, Preset::Balanced);

        std::fs::write(&path, "preset = \"conservative\"").unwrap();
        manager.reload().unwrap();
        assert_eq!(manager.config().preset, Preset::Conservative);
    }

    #[test]
    fn test_manager_reload_rejects_invalid_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iris.toml");
        std::fs::write(&path, "preset = \"balanced\"").unwrap();

        let manager = ConfigManager::new(&path).unwrap();
        std::fs::write(&path, "[merger]\nsimilarity_threshold = 9.0").unwrap();

        assert!(manager.reload().is_err());
        // Previous configuration stays active.
        assert_eq!(manager.config().preset, Preset::Balanced);
    }

    #[test]
    fn test_manager_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("absent.toml")).unwrap();
        assert_eq!(manager.config().preset, Preset::Balanced);
    }

    #[test]
    fn test_switch_preset_is_atomic_snapshot() {
        let manager = ConfigManager::from_config(IrisConfig::default());

        let before = manager.config();
        manager.switch_preset(Preset::Performance);
        let after = manager.config();

        // The old snapshot is untouched; readers holding it see a
        // consistent value object.
        assert_eq!(before.preset, Preset::Balanced);
        assert_eq!(after.preset, Preset::Performance);
        assert!(!after.merger.enable_deduplication);
    }
}

mod preset_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("balanced", Preset::Balanced)]
    #[case("conservative", Preset::Conservative)]
    #[case("aggressive", Preset::Aggressive)]
    #[case("performance", Preset::Performance)]
    #[case("quality", Preset::Quality)]
    fn test_preset_round_trip(#[case] name: &str, #[case] expected: Preset) {
        let parsed: Preset = name.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), name);
        assert!(parsed.config().validate().is_ok());
    }

    #[test]
    fn test_conservative_is_stricter_than_aggressive() {
        let conservative = Preset::Conservative.config();
        let aggressive = Preset::Aggressive.config();

        assert!(
            conservative.merger.quality_threshold > aggressive.merger.quality_threshold
        );
        assert!(
            conservative.iteration.max_follow_up_iterations
                < aggressive.iteration.max_follow_up_iterations
        );
    }
}
