//! Configuration persistence and environment tests.

use confens::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_bagging_config_json_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bagging.json");

    let config = BaggingConfig::builder()
        .n_base(6)
        .perc_decisors(0.5)
        .max_features(0.4)
        .seed(12)
        .num_threads(2)
        .build();
    config.save_to_file(&path).unwrap();

    let loaded = BaggingConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.voting.n_decisors, 3);
}

#[test]
fn test_boosting_config_toml_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("boosting.toml");

    let config = BoostingConfig::builder()
        .n_base(5)
        .conf_thr(0.85)
        .n_decisors(2)
        .learning_rate(1.0)
        .build();
    config.save_to_file(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("n_base = 5"));

    let loaded = BoostingConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_loaded_values_are_sanitized() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bagging.toml");
    fs::write(
        &path,
        r#"
n_base = 1
max_features = 1.5
sampling_ratio = 0.5
num_threads = 0

[voting]
n_decisors = 40
weighted = false
"#,
    )
    .unwrap();

    let loaded = BaggingConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.n_base, DEFAULT_N_BASE);
    assert_eq!(loaded.max_features, DEFAULT_MAX_FEATURES);
    assert_eq!(loaded.sampling_ratio, 0.5);
    assert_eq!(loaded.voting.n_decisors, default_n_decisors(DEFAULT_N_BASE));
}

#[test]
fn test_malformed_files() {
    let temp_dir = TempDir::new().unwrap();

    let json = temp_dir.path().join("broken.json");
    fs::write(&json, "{ not json").unwrap();
    assert_eq!(BoostingConfig::load_from_file(&json).unwrap_err().category(), "json");

    let toml = temp_dir.path().join("broken.toml");
    fs::write(&toml, "n_base = [").unwrap();
    assert_eq!(BoostingConfig::load_from_file(&toml).unwrap_err().category(), "toml");

    let missing = temp_dir.path().join("missing.json");
    assert_eq!(BaggingConfig::load_from_file(&missing).unwrap_err().category(), "io");
}

#[test]
fn test_builder_warnings_are_reported() {
    let (config, warnings) = BoostingConfig::builder()
        .n_base(0)
        .learning_rate(-3.0)
        .boost_thr(2.0)
        .perc_decisors(0.5)
        .n_decisors(3)
        .build_with_warnings();

    assert_eq!(config.n_base, DEFAULT_N_BASE);
    assert_eq!(config.learning_rate, DEFAULT_LEARNING_RATE);
    assert_eq!(config.boost_thr, DEFAULT_BOOST_THR);
    assert_eq!(config.voting.n_decisors, 5);
    let parameters: Vec<&str> = warnings.iter().map(|w| w.parameter.as_str()).collect();
    assert_eq!(parameters, vec!["n_base", "learning_rate", "boost_thr", "n_decisors"]);
}

#[test]
fn test_environment_overrides() {
    let mut config = BaggingConfig::default();

    std::env::set_var(ENV_SEED, "1234");
    std::env::set_var(ENV_NUM_THREADS, "3");
    config.apply_environment_overrides().unwrap();
    assert_eq!(config.seed, Some(1234));
    assert_eq!(config.num_threads, 3);
    assert_eq!(config.effective_num_threads(), 3);

    std::env::set_var(ENV_NUM_THREADS, "many");
    assert!(config.apply_environment_overrides().is_err());

    std::env::remove_var(ENV_SEED);
    std::env::remove_var(ENV_NUM_THREADS);
}
