// Integration tests for configuration loading

use anyhow::Result;
use sculk_recorder::Config;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_full_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("sculk.toml");
    fs::write(
        &path,
        r#"
[service]
name = "test-recorder"

[voice]
sample_rate = 24000
mtu_size = 512
records_dir = "/tmp/records"

[sculk]
activation_threshold = -42.5
sneak_activation = false
game_event = "minecraft:entity_action"
utc_offset_minutes = 0

[sculk.activations]
default = false
proximity = true
whisper = false
"#,
    )?;

    let config = Config::load(path.to_str().unwrap())?;

    assert_eq!(config.service.name, "test-recorder");
    assert_eq!(config.voice.sample_rate, 24_000);
    assert_eq!(config.voice.mtu_size, 512);
    assert_eq!(config.voice.records_dir, PathBuf::from("/tmp/records"));
    assert_eq!(config.sculk.activation_threshold, -42.5);
    assert!(!config.sculk.sneak_activation);
    assert_eq!(config.sculk.game_event, "minecraft:entity_action");
    assert_eq!(config.sculk.filename_offset().local_minus_utc(), 0);

    let activations = &config.sculk.activations;
    assert!(!activations.default);
    assert_eq!(activations.get_by_activation_name("proximity"), Some(true));
    assert_eq!(activations.get_by_activation_name("whisper"), Some(false));
    assert_eq!(activations.get_by_activation_name("group"), None);

    Ok(())
}

#[test]
fn test_partial_file_uses_defaults() -> Result<()> {
    let config = Config::from_toml_str(
        r#"
[sculk]
game_event = "minecraft:note_block_play"
"#,
    )?;

    assert_eq!(config.sculk.game_event, "minecraft:note_block_play");
    assert_eq!(config.sculk.activation_threshold, -30.0);
    assert!(config.sculk.sneak_activation);
    assert!(config.sculk.activations.default);
    assert_eq!(config.voice.sample_rate, 48_000);
    assert_eq!(config.voice.records_dir, PathBuf::from("voice_chat_records"));

    Ok(())
}

#[test]
fn test_bundled_config_parses() -> Result<()> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("sculk-recorder.toml");

    let config = Config::load(path.to_str().unwrap())?;
    assert_eq!(config.service.name, "sculk-recorder");
    assert_eq!(config.sculk.activations.get_by_activation_name("proximity"), Some(true));

    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(Config::load("/nonexistent/sculk-recorder").is_err());
}
