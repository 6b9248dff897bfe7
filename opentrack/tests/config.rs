use std::fs;
use std::time::Duration;

use opentrack::{OpenTrackApi, OpenTrackConfigExt, TransferMode};
use otconfig::Config;
use tempfile::TempDir;

fn config_with(yaml: &str) -> anyhow::Result<(TempDir, Config)> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("config.yaml"), yaml)?;
    let config = Config::load_config(&dir.path().to_string_lossy())?;
    Ok((dir, config))
}

#[test]
fn session_from_config() -> anyhow::Result<()> {
    let (_dir, config) = config_with(
        "opentrack:\n  base_url: https://ot.example.com/\n  username: writer\n  password: plain\n  timeout_secs: 30\n  transfer_mode: streamed\n",
    )?;

    let api = OpenTrackApi::from_config(&config)?;

    assert_eq!(api.base_url(), "https://ot.example.com");
    assert_eq!(api.username(), "writer");
    assert_eq!(api.timeout(), Duration::from_secs(30));
    assert_eq!(api.transfer_mode(), TransferMode::Streamed);
    Ok(())
}

#[test]
fn defaults_when_unset() -> anyhow::Result<()> {
    let (_dir, config) = config_with("opentrack:\n  transfer_mode: carrier-pigeon\n")?;

    assert_eq!(config.get_opentrack_timeout(), Duration::from_secs(120));
    assert_eq!(config.get_opentrack_transfer_mode(), TransferMode::Buffered);
    assert!(config.get_opentrack_base_url().is_err());
    assert!(config.get_opentrack_credentials().is_err());
    assert!(OpenTrackApi::from_config(&config).is_err());
    Ok(())
}

#[test]
fn settings_round_trip() -> anyhow::Result<()> {
    let (_dir, config) = config_with("{}\n")?;

    config.set_opentrack_base_url("https://ot.example.com")?;
    config.set_opentrack_timeout(Duration::from_secs(15))?;
    config.set_opentrack_transfer_mode(TransferMode::Streamed)?;

    assert_eq!(config.get_opentrack_base_url()?, "https://ot.example.com");
    assert_eq!(config.get_opentrack_timeout(), Duration::from_secs(15));
    assert_eq!(config.get_opentrack_transfer_mode(), TransferMode::Streamed);
    Ok(())
}

#[test]
fn credentials_are_stored_encrypted() -> anyhow::Result<()> {
    // Needs a machine id to derive the key
    if otconfig::encryption::encrypt_password("check").is_err() {
        return Ok(());
    }
    let (dir, config) = config_with("{}\n")?;

    config.set_opentrack_credentials("writer", "s3cret")?;

    let saved = fs::read_to_string(dir.path().join("config.yaml"))?;
    assert!(!saved.contains("s3cret"));
    assert!(saved.contains("encrypted:"));
    assert_eq!(
        config.get_opentrack_credentials()?,
        ("writer".to_string(), "s3cret".to_string())
    );
    Ok(())
}
