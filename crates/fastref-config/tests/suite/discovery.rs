use std::ffi::OsString;
use std::sync::Mutex;

use fastref_config::{discover_config_path, load_for_root, FastrefConfig, FASTREF_CONFIG_ENV_VAR};
use tempfile::tempdir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

struct EnvVarGuard {
    key: &'static str,
    prev: Option<OsString>,
}

impl EnvVarGuard {
    fn set(key: &'static str, value: &std::path::Path) -> Self {
        let prev = std::env::var_os(key);
        std::env::set_var(key, value);
        Self { key, prev }
    }

    fn unset(key: &'static str) -> Self {
        let prev = std::env::var_os(key);
        std::env::remove_var(key);
        Self { key, prev }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => std::env::set_var(self.key, v),
            None => std::env::remove_var(self.key),
        }
    }
}

#[test]
fn discovers_fastref_toml_in_root() {
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK mutex poisoned");
    let _env = EnvVarGuard::unset(FASTREF_CONFIG_ENV_VAR);

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("fastref.toml");
    std::fs::write(&config_path, "target = \"org.junit.Test\"\n").unwrap();

    let discovered = discover_config_path(dir.path()).expect("fastref.toml should be discovered");
    assert_eq!(discovered, config_path.canonicalize().unwrap_or(config_path));
}

#[test]
fn dotfile_is_a_fallback() {
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK mutex poisoned");
    let _env = EnvVarGuard::unset(FASTREF_CONFIG_ENV_VAR);

    let dir = tempdir().unwrap();
    let hidden = dir.path().join(".fastref.toml");
    std::fs::write(&hidden, "").unwrap();
    assert_eq!(
        discover_config_path(dir.path()),
        Some(hidden.canonicalize().unwrap_or(hidden))
    );

    let visible = dir.path().join("fastref.toml");
    std::fs::write(&visible, "").unwrap();
    assert_eq!(
        discover_config_path(dir.path()),
        Some(visible.canonicalize().unwrap_or(visible))
    );
}

#[test]
fn env_override_wins_over_root_file() {
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK mutex poisoned");

    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("fastref.toml"), "target = \"a.A\"\n").unwrap();
    let override_path = dir.path().join("override.toml");
    std::fs::write(&override_path, "target = \"b.B\"\n").unwrap();

    let _env = EnvVarGuard::set(FASTREF_CONFIG_ENV_VAR, &override_path);
    let (config, path) = load_for_root(dir.path()).unwrap();
    assert_eq!(config.target.as_deref(), Some("b.B"));
    assert_eq!(
        path,
        Some(override_path.canonicalize().unwrap_or(override_path))
    );
}

#[test]
fn missing_config_yields_defaults() {
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK mutex poisoned");
    let _env = EnvVarGuard::unset(FASTREF_CONFIG_ENV_VAR);

    let dir = tempdir().unwrap();
    let (config, path) = load_for_root(dir.path()).unwrap();
    assert_eq!(config, FastrefConfig::default());
    assert_eq!(path, None);
}
