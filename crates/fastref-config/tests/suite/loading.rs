use fastref_config::{ConfigError, FastrefConfig, LoggingConfig};
use fastref_core::{FqName, FqNameError, PackageName};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn full_document_parses() {
    let config = FastrefConfig::load_from_str(
        r#"
target = "org.junit.Test"
conflicts = ["org.testng.Test", "kotlin.test.Test"]
type_alias_packages = ["com.example.aliases"]
implicit_imports = ["kotlin", "kotlin.annotation"]

[logging]
level = "debug"
json = true
stderr = false
"#,
    )
    .unwrap();

    assert_eq!(
        config.target_name().unwrap(),
        Some(FqName::parse("org.junit.Test").unwrap())
    );
    assert_eq!(
        config.conflict_names().unwrap(),
        vec![
            FqName::parse("org.testng.Test").unwrap(),
            FqName::parse("kotlin.test.Test").unwrap(),
        ]
    );
    assert_eq!(
        config.type_alias_package_names().unwrap(),
        vec![PackageName::from_dotted("com.example.aliases")]
    );
    assert_eq!(
        config.implicit_import_packages().unwrap(),
        vec![
            PackageName::from_dotted("kotlin"),
            PackageName::from_dotted("kotlin.annotation"),
        ]
    );
    assert_eq!(
        config.logging,
        LoggingConfig {
            level: "debug".to_owned(),
            json: true,
            stderr: false,
        }
    );
}

#[test]
fn empty_document_uses_defaults() {
    let config = FastrefConfig::load_from_str("").unwrap();
    assert_eq!(config, FastrefConfig::default());
    assert_eq!(config.target_name().unwrap(), None);
    assert!(config.conflict_names().unwrap().is_empty());
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.stderr);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = FastrefConfig::load_from_str("tagret = \"org.junit.Test\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");

    let err = FastrefConfig::load_from_str("[logging]\nverbose = true\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn malformed_names_are_reported_with_field() {
    let err = FastrefConfig::load_from_str("conflicts = [\"org..Test\"]\n").unwrap_err();
    match err {
        ConfigError::InvalidName { field, source } => {
            assert_eq!(field, "conflicts");
            assert!(matches!(source, FqNameError::EmptySegment { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = FastrefConfig::load_from_str("implicit_imports = [\"kotlin.*\"]\n").unwrap_err();
    assert!(
        matches!(err, ConfigError::InvalidName { field: "implicit_imports", .. }),
        "{err:?}"
    );

    let err = FastrefConfig::load_from_str("target = \"\"\n").unwrap_err();
    assert!(
        matches!(
            err,
            ConfigError::InvalidName {
                field: "target",
                source: FqNameError::Empty
            }
        ),
        "{err:?}"
    );
}

#[test]
fn load_from_path_reports_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = FastrefConfig::load_from_path(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
    assert!(err.to_string().contains("nope.toml"), "{err}");
}

#[test]
fn load_from_path_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fastref.toml");
    std::fs::write(&path, "target = \"org.junit.Test\"\n").unwrap();

    let config = FastrefConfig::load_from_path(&path).unwrap();
    assert_eq!(config.target.as_deref(), Some("org.junit.Test"));
}
