use fssp_core::{RunConfig, Symbol};
use fssp_fs::{ConfigStore, Error};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use tempfile::TempDir;

const TOML: &str = r#"
mode = "exp-ring"
base = 2
null = 2
init_len = 4
working = "RS"
"#;

const JSON: &str = r#"{"mode": "exp-ring", "base": 2, "null": 2, "init_len": 4, "working": "RS"}"#;

const YAML: &str = "mode: exp-ring\nbase: 2\nnull: 2\ninit_len: 4\nworking: RS\n";

#[rstest]
#[case("run.toml", TOML)]
#[case("run.json", JSON)]
#[case("run.yaml", YAML)]
#[case("run.YML", YAML)]
fn loads_every_supported_format(#[case] file: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(file);
    fs::write(&path, content).unwrap();

    let config: RunConfig = ConfigStore::new().load(&path).unwrap();
    let RunConfig::ExpRing(exp) = &config else {
        panic!("wrong mode: {config:?}");
    };
    assert_eq!(exp.working, Symbol::parse_many("RS").unwrap());
    assert_eq!(config.name(), "base2_null2_init_len4_RS");
}

#[test]
fn save_then_load_preserves_the_config() {
    let temp = TempDir::new().unwrap();
    let store = ConfigStore::new();
    let original: RunConfig = toml::from_str(
        r#"
mode = "ring"
lengths = [2, 4, 8]
states = "QGA"
symmetric = true
init_table = "{'QQQ': 'Q', 'QQG': 'G'}"
"#,
    )
    .unwrap();

    for file in ["out.toml", "out.json", "nested/out.yaml"] {
        let path = temp.path().join(file);
        store.save(&path, &original).unwrap();
        let loaded: RunConfig = store.load(&path).unwrap();
        assert_eq!(loaded, original, "{file}");
    }
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("run.ini");
    fs::write(&path, "mode = ring").unwrap();
    let err = ConfigStore::new().load::<RunConfig>(&path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { extension } if extension == "ini"));
}

#[test]
fn parse_errors_name_the_format() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("run.toml");
    fs::write(&path, "mode = \"ring\"\nlengths = [2]\nstates = \"Q,G\"\n").unwrap();
    let err = ConfigStore::new().load::<RunConfig>(&path).unwrap_err();
    match err {
        Error::ConfigParse { format, .. } => assert_eq!(format, "TOML"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let err = ConfigStore::new()
        .load::<RunConfig>(&temp.path().join("absent.json"))
        .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
