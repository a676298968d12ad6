//! Tests for manifest loading and reference derivation

use super::*;
use proptest::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Remote lookup that returns a canned url or fails
struct FakeRemote(Option<&'static str>);

impl RemoteLookup for FakeRemote {
    fn remote_url(&self, _dir: &Path) -> Result<String, DerivationUnavailable> {
        self.0
            .map(str::to_string)
            .ok_or(DerivationUnavailable::EmptyUrl)
    }
}

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-action/action.yml")
}

/// Write `content` as `<dir_name>/action.yml` inside a fresh temp dir
fn write_manifest(dir_name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let action_dir = temp_dir.path().join(dir_name);
    fs::create_dir_all(&action_dir).unwrap();
    let path = action_dir.join("action.yml");
    fs::write(&path, content).unwrap();
    (temp_dir, path)
}

#[test]
fn test_load_fixture() {
    let loader = ManifestLoader::with_remote(FakeRemote(None));
    let manifest = loader.load(&fixture_path()).unwrap();

    assert_eq!(manifest.name, "Test Action");
    assert_eq!(manifest.description, "Description for fake Test Action");

    let names: Vec<&str> = manifest.inputs.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["input-one", "input-two", "thing-on"]);

    assert_eq!(
        manifest.inputs["input-one"],
        InputSpec {
            description: "Description for input-one".to_string(),
            required: true,
            default_value: "one".to_string(),
            input_type: "string".to_string(),
        }
    );
    assert_eq!(
        manifest.inputs["thing-on"],
        InputSpec {
            description: "Turn thing on".to_string(),
            required: false,
            default_value: "false".to_string(),
            input_type: "boolean".to_string(),
        }
    );
    assert_eq!(
        manifest.outputs["thing-one"].description,
        "Description for output thing-one"
    );
    assert_eq!(manifest.reference.as_deref(), Some("test-action"));
}

#[test]
fn test_set_input_types() {
    let cases = [("empty", "", "string"), ("bool", "boolean", "boolean"), ("int", "int", "int")];

    for (name, declared, want) in cases {
        let mut manifest = Manifest::default();
        manifest.inputs.insert(
            name.to_string(),
            InputSpec {
                input_type: declared.to_string(),
                ..Default::default()
            },
        );

        manifest.set_input_types();

        assert_eq!(manifest.inputs[name].input_type, want, "case {}", name);
    }
}

#[test]
fn test_parse_minimal_manifest() {
    let manifest = Manifest::parse("name: Minimal\n").unwrap();

    assert_eq!(manifest.name, "Minimal");
    assert!(manifest.description.is_empty());
    assert!(manifest.inputs.is_empty());
    assert!(manifest.outputs.is_empty());
    assert!(manifest.reference.is_none());
}

#[test]
fn test_parse_null_sections() {
    let manifest = Manifest::parse("name: Nulls\ninputs:\noutputs: ~\n").unwrap();

    assert!(manifest.inputs.is_empty());
    assert!(manifest.outputs.is_empty());
}

#[test]
fn test_parse_scalar_defaults() {
    let yaml = r#"
name: Scalars
inputs:
  retries:
    default: 3
  ratio:
    default: 1.5
  version:
    default: 3.10
  whole:
    default: 1.0
  exponent:
    default: 1e3
  flag:
    default: false
  capital:
    default: True
  quoted:
    default: "false"
  empty:
    default:
"#;
    let manifest = Manifest::parse(yaml).unwrap();

    // text as written, not a reformatted number or bool
    let cases = [
        ("retries", "3"),
        ("ratio", "1.5"),
        ("version", "3.10"),
        ("whole", "1.0"),
        ("exponent", "1e3"),
        ("flag", "false"),
        ("capital", "True"),
        ("quoted", "false"),
    ];
    for (name, want) in cases {
        assert_eq!(manifest.inputs[name].default_value, want, "input {}", name);
    }
    assert!(!manifest.inputs["empty"].has_default());
    assert!(manifest.inputs.values().all(|i| i.input_type == "string"));
}

#[test]
fn test_parse_ignores_unknown_keys() {
    let yaml = r#"
name: Extra
author: someone
branding:
  icon: book
outputs:
  result:
    description: The result
    value: ${{ steps.run.outputs.result }}
"#;
    let manifest = Manifest::parse(yaml).unwrap();

    assert_eq!(manifest.outputs["result"].description, "The result");
}

#[test]
fn test_parse_malformed_yaml_is_parse_error() {
    let result = Manifest::parse("name: [unterminated\ninputs:\n  a: {");

    assert!(matches!(result, Err(ManifestError::Parse(_))));
}

#[test]
fn test_parse_wrong_field_type_is_parse_error() {
    let yaml = "name: Bad\ninputs:\n  flag:\n    required: sometimes\n";

    let err = Manifest::parse(yaml).unwrap_err();
    assert!(matches!(err, ManifestError::Parse(_)));
    assert!(err.to_string().contains("boolean"));
}

#[test]
fn test_parse_empty_is_parse_error() {
    assert!(matches!(Manifest::parse("  \n"), Err(ManifestError::Parse(_))));
}

#[test]
fn test_load_missing_file_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let loader = ManifestLoader::with_remote(FakeRemote(None));

    let result = loader.load(&temp_dir.path().join("action.yml"));

    assert!(matches!(result, Err(ManifestError::NotFound(_))));
}

#[test]
fn test_load_malformed_file_names_path() {
    let (_temp_dir, path) = write_manifest("broken", "inputs: [a, b\n");
    let loader = ManifestLoader::with_remote(FakeRemote(None));

    let err = loader.load(&path).unwrap_err();

    assert!(matches!(err, ManifestError::Parse(_)));
    assert!(err.to_string().contains("action.yml"));
}

#[test]
fn test_reference_from_ssh_remote() {
    let (_temp_dir, path) = write_manifest("my-action", "name: Mine\n");
    let loader = ManifestLoader::with_remote(FakeRemote(Some("git@github.com:flynshue/gha-docs.git")));

    let manifest = loader.load(&path).unwrap();

    assert_eq!(
        manifest.reference.as_deref(),
        Some("flynshue/gha-docs/my-action@VERSION")
    );
}

#[test]
fn test_reference_uses_version_placeholder() {
    let (_temp_dir, path) = write_manifest("my-action", "name: Mine\n");
    let loader = ManifestLoader::with_remote(FakeRemote(Some("https://github.com/acme/actions.git")))
        .with_version_placeholder("v1");

    let reference = loader.reference_for(&path);

    assert_eq!(reference.as_deref(), Some("acme/actions/my-action@v1"));
}

#[test]
fn test_reference_falls_back_on_unrecognized_url() {
    let (_temp_dir, path) = write_manifest("lonely", "name: Lonely\n");
    let loader = ManifestLoader::with_remote(FakeRemote(Some("origin")));

    assert_eq!(loader.reference_for(&path).as_deref(), Some("lonely"));
}

#[test]
fn test_reference_falls_back_without_remote() {
    let (_temp_dir, path) = write_manifest("fake-action", "name: Fake\n");
    let loader = ManifestLoader::with_remote(FakeRemote(None));

    let manifest = loader.load(&path).unwrap();

    assert_eq!(manifest.reference.as_deref(), Some("fake-action"));
}

#[test]
fn test_reference_falls_back_without_git_client() {
    let (_temp_dir, path) = write_manifest("fake-action", "name: Fake\n");
    let loader = ManifestLoader::with_remote(GitRemote::with_program("gha-docs-no-such-git-binary"));

    assert_eq!(loader.reference_for(&path).as_deref(), Some("fake-action"));
}

#[cfg(unix)]
#[test]
fn test_reference_keeps_symlinked_dir_name() {
    let temp_dir = TempDir::new().unwrap();
    let real = temp_dir.path().join("real");
    fs::create_dir_all(&real).unwrap();
    fs::write(real.join("action.yml"), "name: Linked\n").unwrap();
    let alias = temp_dir.path().join("alias");
    std::os::unix::fs::symlink(&real, &alias).unwrap();
    let loader = ManifestLoader::with_remote(FakeRemote(Some("git@github.com:acme/tools.git")));

    let manifest = loader.load(&alias.join("action.yml")).unwrap();

    assert_eq!(manifest.reference.as_deref(), Some("acme/tools/alias@VERSION"));
}

#[test]
fn test_reference_folds_parent_components() {
    let (temp_dir, _path) = write_manifest("inner", "name: Inner\n");
    let loader = ManifestLoader::with_remote(FakeRemote(None));

    let reference = loader.reference_for(&temp_dir.path().join("inner/../inner/./action.yml"));

    assert_eq!(reference.as_deref(), Some("inner"));
}

#[test]
fn test_reference_disabled() {
    let (_temp_dir, path) = write_manifest("quiet", "name: Quiet\n");
    let loader = ManifestLoader::with_remote(FakeRemote(Some("git@github.com:a/b.git")))
        .with_reference(false);

    let manifest = loader.load(&path).unwrap();

    assert!(manifest.reference.is_none());
}

/// Words YAML reads as something other than a string
fn is_reserved(word: &str) -> bool {
    matches!(word, "null" | "true" | "false" | "nan" | "inf" | "infinity")
}

fn input_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}".prop_filter("reserved yaml word", |s| !is_reserved(s))
}

fn declared_type_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("boolean".to_string())),
        Just(Some("number".to_string())),
        Just(Some("string".to_string())),
        "[a-z]{3,8}"
            .prop_filter("reserved yaml word", |s| !is_reserved(s))
            .prop_map(Some),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Omitted types become "string"; declared types survive unchanged
    #[test]
    fn property_input_types_normalized(
        inputs in prop::collection::btree_map(input_name_strategy(), declared_type_strategy(), 1..6)
    ) {
        let mut yaml = String::from("name: Prop\ninputs:\n");
        for (name, declared) in &inputs {
            yaml.push_str(&format!("  {}:\n    description: about {}\n", name, name));
            if let Some(t) = declared {
                yaml.push_str(&format!("    type: {}\n", t));
            }
        }

        let manifest = Manifest::parse(&yaml).unwrap();

        prop_assert_eq!(manifest.inputs.len(), inputs.len());
        for (name, declared) in &inputs {
            let want = declared.as_deref().unwrap_or(DEFAULT_INPUT_TYPE);
            prop_assert_eq!(manifest.inputs[name.as_str()].input_type.as_str(), want);
        }
    }
}
