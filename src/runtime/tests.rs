use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::*;
use crate::document::Mapping;
use crate::provider::EnvProvider;

/// Stub backend: `a/b` and `c/d` have values, `doc` is structured.
#[derive(Debug)]
struct Stub {
    fetches: Arc<AtomicUsize>,
}

impl Provider for Stub {
    fn fetch_value(&self, path: &str) -> Result<String, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match path {
            "a/b" => Ok("A".to_string()),
            "c/d" => Ok("B".to_string()),
            "extends" => Ok("x: 1\ny: 2\n".to_string()),
            other => Err(ProviderError::NotFound(other.to_string())),
        }
    }

    fn fetch_structured(&self, path: &str) -> Result<Mapping, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match path {
            "path" => Ok(Value::from_yaml_str("a:\n  b: v\n  list: [1, 2]\n")?.into_mapping()?),
            "flat" => Ok(Value::from_yaml_str("a: scalar\n")?.into_mapping()?),
            other => Err(ProviderError::NotFound(other.to_string())),
        }
    }
}

struct Harness {
    runtime: Runtime,
    fetches: Arc<AtomicUsize>,
    constructions: Arc<AtomicUsize>,
}

fn harness_with(builder: RuntimeBuilder) -> Harness {
    let fetches = Arc::new(AtomicUsize::new(0));
    let constructions = Arc::new(AtomicUsize::new(0));
    let (f, c) = (fetches.clone(), constructions.clone());
    let runtime = builder
        .with_provider("x", move |_: &Config| -> Result<Box<dyn Provider>, ProviderError> {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Stub { fetches: f.clone() }))
        })
        .build();
    Harness {
        runtime,
        fetches,
        constructions,
    }
}

fn harness() -> Harness {
    harness_with(Runtime::builder())
}

fn doc(yaml: &str) -> Value {
    Value::from_yaml_str(yaml).unwrap()
}

#[test]
fn test_document_without_references_is_unchanged() {
    let mut h = harness();
    let input = doc(
        r#"
server:
  name: '"no-referrer" always; return 301 $scheme://$host:$server_port/remote.php/dav;'
  port: 8080
  tags: [a, b]
  enabled: false
"#,
    );
    assert_eq!(h.runtime.eval(input.clone()).unwrap(), input);
    assert_eq!(h.constructions.load(Ordering::SeqCst), 0);
}

#[test]
fn test_multi_reference_string() {
    let mut h = harness();
    let output = h.runtime.eval_str("secretref+x://a/b+, secretref+x://c/d").unwrap();
    assert_eq!(output, "A, B");
}

#[test]
fn test_same_reference_fetched_once() {
    let mut h = harness();
    let output = h
        .runtime
        .eval(doc("one: ref+x://a/b\ntwo:\n  - ref+x://a/b\nthree: pre-ref+x://a/b+-post\n"))
        .unwrap();
    assert_eq!(output, doc("one: A\ntwo: [A]\nthree: pre-A-post\n"));
    assert_eq!(h.fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn test_same_scheme_and_query_share_provider() {
    let mut h = harness();
    h.runtime
        .eval(doc("a: ref+x://a/b?k=1&j=2\nb: ref+x://c/d?j=2&k=1\n"))
        .unwrap();
    assert_eq!(h.constructions.load(Ordering::SeqCst), 1);

    h.runtime.eval_str("ref+x://a/b?k=other").unwrap();
    assert_eq!(h.constructions.load(Ordering::SeqCst), 2);
    assert_eq!(h.runtime.provider_count(), 2);
}

#[test]
fn test_only_filter() {
    let mut h = harness_with(Runtime::builder().only([Kind::Ref]));
    assert_eq!(h.runtime.eval_str("secretref+x://a/b").unwrap(), "secretref+x://a/b");
    assert_eq!(h.runtime.eval_str("ref+x://a/b").unwrap(), "A");

    let output = h.runtime.eval(doc("s: secretref+x://a/b\nr: ref+x://a/b\n")).unwrap();
    assert_eq!(output, doc("s: secretref+x://a/b\nr: A\n"));
}

#[test]
fn test_only_filter_from_options() {
    let options: Options = toml::from_str(r#"only = ["secretref"]"#).unwrap();
    let mut h = harness_with(Runtime::builder().with_options(options));
    assert_eq!(h.runtime.eval_str("ref+x://a/b").unwrap(), "ref+x://a/b");
    assert_eq!(h.runtime.eval_str("secretref+x://a/b").unwrap(), "A");
}

#[test]
fn test_splice_key_into_parent() {
    let mut h = harness();
    let output = h.runtime.eval(doc("app:\n  ref+x://extends: ''\n  z: 3\n")).unwrap();
    let app = output.as_mapping().unwrap()["app"].as_mapping().unwrap();
    assert_eq!(app.get("x"), Some(&Value::Integer(1)));
    assert_eq!(app.get("y"), Some(&Value::Integer(2)));
    assert_eq!(app.get("z"), Some(&Value::Integer(3)));
    assert!(!app.contains_key("ref+x://extends"));
}

#[test]
fn test_splice_silently_overwrites_parent_keys() {
    let mut h = harness();
    let output = h.runtime.eval(doc("x: original\nref+x://extends: ''\n")).unwrap();
    assert_eq!(output, doc("x: 1\ny: 2\n"));
}

#[test]
fn test_fragment_success() {
    let mut h = harness();
    assert_eq!(h.runtime.get("x://path#/a/b").unwrap(), Value::from("v"));
    assert_eq!(h.runtime.get("ref+x://path#/a/list/1").unwrap(), Value::Integer(2));
    assert_eq!(h.fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fragment_depth_mismatch() {
    let mut h = harness();
    let err = h.runtime.get("x://flat#/a/b").unwrap_err();
    assert!(matches!(err, Error::DepthMismatch { ref key, .. } if key == "a"));
}

#[test]
fn test_fragment_missing_key() {
    let mut h = harness();
    let err = h.runtime.get("x://path#/a/nope").unwrap_err();
    assert_eq!(err.to_string(), "no value found for key a/nope");
}

#[test]
fn test_whole_leaf_expands_to_structure() {
    let mut h = harness();
    let output = h.runtime.eval(doc("nested: ref+x://path#/a\n")).unwrap();
    assert_eq!(output, doc("nested:\n  b: v\n  list: [1, 2]\n"));
}

#[test]
fn test_structured_value_cannot_be_embedded() {
    let mut h = harness();
    let err = h.runtime.eval(doc("s: prefix ref+x://path#/a\n")).unwrap_err();
    assert!(matches!(err.root_cause(), Error::NonScalarReference(target) if target == "x://path#/a"));
}

#[test]
fn test_non_string_leaf_is_rendered_when_embedded() {
    let mut h = harness();
    let output = h.runtime.eval_str("second=ref+x://path#/a/list/1+!").unwrap();
    assert_eq!(output, "second=2!");
}

#[test]
fn test_errors_carry_reference_and_abort() {
    let mut h = harness();
    let err = h
        .runtime
        .eval(doc("ok: ref+x://a/b\nbad: ref+x://missing\n"))
        .unwrap_err();
    match &err {
        Error::Reference { reference, source } => {
            assert_eq!(reference, "x://missing");
            assert!(matches!(**source, Error::Fetch { ref path, .. } if path == "missing"));
        }
        other => panic!("expected reference context, got {other:?}"),
    }
}

#[test]
fn test_unknown_scheme_and_malformed_reference() {
    let mut h = harness();
    let err = h.runtime.eval_str("ref+vault://secret/app").unwrap_err();
    assert!(matches!(err.root_cause(), Error::UnsupportedScheme(s) if s == "vault"));

    let err = h.runtime.get("ref+nope").unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[test]
fn test_unsupported_operation_is_explicit() {
    let mut runtime = Runtime::new();
    let err = runtime.eval_str("ref+echo://foo#/bar").unwrap_err();
    assert!(matches!(
        err.root_cause(),
        Error::UnsupportedOperation { scheme, operation: "fetch_structured" } if scheme == "echo"
    ));
}

#[test]
fn test_without_builtins() {
    let mut runtime = Runtime::builder().without_builtins().build();
    let err = runtime.eval_str("ref+echo://foo").unwrap_err();
    assert!(matches!(err.root_cause(), Error::UnsupportedScheme(_)));
}

#[test]
fn test_eval_env() {
    let mut h = harness();
    let env: IndexMap<String, String> = [
        ("USER".to_string(), "ref+x://a/b".to_string()),
        ("PLAIN".to_string(), "literal".to_string()),
    ]
    .into_iter()
    .collect();
    let resolved = h.runtime.eval_env(env).unwrap();
    assert_eq!(resolved["USER"], "A");
    assert_eq!(resolved["PLAIN"], "literal");
}

#[test]
fn test_file_provider_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("base.yaml"), "region: eu\nreplicas: 3\n").unwrap();
    std::fs::write(dir.path().join("creds.json"), r#"{"db": {"password": "pw"}}"#).unwrap();
    let base = dir.path().display().to_string();

    let input = doc(&format!(
        "ref+file://base.yaml?base={base}: ''\npassword: ref+file://creds.json?base={base}#/db/password\n"
    ));
    let output = Runtime::new().eval(input).unwrap();
    assert_eq!(output, doc("region: eu\nreplicas: 3\npassword: pw\n"));
}

#[test]
fn test_echo_and_env_end_to_end() {
    let mut runtime = Runtime::builder()
        .with_provider("env", |config: &Config| -> Result<Box<dyn Provider>, ProviderError> {
            let provider = EnvProvider::from_config(config)?.with_vars([
                ("TOKEN", "t0k3n"),
                ("APP__DB__USER", "admin"),
            ]);
            Ok(Box::new(provider))
        })
        .build();
    let output = runtime
        .eval(doc(concat!(
            "url: https://ref+echo://example.com+/api\n",
            "token: ref+env://TOKEN\n",
            "user: ref+env://APP#/db/user\n",
        )))
        .unwrap();
    assert_eq!(output, doc("url: https://example.com/api\ntoken: t0k3n\nuser: admin\n"));
}
