use eyre::Result;
use serde_yaml::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use ycond::{Definitions, ResolveError, Resolver, resolve};

const SCENARIO: &str = "x: 1\ny: 2  # [cpp]\nz: 3  # [py]\n";

/// A document whose directives are pure disjunctions of names
const DISJUNCTIONS: &str = "\
name: tudat
bindings:
  - cpp  # [cpp]
  - python  # [py]
  - either  # [cpp or py]
  - rust  # [rust or (py or cpp)]
  - always  # [True]
  - never  # [False]
footer: done
";

fn write_document(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test document");
    path
}

fn defs(names: &[&str]) -> Definitions {
    names.iter().copied().collect()
}

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).expect("valid yaml")
}

fn kept_lines(content: &str, names: &[&str]) -> Vec<usize> {
    Resolver::new(defs(names))
        .filter(content)
        .expect("directives are well formed")
        .lines()
        .iter()
        .map(|line| line.number)
        .collect()
}

#[test]
fn scenario_a_no_definitions() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "example.yaml", SCENARIO);

    assert_eq!(resolve(&path, &Definitions::default())?, yaml("x: 1"));
    Ok(())
}

#[test]
fn scenario_b_cpp() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "example.yaml", SCENARIO);

    assert_eq!(resolve(&path, &defs(&["cpp"]))?, yaml("x: 1\ny: 2"));
    Ok(())
}

#[test]
fn scenario_c_py() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "example.yaml", SCENARIO);

    assert_eq!(resolve(&path, &defs(&["py"]))?, yaml("x: 1\nz: 3"));
    Ok(())
}

#[test]
fn scenario_d_py_and_cpp() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "example.yaml", SCENARIO);

    assert_eq!(resolve(&path, &defs(&["py", "cpp"]))?, yaml("x: 1\ny: 2\nz: 3"));
    Ok(())
}

#[test]
fn duplicate_definitions_are_harmless() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "example.yaml", SCENARIO);

    assert_eq!(
        resolve(&path, &defs(&["cpp", "cpp", "py"]))?,
        resolve(&path, &defs(&["py", "cpp"]))?
    );
    Ok(())
}

#[test]
fn resolving_twice_is_identical() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "api.yaml", DISJUNCTIONS);
    let resolver = Resolver::new(defs(&["py"]));

    let first = resolver.resolve(&path)?;
    let second = resolver.resolve(&path)?;
    assert_eq!(first, second);
    assert_eq!(serde_yaml::to_string(&first)?, serde_yaml::to_string(&second)?);
    Ok(())
}

#[test]
fn disjunctions_are_monotone() {
    let universe = ["cpp", "py", "rust"];
    let subsets: Vec<Vec<&str>> = (0..1u8 << universe.len())
        .map(|mask| {
            universe
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, name)| *name)
                .collect()
        })
        .collect();

    for small in &subsets {
        for big in &subsets {
            if !defs(small).is_subset(&defs(big)) {
                continue;
            }
            let kept_small = kept_lines(DISJUNCTIONS, small);
            let kept_big = kept_lines(DISJUNCTIONS, big);
            for line in &kept_small {
                assert!(
                    kept_big.contains(line),
                    "line {} kept with {:?} but dropped with {:?}",
                    line,
                    small,
                    big
                );
            }
        }
    }
}

#[test]
fn negation_is_not_monotone() {
    let content = "a: 1\nb: 2  # [not py]\n";

    assert_eq!(kept_lines(content, &[]), vec![1, 2]);
    assert_eq!(kept_lines(content, &["py"]), vec![1]);

    let report = Resolver::default().check_str(content);
    assert_eq!(report.non_monotone_lines, vec![2]);
}

#[test]
fn unbound_names_never_error() -> Result<()> {
    let content = "a: 1\nb: 2  # [undeclared and other]\nc: 3  # [undeclared or cpp]\n";
    let value = Resolver::new(defs(&["cpp"])).resolve_str(content)?;

    assert_eq!(value, yaml("a: 1\nc: 3"));
    Ok(())
}

#[test]
fn documents_without_directives_pass_through() -> Result<()> {
    let content = "# header comment\nname: plain\nitems:\n  - one\n  - two\nnested:\n  key: [1, 2]\n";
    let dir = TempDir::new()?;
    let path = write_document(&dir, "plain.yaml", content);
    let direct: Value = serde_yaml::from_str(content)?;

    for names in [&[][..], &["cpp"][..], &["cpp", "py"][..]] {
        let resolver = Resolver::new(defs(names));
        assert_eq!(resolver.resolve_text(&path)?.text(), content);
        assert_eq!(resolver.resolve(&path)?, direct);
    }
    Ok(())
}

#[test]
fn retained_lines_keep_source_order() {
    let content = "a: 1  # [py]\nb: 2\nc: 3  # [cpp]\nd: 4  # [py]\ne: 5\n";
    let doc = Resolver::new(defs(&["py"])).filter(content).expect("valid directives");

    let numbers: Vec<usize> = doc.lines().iter().map(|l| l.number).collect();
    assert_eq!(numbers, vec![1, 2, 4, 5]);
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(doc.text(), "a: 1  # [py]\nb: 2\nd: 4  # [py]\ne: 5\n");
}

#[test]
fn nested_structures_resolve() -> Result<()> {
    let content = "\
classes:
  Body:
    methods:
      - mass
      - to_python  # [py]
      - to_cpp  # [cpp]
    doc: shared
";
    let value = Resolver::new(defs(&["py"])).resolve_str(content)?;

    assert_eq!(value, yaml("classes:\n  Body:\n    methods: [mass, to_python]\n    doc: shared"));
    Ok(())
}

#[test]
fn malformed_document_is_parse_error_for_any_definitions() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "broken.yaml", "a: [1, 2\nb: 2  # [cpp]\n");

    for names in [&[][..], &["cpp"][..], &["py", "cpp"][..]] {
        let err = resolve(&path, &defs(names)).unwrap_err();
        assert!(matches!(err, ResolveError::Parse { .. }), "unexpected error: {:?}", err);
        assert_eq!(err.path(), path.as_path());
    }
    Ok(())
}

#[test]
fn malformed_directive_fails_fast() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "api.yaml", "a: 1\nb: 2  # [cpp and (py]\n");

    let err = resolve(&path, &defs(&["cpp"])).unwrap_err();
    match &err {
        ResolveError::Expression { line, expression, .. } => {
            assert_eq!(*line, 2);
            assert_eq!(expression, "cpp and (py");
        }
        other => panic!("Expected Expression error, got: {:?}", other),
    }
    assert!(err.to_string().contains("api.yaml:2:"));
    Ok(())
}

#[test]
fn expressions_are_not_executed() {
    let content = "a: 1  # [__import__('os').system('true')]\n";
    let err = Resolver::default().filter(content).unwrap_err();
    assert!(matches!(err, ResolveError::Expression { .. }));
}

#[test]
fn missing_document_is_io_error() -> Result<()> {
    let dir = TempDir::new()?;
    let err = resolve(dir.path().join("absent.yaml"), &Definitions::default()).unwrap_err();

    match err {
        ResolveError::Io { source, .. } => assert_eq!(source.kind(), std::io::ErrorKind::NotFound),
        other => panic!("Expected Io error, got: {:?}", other),
    }
    Ok(())
}

#[test]
fn parallel_resolution_matches_sequential() -> Result<()> {
    let dir = TempDir::new()?;
    let paths: Vec<PathBuf> = (0..8)
        .map(|i| write_document(&dir, &format!("doc{}.yaml", i), &format!("id: {}\nextra: yes  # [cpp]\n", i)))
        .collect();
    let resolver = Resolver::new(defs(&["cpp"]));

    let parallel = resolver.resolve_paths(&paths)?;
    assert_eq!(parallel.len(), paths.len());
    for ((path, value), expected_path) in parallel.iter().zip(&paths) {
        assert_eq!(path, expected_path);
        assert_eq!(value, &resolver.resolve(path)?);
    }
    Ok(())
}

#[test]
fn deeply_nested_directive_is_expression_error() {
    for depth in [1_000, 10_000, 50_000] {
        let content = format!("a: 1\nb: 2  # [{}cpp{}]\n", "(".repeat(depth), ")".repeat(depth));
        let err = Resolver::new(defs(&["cpp"])).resolve_str(&content).unwrap_err();
        match err {
            ResolveError::Expression { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected Expression error, got: {:?}", other),
        }
    }

    let content = format!("a: 1  # [{}cpp]\n", "not ".repeat(200_000));
    let err = Resolver::default().filter(&content).unwrap_err();
    assert!(matches!(err, ResolveError::Expression { line: 1, .. }));
}

#[test]
fn carriage_return_documents_resolve_per_line() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_document(&dir, "classic.yaml", "a: 1\rb: 2  # [cpp]\rc: 3\r");

    assert_eq!(resolve(&path, &Definitions::default())?, yaml("a: 1\nc: 3"));
    assert_eq!(resolve(&path, &defs(&["cpp"]))?, yaml("a: 1\nb: 2\nc: 3"));
    Ok(())
}
