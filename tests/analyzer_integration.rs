use shipwright::detection::{analyze, detect_static_site, Framework, Language};
use std::fs;
use tempfile::TempDir;

fn repo_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

#[test]
fn analyzes_typical_flask_repository() {
    let repo = repo_with(&[
        ("requirements.txt", "Flask==3.0.0\nrequests==2.31\n"),
        ("app.py", "from flask import Flask\n"),
        ("README.md", "# demo\n"),
    ]);

    let info = analyze(repo.path()).unwrap();

    assert_eq!(info.language, Some(Language::Python));
    assert_eq!(info.framework, Some(Framework::Flask));
    assert_eq!(info.port, Some(5000));
    assert_eq!(info.entry_file.as_deref(), Some("app.py"));
    assert_eq!(info.start_command.as_deref(), Some("python app.py"));
    assert_eq!(info.dependencies.len(), 2);
    assert_eq!(info.dependencies[0], "flask==3.0.0");
}

#[test]
fn django_only_requirements_yield_django_on_port_8000() {
    let repo = repo_with(&[("requirements.txt", "django==5.0\ngunicorn\n")]);

    let info = analyze(repo.path()).unwrap();

    assert_eq!(info.language, Some(Language::Python));
    assert_eq!(info.framework, Some(Framework::Django));
    assert_eq!(info.port, Some(8000));
}

#[test]
fn flask_wins_when_manifest_names_both_frameworks() {
    let repo = repo_with(&[("requirements.txt", "django\nflask\n")]);

    let info = analyze(repo.path()).unwrap();

    assert_eq!(info.framework, Some(Framework::Flask));
    assert_eq!(info.port, Some(5000));
}

#[test]
fn node_repository_with_start_script() {
    let repo = repo_with(&[
        (
            "package.json",
            r#"{
  "name": "demo",
  "main": "server.js",
  "dependencies": {"express": "^4.18.0", "morgan": "^1.10.0"},
  "scripts": {"start": "node server.js"}
}"#,
        ),
        ("server.js", ""),
    ]);

    let info = analyze(repo.path()).unwrap();

    assert_eq!(info.language, Some(Language::Node));
    assert_eq!(info.framework, Some(Framework::Node));
    assert_eq!(info.dependencies, vec!["express", "morgan"]);
    assert_eq!(info.start_command.as_deref(), Some("node server.js"));
}

#[test]
fn node_repository_without_scripts_defaults_to_index_js() {
    let repo = repo_with(&[
        ("package.json", r#"{"dependencies": {"express": "^4"}}"#),
        ("index.js", ""),
    ]);

    let info = analyze(repo.path()).unwrap();

    assert_eq!(info.start_command.as_deref(), Some("node index.js"));
    assert_eq!(info.entry_file.as_deref(), Some("index.js"));
}

#[test]
fn app_subdirectory_is_searched_before_the_root() {
    let repo = repo_with(&[
        ("app/requirements.txt", "flask\n"),
        ("app/main.py", ""),
        ("requirements.txt", "django\n"),
    ]);

    let info = analyze(repo.path()).unwrap();

    assert_eq!(info.framework, Some(Framework::Flask));
    assert_eq!(
        info.start_command.as_deref(),
        Some("cd app && python main.py")
    );
}

#[test]
fn src_subdirectory_is_used_when_app_is_absent() {
    let repo = repo_with(&[("src/requirements.txt", "flask\n"), ("src/app.py", "")]);

    let info = analyze(repo.path()).unwrap();

    assert_eq!(info.framework, Some(Framework::Flask));
    assert_eq!(info.start_command.as_deref(), Some("cd src && python app.py"));
}

#[test]
fn repository_without_manifests_leaves_everything_unset() {
    let repo = repo_with(&[("README.md", "docs only\n")]);

    let info = analyze(repo.path()).unwrap();

    assert_eq!(info.language, None);
    assert_eq!(info.framework, None);
    assert_eq!(info.start_command, None);
    assert_eq!(info.port, None);
    assert!(info.dependencies.is_empty());
}

#[test]
fn static_tree_is_reported_with_its_document_root() {
    let plain = repo_with(&[("index.html", "<html></html>")]);
    assert_eq!(
        detect_static_site(plain.path()).unwrap().document_root,
        plain.path()
    );

    let built = repo_with(&[("public/index.htm", "<html></html>")]);
    assert_eq!(
        detect_static_site(built.path()).unwrap().document_root,
        built.path().join("public")
    );
}
