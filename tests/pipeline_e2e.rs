//! End-to-end pipeline run against a stubbed provisioning binary.

#![cfg(unix)]

use shipwright::pipeline::{self, RunContext};
use shipwright::source::SourceSpec;
use shipwright::strategy::Strategy;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_TERRAFORM: &str = r#"#!/bin/sh
case "$1" in
  init) echo "Terraform has been successfully initialized." ;;
  apply) echo "Apply complete! Resources: 2 added." ;;
  output) echo '{"public_ip": {"sensitive": false, "type": "string", "value": "203.0.113.7"}}' ;;
esac
exit 0
"#;

const FAILING_TERRAFORM: &str = r#"#!/bin/sh
echo "Error: provider initialization failed" >&2
exit 1
"#;

fn write_stub(dir: &Path, script: &str) -> PathBuf {
    let path = dir.join("terraform");
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn flask_bundle(dir: &Path) -> PathBuf {
    let archive_path = dir.join("bundle.zip");
    let file = fs::File::create(&archive_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    writer.start_file("requirements.txt", options).unwrap();
    writer.write_all(b"flask\n").unwrap();
    writer.start_file("app.py", options).unwrap();
    writer
        .write_all(b"from flask import Flask\napp = Flask(__name__)\napp.run(debug=True)\n")
        .unwrap();
    writer.finish().unwrap();
    archive_path
}

fn context(workspace: &Path, terraform: &Path) -> RunContext {
    RunContext {
        app_dir: workspace.join("deployments/current_app"),
        terraform_dir: workspace.join("deployments/tf_generated"),
        template_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("terraform_templates"),
        terraform_binary: terraform.display().to_string(),
    }
}

#[tokio::test]
async fn deploys_a_flask_bundle_end_to_end() {
    let workspace = TempDir::new().unwrap();
    let terraform = write_stub(workspace.path(), FAKE_TERRAFORM);
    let bundle = flask_bundle(workspace.path());
    let ctx = context(workspace.path(), &terraform);

    let source = SourceSpec::Zip { path: bundle };
    let report = pipeline::run(&ctx, "deploy this flask app on aws as serverless", &source).await;

    assert!(report.succeeded());
    assert_eq!(report.endpoint.as_deref(), Some("203.0.113.7"));
    assert_eq!(report.strategy, Some(Strategy::Serverless));
    assert_eq!(report.template.as_deref(), Some("aws_lambda.tf.j2"));

    // The working tree was patched in place.
    let app = fs::read_to_string(ctx.app_dir.join("app.py")).unwrap();
    assert!(app.contains("app.run(host='0.0.0.0', debug=True)"));

    // The generated configuration landed in the terraform directory.
    assert!(ctx.terraform_dir.join("main.tf").is_file());
    assert!(ctx.terraform_dir.join("variables.tf").is_file());
}

#[tokio::test]
async fn failed_provisioning_yields_a_report_without_endpoint() {
    let workspace = TempDir::new().unwrap();
    let terraform = write_stub(workspace.path(), FAILING_TERRAFORM);
    let bundle = flask_bundle(workspace.path());
    let ctx = context(workspace.path(), &terraform);

    let source = SourceSpec::Zip { path: bundle };
    let report = pipeline::run(&ctx, "deploy this flask app on aws", &source).await;

    assert!(!report.succeeded());
    assert_eq!(report.endpoint, None);
    assert!(report.failure().is_some());
    // Everything up to provisioning still completed.
    assert_eq!(report.template.as_deref(), Some("aws_lambda.tf.j2"));
}

#[tokio::test]
async fn missing_source_archive_aborts_the_run() {
    let workspace = TempDir::new().unwrap();
    let terraform = write_stub(workspace.path(), FAKE_TERRAFORM);
    let ctx = context(workspace.path(), &terraform);

    let source = SourceSpec::Zip {
        path: workspace.path().join("missing.zip"),
    };
    let report = pipeline::run(&ctx, "deploy this on aws", &source).await;

    assert!(!report.succeeded());
    assert!(report.app_info.is_none());
    assert!(report.failure().is_some());
}
