use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn qa_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("qa");
    path
}

fn run_qa(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    run_qa_with_env(config_path, args, &[])
}

fn run_qa_with_env(
    config_path: &Path,
    args: &[&str],
    env: &[(&str, &str)],
) -> (String, String, bool) {
    let binary = qa_binary();
    let mut command = Command::new(&binary);
    command
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        // Keep the cache empty and writable so no test touches the network
        // or the developer's real cache.
        .env_remove("QA_MODEL")
        .env_remove("QA_CACHE_DIR");
    for (key, value) in env {
        command.env(key, value);
    }
    let output = command
        .output()
        .unwrap_or_else(|e| panic!("Failed to run qa binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("qa.toml");
    let cache_dir = dir.path().join("cache");
    fs::write(
        &path,
        format!("{}\n[cache]\ndir = \"{}\"\n", body, cache_dir.display()),
    )
    .unwrap();
    path
}

#[test]
fn test_models_lists_manifest_with_defaults() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "");

    let (stdout, _, success) = run_qa(&config_path, &["models"]);
    assert!(success);
    assert!(stdout.contains("MODEL"));
    assert!(stdout.contains("distilbert-base-cased-distilled-squad (active)"));
    assert!(stdout.contains("distilbert-base-uncased-distilled-squad"));
    // Nothing has been fetched into the fresh cache
    assert!(stdout.contains("no"));
}

#[test]
fn test_models_works_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist.toml");

    let (stdout, _, success) = run_qa_with_env(
        &missing,
        &["models"],
        &[("QA_CACHE_DIR", tmp.path().join("cache").to_str().unwrap())],
    );
    assert!(success);
    assert!(stdout.contains("distilbert-base-cased-distilled-squad"));
}

#[test]
fn test_malformed_config_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("qa.toml");
    fs::write(&path, "[model\nname = !!").unwrap();

    let (_, stderr, success) = run_qa(&path, &["models"]);
    assert!(!success);
    assert!(stderr.contains("config"));
}

#[test]
fn test_invalid_config_values_fail() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "[model]\nmax_seq_len = 0");

    let (_, stderr, success) = run_qa(&config_path, &["models"]);
    assert!(!success);
    assert!(stderr.contains("max_seq_len"));
}

#[test]
fn test_unknown_model_rejected_before_any_download() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "[model]\nname = \"bert-large-nonexistent\"");

    let (_, stderr, success) = run_qa(&config_path, &["fetch"]);
    assert!(!success);
    assert!(stderr.contains("Unknown model"));
    // The cache must stay empty
    assert!(fs::read_dir(tmp.path().join("cache"))
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true));
}

#[test]
fn test_env_override_replaces_model_name() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "");

    let (_, stderr, success) = run_qa_with_env(
        &config_path,
        &["fetch"],
        &[("QA_MODEL", "bert-large-nonexistent")],
    );
    assert!(!success);
    assert!(stderr.contains("Unknown model"));
}

#[test]
fn test_ask_rejects_empty_question() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "");

    let (_, stderr, success) = run_qa(&config_path, &["ask", "   "]);
    assert!(!success);
    assert!(stderr.contains("Question is empty"));
}

#[test]
fn test_ask_rejects_missing_context_file() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "");

    let (_, stderr, success) = run_qa(
        &config_path,
        &[
            "ask",
            "Who created Python?",
            "--context-file",
            "/nonexistent/passage.txt",
        ],
    );
    assert!(!success);
    assert!(stderr.contains("context file"));
}

#[test]
fn test_chat_fails_fast_on_unknown_model() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(&tmp, "[model]\nname = \"bert-large-nonexistent\"");

    // stdin is closed: the command must fail during initialization without
    // ever prompting for a context.
    let binary = qa_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("chat")
        .stdin(std::process::Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to initialize the question answering model"));
}
