// urlscrub/tests/cli_integration_tests.rs
//! Command-line integration tests for the `urlscrub` binary.
//!
//! These run the compiled binary with `assert_cmd`, feed it stdin, and check
//! stdout (cleaned text, JSON, tables) and stderr (per-URL report, errors).
//! Temporary rule and output files come from `tempfile`.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn urlscrub() -> Command {
    let mut cmd = Command::cargo_bin("urlscrub").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd.env_remove("URLSCRUB_LANG");
    cmd
}

fn run_clean(input: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = urlscrub();
    cmd.arg("clean").args(args);
    cmd.write_stdin(input.as_bytes());
    cmd.assert()
}

fn strip_ansi(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(bytes)).to_string()
}

#[test]
fn test_clean_stdin_with_default_rules() {
    let assert = run_clean("Check https://example.com/a?utm_source=x&id=1 now\n", &[]).success();
    let output = assert.get_output();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Check https://example.com/a?id=1 now\n");

    let stderr = strip_ansi(&output.stderr);
    assert!(stderr.contains("Detected 1 URL(s):"), "stderr was: {}", stderr);
    assert!(stderr.contains("Cleaned link: https://example.com/a?id=1"));
    assert!(stderr.contains("Applied rules: Google's Urchin Tracking Module"));
    assert!(stderr.contains("Removed parameters: utm_source"));
}

#[test]
fn test_clean_reports_already_clean_urls() {
    run_clean("https://example.com/plain\n", &[])
        .success()
        .stdout("https://example.com/plain\n")
        .stderr(predicate::str::contains("Applied rules: None -> URL was already clean?"));
}

#[test]
fn test_clean_without_urls() {
    run_clean("nothing to clean\n", &[])
        .success()
        .stdout("nothing to clean\n")
        .stderr(predicate::str::contains("Failed to find any links."));
}

#[test]
fn test_clean_report_in_german() {
    run_clean("https://example.com/?fbclid=1\n", &["--lang", "de"])
        .success()
        .stderr(predicate::str::contains("1 URL(s) gefunden:"))
        .stderr(predicate::str::contains("Entfernte Parameter: fbclid"));
}

#[test]
fn test_clean_mydealz_share_link_is_rewritten() {
    let assert = run_clean("https://www.mydealz.de/share-deal-from-app/2117879\n", &["--no-summary"]).success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(is_rewritten_deal_link(&stdout), "unexpected rewrite result: {}", stdout);
}

fn is_rewritten_deal_link(stdout: &str) -> bool {
    let Some(rest) = stdout.trim_end().strip_prefix("https://www.mydealz.de/deals/") else {
        return false;
    };
    let mut chars = rest.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase()) && chars.as_str() == "-2117879"
}

#[test]
fn test_clean_json_output() -> Result<()> {
    let assert = run_clean("a https://www.amazon.de/dp/B0TEST?tag=x-21&psc=1 b", &["--json", "--no-summary"]).success();
    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(json["cleaned_text"], "a https://www.amazon.de/dp/B0TEST b");
    assert_eq!(json["modified_count"], 1);
    assert_eq!(json["urls"][0]["cleaned_url"], "https://www.amazon.de/dp/B0TEST");
    assert_eq!(json["urls"][0]["applied_rules"][0], "Amazon remove all parameters");
    assert_eq!(json["summary"][0]["occurrences"], 1);
    Ok(())
}

#[test]
fn test_clean_diff_output() {
    run_clean("keep\nhttps://example.com/?gclid=1\n", &["--diff", "--no-summary"])
        .success()
        .stdout(predicate::str::contains("- https://example.com/?gclid=1"))
        .stdout(predicate::str::contains("+ https://example.com/"));
}

#[test]
fn test_clean_input_and_output_files() -> Result<()> {
    let mut input = NamedTempFile::new()?;
    input.write_all(b"https://example.com/?fbclid=1&page=2")?;
    let dir = tempdir()?;
    let output = dir.path().join("cleaned.txt");

    urlscrub()
        .args(["clean", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .arg("--no-summary")
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(&output)?, "https://example.com/?page=2\n");
    Ok(())
}

#[test]
fn test_clean_with_custom_rules_only() -> Result<()> {
    let mut rules = NamedTempFile::new()?;
    rules.write_all(br#"[{ "name": "Session", "paramsBlacklist": ["sid"] }]"#)?;

    run_clean(
        "https://example.com/?sid=1&utm_source=x\n",
        &["--no-default-rules", "--rules", rules.path().to_str().unwrap()],
    )
    .success()
    .stdout("https://example.com/?utm_source=x\n")
    .stderr(predicate::str::contains("Applied rules: Session"));
    Ok(())
}

#[test]
fn test_clean_disable_rule_by_name() {
    run_clean("https://example.com/?fbclid=1\n", &["--disable", "Facebook Click Identifier", "--no-summary"])
        .success()
        .stdout("https://example.com/?fbclid=1\n");
}

#[test]
fn test_clean_keep_tracking() {
    run_clean("https://example.com/?utm_source=x\n", &["--keep-tracking", "--no-summary"])
        .success()
        .stdout("https://example.com/?utm_source=x\n");
}

#[test]
fn test_clean_affiliate_flag() {
    run_clean("https://www.ebay.de/sch/i.html?_nkw=lego&mkcid=1\n", &["--affiliate"])
        .success()
        .stdout("https://www.ebay.de/sch/i.html?_nkw=lego\n")
        .stderr(predicate::str::contains("Removed parameters: mkcid"));
}

#[test]
fn test_quiet_suppresses_stderr() {
    run_clean("https://example.com/?fbclid=1\n", &["-q"])
        .success()
        .stdout("https://example.com/\n")
        .stderr("");
}

#[test]
fn test_missing_rules_file_fails() {
    run_clean("https://example.com/\n", &["--rules", "/definitely/missing/rules.json"])
        .failure()
        .stderr(predicate::str::contains("Failed to load rules from"));
}

#[test]
fn test_rules_list_shows_default_rules() {
    urlscrub()
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Google Click Identifier"))
        .stdout(predicate::str::contains("remove all"));
}

#[test]
fn test_rules_export_writes_native_json() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("out").join("rules.json");

    urlscrub().args(["rules", "export"]).arg(&path).assert().success();

    let rules: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    let names: Vec<&str> = rules
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|rule| rule["name"].as_str())
        .collect();
    assert!(names.contains(&"MyDealz Tracking Redirect Remover"));
    Ok(())
}

#[test]
fn test_rules_import_community_catalogue() -> Result<()> {
    let mut catalogue = NamedTempFile::new()?;
    catalogue.write_all(
        br#"{ "providers": {
            "amazon": { "urlPattern": "amazon", "rules": ["tag"] },
            "example": { "urlPattern": "example\\.org", "rules": ["track"] }
        } }"#,
    )?;
    let dir = tempdir()?;
    let out = dir.path().join("merged.json");

    urlscrub()
        .args(["rules", "import"])
        .arg(catalogue.path())
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("(1 new)"));

    let merged = fs::read_to_string(&out)?;
    assert!(merged.contains("\"example\""));
    assert!(merged.contains("Google Click Identifier"));
    assert!(!merged.contains("\"amazon\""));
    Ok(())
}

#[test]
fn test_rules_import_rejects_unknown_shape() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    file.write_all(br#"{ "rules": 3 }"#)?;
    let dir = tempdir()?;

    urlscrub()
        .args(["rules", "import"])
        .arg(file.path())
        .arg("--out")
        .arg(dir.path().join("never.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to import rules from"));

    assert!(!dir.path().join("never.json").exists());
    Ok(())
}

#[test]
fn test_rules_verify_default_fixtures() {
    urlscrub()
        .args(["rules", "verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MyDealz Tracking Redirect Remover"));
}

#[test]
fn test_rules_verify_reports_failing_fixture() -> Result<()> {
    let mut rules = NamedTempFile::new()?;
    rules.write_all(
        br#"[{ "name": "Never", "paramsBlacklist": ["nothing"], "testUrls": ["https://example.com/?other=1"] }]"#,
    )?;

    urlscrub()
        .args(["rules", "verify", "--no-default-rules", "--rules"])
        .arg(rules.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 rule test URL(s) did not apply"));
    Ok(())
}
