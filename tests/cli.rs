use std::collections::HashSet;
use std::process::Command;

fn run_typosquat(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_typosquat"))
        .args(args)
        .output()
        .expect("failed to execute typosquat");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

fn lines(stdout: &str) -> Vec<&str> {
    stdout.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn assert_no_original(domains: &[&str], original: &str) {
    assert!(
        !domains.contains(&original),
        "original domain '{}' was included in output",
        original
    );
}

fn assert_unique(domains: &[&str]) {
    let unique: HashSet<&&str> = domains.iter().collect();
    assert_eq!(unique.len(), domains.len(), "duplicate domains in output");
}

#[test]
fn default_run_prints_candidates_without_lookups() {
    let (code, stdout, _) = run_typosquat(&["friend.com"]);
    assert_eq!(code, 0);

    let domains = lines(&stdout);
    assert!(domains.contains(&"ffriend.com"));
    assert!(domains.contains(&"freind.com"));
    assert!(domains.iter().all(|d| d.ends_with(".com")));
    assert_no_original(&domains, "friend.com");
    assert_unique(&domains);
}

#[test]
fn toggling_off_defaults_leaves_only_repeats() {
    let (code, stdout, _) = run_typosquat(&["abc.com", "--omit-chars", "--swap-chars"]);
    assert_eq!(code, 0);
    assert_eq!(lines(&stdout), vec!["aabc.com", "abbc.com", "abcc.com"]);
}

#[test]
fn omit_only_on_plain_word_prints_nothing() {
    let (code, stdout, _) = run_typosquat(&["example.com", "--repeat-chars", "--swap-chars"]);
    assert_eq!(code, 0);
    assert!(lines(&stdout).is_empty());
}

#[test]
fn change_suffix_uses_given_suffixes() {
    let (code, stdout, _) = run_typosquat(&[
        "example.com",
        "--omit-chars",
        "--repeat-chars",
        "--swap-chars",
        "--change-suffix",
        "--suffixes",
        "com,net,co.uk",
    ]);
    assert_eq!(code, 0);
    assert_eq!(lines(&stdout), vec!["example.net", "example.co.uk"]);
}

#[test]
fn max_candidates_caps_output() {
    let (code, stdout, _) = run_typosquat(&["bookkeeper.com", "--max-candidates", "3"]);
    assert_eq!(code, 0);
    assert_eq!(lines(&stdout).len(), 3);
}

#[test]
fn output_is_deterministic() {
    let (_, first, _) = run_typosquat(&["mississippi.com", "--change-suffix"]);
    let (_, second, _) = run_typosquat(&["mississippi.com", "--change-suffix"]);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn json_lines_carry_the_strategy() {
    let (code, stdout, _) = run_typosquat(&["abc.com", "--omit-chars", "--swap-chars", "--json"]);
    assert_eq!(code, 0);
    let first = lines(&stdout)[0];
    assert_eq!(first, r#"{"domain":"aabc.com","strategy":"repeat-single"}"#);
}

#[test]
fn malformed_domain_fails_before_output() {
    let (code, stdout, stderr) = run_typosquat(&["co.uk"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(lines(&stderr).len(), 1);
    assert!(stderr.starts_with("typosquat: malformed domain"));
}

#[test]
fn broken_labels_fail_instead_of_printing_nothing() {
    for domain in ["a..com", ".example.com", "foo-.com"] {
        let (code, stdout, stderr) = run_typosquat(&[domain]);
        assert_eq!(code, 1, "{domain}");
        assert!(stdout.is_empty());
        assert!(stderr.starts_with("typosquat: malformed domain"), "{stderr}");
    }
}

#[test]
fn missing_domain_is_a_usage_error() {
    let (code, stdout, _) = run_typosquat(&[]);
    assert_ne!(code, 0);
    assert!(stdout.is_empty());
}
