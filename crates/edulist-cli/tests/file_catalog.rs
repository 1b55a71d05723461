//! CLI integration tests against a file-backed catalog.

mod common;

use std::path::PathBuf;

use tempfile::TempDir;

use common::{
    run_cli_with_env, run_cli_with_env_success, run_cli_with_input, stderr, stdout, write_catalog,
};

struct Fixture {
    _dir: TempDir,
    home: PathBuf,
    url: String,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let url = write_catalog(&dir.path().join("catalog"));
    let home = dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    Fixture {
        _dir: dir,
        home,
        url,
    }
}

#[test]
fn test_colleges_first_page() {
    let fx = fixture();

    let output = run_cli_with_env(&["colleges", "--search", "IIT"], &fx.home, &fx.url);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert_eq!(out.lines().count(), 10);
    assert!(out.contains("IIT Campus 01"));
    assert!(!out.contains("IIT Campus 11"));

    let err = stderr(&output);
    assert!(err.contains("Showing 10 of 15 colleges"));
    assert!(err.contains("More results available"));
}

#[test]
fn test_colleges_scrolls_to_second_page() {
    let fx = fixture();

    let output = run_cli_with_env(
        &["colleges", "--search", "iit", "--pages", "3"],
        &fx.home,
        &fx.url,
    );
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert_eq!(out.lines().count(), 15);
    assert!(out.contains("IIT Campus 15"));

    let err = stderr(&output);
    assert!(err.contains("Showing 15 of 15 colleges"));
    assert!(!err.contains("More results available"));
}

#[test]
fn test_colleges_country_filter_and_facets() {
    let fx = fixture();

    let out = run_cli_with_env_success(
        &["colleges", "--country", "Germany", "--facets"],
        &fx.home,
        &fx.url,
    );

    assert!(out.contains("TU Munich"));
    assert!(out.contains("Heidelberg University"));
    assert!(!out.contains("IIT Campus"));
    assert!(out.contains("country: Germany"));
    assert!(out.contains("exam: TestAS"));
}

#[test]
fn test_no_results_is_not_an_error() {
    let fx = fixture();

    let output = run_cli_with_env(&["colleges", "--search", "Oxford"], &fx.home, &fx.url);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("No results matched your filters"));
}

#[test]
fn test_exams_filtered_by_type() {
    let fx = fixture();

    let out = run_cli_with_env_success(&["exams", "--type", "Engineering"], &fx.home, &fx.url);

    assert_eq!(out.lines().count(), 2);
    assert!(out.contains("JEE Main"));
    assert!(out.contains("JEE Advanced"));
    assert!(!out.contains("NEET"));
}

#[test]
fn test_exams_search_is_case_insensitive() {
    let fx = fixture();

    let out = run_cli_with_env_success(&["exams", "-s", "neet"], &fx.home, &fx.url);

    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("National Eligibility cum Entrance Test"));
}

#[test]
fn test_blogs_json_output() {
    let fx = fixture();

    let out = run_cli_with_env_success(
        &["blogs", "--category", "Study Abroad", "--json"],
        &fx.home,
        &fx.url,
    );

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 1);
    let blog: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(blog["slug"], "studying-in-germany");
    assert_eq!(blog["_id"], "b2");
}

#[test]
fn test_blog_by_slug() {
    let fx = fixture();

    let out = run_cli_with_env_success(&["blog", "jee-preparation-tips"], &fx.home, &fx.url);

    assert!(out.contains("How to prepare for JEE"));
    assert!(out.contains("Editorial Team"));
    assert!(out.contains("6 min"));
    assert!(out.contains("01 March 2024"));
    assert!(out.contains("Start with the syllabus."));
}

#[test]
fn test_blog_not_found() {
    let fx = fixture();

    let output = run_cli_with_env(&["blog", "no-such-article"], &fx.home, &fx.url);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Blog not found"));
}

#[test]
fn test_missing_catalog_directory() {
    let fx = fixture();
    let missing = url::Url::from_directory_path(fx.home.join("nowhere"))
        .unwrap()
        .to_string();

    let output = run_cli_with_env(&["exams"], &fx.home, &missing);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unable to reach the server"));
}

#[test]
fn test_config_set_and_show() {
    let fx = fixture();

    let out = run_cli_with_env_success(&["config", "set", "page_size", "5"], &fx.home, &fx.url);
    assert!(out.contains("Set page_size = 5"));

    let path = run_cli_with_env_success(&["config", "path"], &fx.home, &fx.url);
    assert!(path.trim().ends_with("config.json"));
    assert!(PathBuf::from(path.trim()).exists());

    let shown = run_cli_with_env_success(&["config", "show"], &fx.home, &fx.url);
    assert!(shown.contains("page_size: 5"));
    assert!(shown.contains(&format!("base_url: {}", fx.url)));

    let out = run_cli_with_env_success(&["colleges", "-s", "IIT"], &fx.home, &fx.url);
    assert_eq!(out.lines().count(), 5);
}

#[test]
fn test_config_rejects_unknown_key() {
    let fx = fixture();

    let output = run_cli_with_env(&["config", "set", "colour", "blue"], &fx.home, &fx.url);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown setting"));
}

#[test]
fn test_browse_commits_search_text() {
    let fx = fixture();

    let output = run_cli_with_input(&["browse", "colleges"], &fx.home, &fx.url, "IIT\n");
    assert!(output.status.success(), "{}", stderr(&output));

    let err = stderr(&output);
    assert!(err.contains("Showing 10 of 18 colleges"));
    assert!(err.contains("Showing 10 of 15 colleges"));
    assert!(err.contains("Type :more to load more"));
}

#[test]
fn test_browse_facet_command() {
    let fx = fixture();

    let output = run_cli_with_input(
        &["browse", "colleges"],
        &fx.home,
        &fx.url,
        ":country Germany\n",
    );
    assert!(output.status.success(), "{}", stderr(&output));

    assert!(stdout(&output).contains("RWTH Aachen"));
    assert!(stderr(&output).contains("Showing 3 of 3 colleges"));
}

#[test]
fn test_browse_quit_skips_pending_search() {
    let fx = fixture();

    let output = run_cli_with_input(&["browse", "exams"], &fx.home, &fx.url, "NEET\n:quit\n");
    assert!(output.status.success(), "{}", stderr(&output));

    assert!(!stderr(&output).contains("Showing 1 of 1 exams"));
}
