use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use url::Url;

fn command(args: &[&str], home: &Path, base_url: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_edulist"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    cmd.env("EDULIST_BASE_URL", base_url);
    cmd.env("NO_COLOR", "1");
    cmd.env("CLICOLOR", "0");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run the CLI with an isolated HOME against `base_url`.
pub fn run_cli_with_env(args: &[&str], home: &Path, base_url: &str) -> Output {
    command(args, home, base_url)
        .output()
        .expect("Failed to execute CLI")
}

/// Run the CLI with an isolated HOME and expect success.
pub fn run_cli_with_env_success(args: &[&str], home: &Path, base_url: &str) -> String {
    let output = run_cli_with_env(args, home, base_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI feeding `input` on stdin, then closing it.
pub fn run_cli_with_input(args: &[&str], home: &Path, base_url: &str, input: &str) -> Output {
    let mut child = command(args, home, base_url)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    let mut stdin = child.stdin.take().expect("stdin is piped");
    stdin
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    drop(stdin);

    child.wait_with_output().expect("Failed to wait for CLI")
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Write a fixture catalog into `dir` and return its file:// URL.
///
/// 15 Indian IITs and 3 German universities, three exams and two blog
/// articles. Each file uses a different envelope.
pub fn write_catalog(dir: &Path) -> String {
    std::fs::create_dir_all(dir).unwrap();

    let mut colleges: Vec<Value> = (1..=15)
        .map(|n| {
            json!({
                "_id": format!("c{}", n),
                "name": format!("IIT Campus {:02}", n),
                "slug": format!("iit-campus-{:02}", n),
                "country_ref": { "name": "India", "slug": "india" },
                "exams": ["JEE Advanced"],
                "ranking": n
            })
        })
        .collect();
    for (n, name) in ["TU Munich", "RWTH Aachen", "Heidelberg University"]
        .into_iter()
        .enumerate()
    {
        colleges.push(json!({
            "_id": format!("g{}", n),
            "name": name,
            "country_ref": "Germany",
            "exams": ["TestAS"]
        }));
    }
    write_json(dir, "colleges.json", &json!({ "colleges": colleges }));

    write_json(
        dir,
        "exams.json",
        &json!([
            {
                "_id": "e1",
                "name": "Joint Entrance Examination Main",
                "slug": "jee-main",
                "short_name": "JEE Main",
                "exam_type": "Engineering",
                "exam_mode": "Online"
            },
            {
                "_id": "e2",
                "name": "Joint Entrance Examination Advanced",
                "slug": "jee-advanced",
                "short_name": "JEE Advanced",
                "exam_type": "Engineering",
                "exam_mode": "Online"
            },
            {
                "_id": "e3",
                "name": "National Eligibility cum Entrance Test",
                "slug": "neet",
                "short_name": "NEET",
                "exam_type": "Medical",
                "exam_mode": "Offline"
            }
        ]),
    );

    write_json(
        dir,
        "blogs.json",
        &json!({
            "data": [
                {
                    "_id": "b1",
                    "title": "How to prepare for JEE",
                    "slug": "jee-preparation-tips",
                    "category": "Exam Preparation",
                    "tags": ["JEE", "study plan"],
                    "content": "Start with the syllabus.",
                    "author": "Editorial Team",
                    "read_time": 6,
                    "published_at": "2024-03-01T09:00:00Z"
                },
                {
                    "_id": "b2",
                    "title": "Studying in Germany",
                    "slug": "studying-in-germany",
                    "category": "Study Abroad",
                    "content": "Tuition is free at most public universities."
                }
            ]
        }),
    );

    Url::from_directory_path(dir)
        .expect("Failed to convert path to file URL")
        .to_string()
}

fn write_json(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}
