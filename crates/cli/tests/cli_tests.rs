//! CLI integration tests

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_lsc");

/// Write a small run directory with raw artifacts only
fn write_run(dir: &Path) {
    fs::write(
        dir.join("network.har"),
        r#"{"log":{"entries":[
            {"startedDateTime":"2024-05-01T10:00:00.000Z","time":150,
             "request":{"method":"GET","url":"https://example.com/"},
             "response":{"status":200,"content":{"size":8000,"mimeType":"text/html"}}},
            {"startedDateTime":"2024-05-01T10:00:00.100Z","time":80,
             "request":{"method":"GET","url":"https://example.com/app.js"},
             "response":{"status":200,"content":{"size":2048,"mimeType":"application/javascript"}}},
            {"startedDateTime":"2024-05-01T10:00:00.120Z","time":200,
             "request":{"method":"GET","url":"https://example.com/hero.jpg?w=800"},
             "response":{"status":200,"content":{"size":50000,"mimeType":"image/jpeg"}}}
        ]}}"#,
    )
    .unwrap();
    fs::write(
        dir.join("metrics.json"),
        r#"{"navigation":{"startTime":0,"domainLookupStart":5,"domainLookupEnd":25,
              "connectStart":25,"connectEnd":60,"requestStart":60,"responseStart":160,
              "responseEnd":200,"domInteractive":500,"domContentLoadedEventEnd":650,
              "loadEventEnd":1000},
            "paint":[{"name":"first-paint","startTime":400},
                     {"name":"first-contentful-paint","startTime":450}],
            "lcp":[{"startTime":700,"url":"https://example.com/hero.jpg?w=800","element":"IMG"}],
            "layoutShifts":[{"startTime":520,"value":0.04,"sources":[
                {"previousRect":{"x":0,"y":0,"width":1920,"height":100},
                 "currentRect":{"x":0,"y":100,"width":1920,"height":100},"node":"DIV"}]}]}"#,
    )
    .unwrap();
    fs::write(
        dir.join("console.json"),
        r#"[{"type":"error","text":"Uncaught TypeError","location":{"url":"https://example.com/app.js","lineNumber":10,"columnNumber":2}},
            {"type":"log","text":"ready"}]"#,
    )
    .unwrap();
}

fn lsc(home: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("LOADSCOPE_RUN_DIR")
        .env_remove("LOADSCOPE_ENGINE")
        .output()
        .expect("Failed to execute lsc")
}

fn json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "lsc failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    let output = lsc(home.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Inspect loadscope page-load reports"));
    for command in ["summary", "phases", "waterfall", "shifts", "console"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    let output = lsc(home.path(), &["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("lsc"));
}

#[test]
fn test_summary_json_from_raw_artifacts() {
    let home = TempDir::new().unwrap();
    let run = TempDir::new().unwrap();
    write_run(run.path());
    let dir = run.path().to_str().unwrap();

    let value = json(&lsc(home.path(), &["-d", dir, "-f", "json", "summary"]));
    assert_eq!(value["url"], "https://example.com/");
    assert_eq!(value["vitals"]["fcp"]["value"], 450.0);
    assert_eq!(value["vitals"]["fcp"]["rating"], "Good");
    assert_eq!(value["vitals"]["ttfb"]["value"], 160.0);
    assert_eq!(value["network"]["request_count"], 3);
    assert_eq!(value["console"]["error"], 1);

    // inspecting never writes the model
    assert!(!run.path().join("report-model.json").exists());
}

#[test]
fn test_waterfall_filter_and_lcp_flag() {
    let home = TempDir::new().unwrap();
    let run = TempDir::new().unwrap();
    write_run(run.path());
    let dir = run.path().to_str().unwrap();

    let value = json(&lsc(home.path(), &["-d", dir, "-f", "json", "waterfall", "--type", "image"]));
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["label"], "hero.jpg");
    assert_eq!(rows[0]["is_lcp"], true);
    assert_eq!(rows[0]["size_label"], "48.83 KB");

    let value = json(&lsc(home.path(), &["-d", dir, "-f", "json", "waterfall", "-n", "2"]));
    assert_eq!(value.as_array().unwrap().len(), 2);
}

#[test]
fn test_waterfall_table_marks_lcp() {
    let home = TempDir::new().unwrap();
    let run = TempDir::new().unwrap();
    write_run(run.path());

    let output = lsc(home.path(), &["-d", run.path().to_str().unwrap(), "waterfall"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("hero.jpg [LCP]"));
    assert!(stdout.contains("app.js"));
}

#[test]
fn test_console_level_filter() {
    let home = TempDir::new().unwrap();
    let run = TempDir::new().unwrap();
    write_run(run.path());
    let dir = run.path().to_str().unwrap();

    let value = json(&lsc(home.path(), &["-d", dir, "-f", "json", "console", "--level", "error"]));
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["source"], "https://example.com/app.js:10:2");
}

#[test]
fn test_phases_and_shifts() {
    let home = TempDir::new().unwrap();
    let run = TempDir::new().unwrap();
    write_run(run.path());
    let dir = run.path().to_str().unwrap();

    let value = json(&lsc(home.path(), &["-d", dir, "-f", "json", "phases"]));
    assert_eq!(value["total_ms"], 1000.0);
    assert_eq!(value["phases"]["dns"]["duration_ms"], 20.0);
    // no TLS on this connection, so no ssl legend entry
    let legend = value["legend"].as_array().unwrap();
    assert!(legend.iter().all(|e| e["phase"] != "ssl"));

    let value = json(&lsc(home.path(), &["-d", dir, "-f", "json", "shifts"]));
    let shifts = value.as_array().unwrap();
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0]["sources"][0]["current"]["width_pct"], 100.0);
}

#[test]
fn test_prefers_written_model() {
    let home = TempDir::new().unwrap();
    let run = TempDir::new().unwrap();
    write_run(run.path());
    let dir = run.path().to_str().unwrap();

    // a model written for a firefox capture wins over the raw artifacts
    fs::write(
        run.path().join("report-model.json"),
        report_model_json(run.path(), "firefox"),
    )
    .unwrap();
    let written = json(&lsc(home.path(), &["-d", dir, "-f", "json", "summary"]));
    assert_eq!(written["engine"], "firefox");

    let rebuilt = json(&lsc(home.path(), &["-d", dir, "--rebuild", "-f", "json", "summary"]));
    assert_eq!(rebuilt["engine"], "chromium");
}

/// Build a model JSON with the library, as the reporter would write it
fn report_model_json(run_dir: &Path, engine: &str) -> Vec<u8> {
    let config = report_lib::RunConfig::default().with_engine(engine.parse().unwrap());
    let pipeline = report_lib::ReportPipeline::new(config);
    let model = pipeline.build_model(pipeline.collect(run_dir));
    serde_json::to_vec(&model).unwrap()
}

#[test]
fn test_default_format_from_config_file() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("loadscope");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.json"), r#"{"default_format":"json"}"#).unwrap();

    let run = TempDir::new().unwrap();
    write_run(run.path());

    let value = json(&lsc(home.path(), &["-d", run.path().to_str().unwrap(), "shifts"]));
    assert!(value.is_array());
}

#[test]
fn test_missing_run_dir_fails() {
    let home = TempDir::new().unwrap();
    let output = lsc(home.path(), &["-d", "/nonexistent/loadscope-run", "summary"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_empty_run_dir_reports_no_network() {
    let home = TempDir::new().unwrap();
    let run = TempDir::new().unwrap();

    let output = lsc(home.path(), &["-d", run.path().to_str().unwrap(), "waterfall"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No network data captured"));
}
