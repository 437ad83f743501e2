//! Integration tests for run directory collection
//!
//! These tests build a mock run directory to exercise reading and
//! degradation rules without a browser capture.

#[cfg(test)]
mod mock_run_tests {
    use crate::collector::{DirectoryTelemetrySource, TelemetrySource};
    use crate::config::ArtifactNames;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Helper to create a complete mock run directory
    fn create_mock_run(temp_dir: &TempDir) -> PathBuf {
        let run_dir = temp_dir.path().to_path_buf();

        let har = r#"{"log":{"entries":[
            {"startedDateTime":"2024-05-01T10:00:00.000Z","time":80,
             "request":{"method":"GET","url":"https://example.com/"},
             "response":{"status":200,"content":{"size":1000,"mimeType":"text/html"}}}
        ]}}"#;
        fs::write(run_dir.join("network.har"), har).unwrap();

        let metrics = r#"{
            "navigation": {"startTime":0,"responseStart":120,"loadEventEnd":900},
            "paint": [{"name":"first-contentful-paint","startTime":300}],
            "lcp": [{"startTime":450,"url":"https://example.com/hero.jpg"}],
            "layoutShifts": [{"startTime":500,"value":0.05,"sources":[]}]
        }"#;
        fs::write(run_dir.join("metrics.json"), metrics).unwrap();

        let timings = r#"[{"url":"https://example.com/","requestStart":10,"responseStart":60,"responseEnd":80}]"#;
        fs::write(run_dir.join("resource-timings.json"), timings).unwrap();

        let console = r#"[{"type":"error","text":"boom","location":{"url":"https://example.com/app.js","lineNumber":3,"columnNumber":7}}]"#;
        fs::write(run_dir.join("console.json"), console).unwrap();

        let filmstrip = run_dir.join("filmstrip");
        fs::create_dir_all(&filmstrip).unwrap();
        for name in ["frame-1500.jpg", "frame-0100.jpg", "frame-0700.jpg", "notes.txt"] {
            fs::write(filmstrip.join(name), b"x").unwrap();
        }

        fs::write(run_dir.join("screenshot.png"), b"png").unwrap();
        fs::write(run_dir.join("b-run.mp4"), b"mp4").unwrap();
        fs::write(run_dir.join("z-run.webm"), b"webm").unwrap();

        run_dir
    }

    #[test]
    fn test_collect_complete_run() {
        let temp_dir = TempDir::new().unwrap();
        let run_dir = create_mock_run(&temp_dir);

        let source = DirectoryTelemetrySource::new(&run_dir, ArtifactNames::default());
        let inputs = source.collect();

        assert_eq!(inputs.archive.as_ref().map(|a| a.len()), Some(1));
        assert_eq!(inputs.timing_samples.len(), 1);
        assert_eq!(inputs.timing_samples[0].request_start, Some(10.0));

        let metrics = inputs.metrics.unwrap();
        assert_eq!(metrics.paint.len(), 1);
        assert_eq!(metrics.lcp[0].url.as_deref(), Some("https://example.com/hero.jpg"));
        assert_eq!(metrics.layout_shifts.len(), 1);

        let console = inputs.console.unwrap();
        assert_eq!(console[0].message_type, "error");
        assert_eq!(console[0].location.as_ref().unwrap().line_number, Some(3));
    }

    #[test]
    fn test_artifact_listing() {
        let temp_dir = TempDir::new().unwrap();
        let run_dir = create_mock_run(&temp_dir);

        let source = DirectoryTelemetrySource::new(&run_dir, ArtifactNames::default());
        let artifacts = source.artifacts();

        let stamps: Vec<u64> = artifacts.filmstrip.iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(stamps, vec![100, 700, 1500]);
        assert_eq!(artifacts.filmstrip[0].path, "filmstrip/frame-0100.jpg");
        assert_eq!(artifacts.screenshot.as_deref(), Some("screenshot.png"));
        // webm has priority over mp4 even though the mp4 sorts first
        assert_eq!(artifacts.video.as_deref(), Some("z-run.webm"));
    }

    #[test]
    fn test_filmstrip_with_non_ascii_names() {
        let temp_dir = TempDir::new().unwrap();
        let filmstrip = temp_dir.path().join("filmstrip");
        fs::create_dir_all(&filmstrip).unwrap();
        for name in ["cadreé120.jpg", "frame–040.jpg", "aperçu.jpg"] {
            fs::write(filmstrip.join(name), b"x").unwrap();
        }

        let source = DirectoryTelemetrySource::new(temp_dir.path(), ArtifactNames::default());
        let artifacts = source.artifacts();

        let stamps: Vec<u64> = artifacts.filmstrip.iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(stamps, vec![40, 120]);
        assert_eq!(artifacts.filmstrip[1].path, "filmstrip/cadreé120.jpg");
    }

    #[test]
    fn test_empty_run_directory() {
        let temp_dir = TempDir::new().unwrap();

        let source = DirectoryTelemetrySource::new(temp_dir.path(), ArtifactNames::default());
        let inputs = source.collect();

        assert!(inputs.archive.is_none());
        assert!(inputs.timing_samples.is_empty());
        assert!(inputs.metrics.is_none());
        assert!(inputs.console.is_none());
        assert!(inputs.artifacts.is_empty());
    }

    #[test]
    fn test_malformed_blobs_degrade_to_absent() {
        let temp_dir = TempDir::new().unwrap();
        let run_dir = temp_dir.path();

        fs::write(run_dir.join("network.har"), "{").unwrap();
        fs::write(run_dir.join("metrics.json"), "[1,2").unwrap();
        fs::write(run_dir.join("console.json"), r#"{"not":"an array"}"#).unwrap();
        fs::write(run_dir.join("resource-timings.json"), "nope").unwrap();

        let source = DirectoryTelemetrySource::new(run_dir, ArtifactNames::default());
        let inputs = source.collect();

        assert!(inputs.archive.is_none());
        assert!(inputs.metrics.is_none());
        assert!(inputs.console.is_none());
        assert!(inputs.timing_samples.is_empty());
    }

    #[test]
    fn test_custom_artifact_names() {
        let temp_dir = TempDir::new().unwrap();
        let run_dir = temp_dir.path();
        fs::write(run_dir.join("final.png"), b"png").unwrap();
        fs::write(run_dir.join("capture.mp4"), b"mp4").unwrap();

        let names = ArtifactNames {
            screenshot: "final.png".to_string(),
            video_extensions: vec!["mp4".to_string()],
            ..Default::default()
        };
        let source = DirectoryTelemetrySource::new(run_dir, names);
        let artifacts = source.artifacts();

        assert_eq!(artifacts.screenshot.as_deref(), Some("final.png"));
        assert_eq!(artifacts.video.as_deref(), Some("capture.mp4"));
    }
}
