use chrono::{TimeZone, Utc};
use footfall::handlers::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_parse_start_time_utc() {
    let parsed = parse_start_time("2014-08-01T00:00:00Z").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2014, 8, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_start_time_with_offset() {
    let parsed = parse_start_time("2014-08-01T02:00:00+02:00").unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2014, 8, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_start_time_invalid() {
    let result = parse_start_time("yesterday around noon");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("invalid start time"));
}

#[test]
fn test_load_site_graph_defaults_to_demo() {
    let graph = load_site_graph(None).unwrap();
    assert!(!graph.is_empty());
}

#[test]
fn test_load_site_graph_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    write!(
        temp_file,
        r#"{{
            "pages": [
                {{"url": "http://shop.example.net/", "size": 900, "quit": 0.5}}
            ],
            "links": []
        }}"#
    )?;

    let path = PathBuf::from(temp_file.path());
    let graph = load_site_graph(Some(&path))?;
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.pages()[0].domain, "shop.example.net");
    Ok(())
}

#[test]
fn test_load_site_graph_missing_file() {
    let path = PathBuf::from("/nonexistent/site.json");
    let result = load_site_graph(Some(&path));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("failed to load site spec"));
}

#[test]
fn test_open_sink_writes_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp_file = NamedTempFile::new()?;
    let path = PathBuf::from(temp_file.path());
    {
        let mut sink = open_sink(Some(&path))?;
        writeln!(sink, "hello")?;
        sink.flush()?;
    }
    assert_eq!(std::fs::read_to_string(&path)?, "hello\n");
    Ok(())
}
