// Trace file handling and name extraction

use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_parse_trace_plain_text() {
    let content = "# baseline run\nopen(f)\n\n  read(f)  \nclose(f)\n";
    let trace = parse_trace(content).unwrap();
    assert_eq!(trace, vec!["open(f)", "read(f)", "close(f)"]);
}

#[test]
fn test_parse_trace_json_array() {
    let content = r#"["open(f)", "read(f)", "close(f)"]"#;
    let trace = parse_trace(content).unwrap();
    assert_eq!(trace.len(), 3);
    assert_eq!(trace[1], "read(f)");
}

#[test]
fn test_parse_trace_multiline_json_array() {
    let content = "[\n  \"open(f)\",\n  \"close(f)\"\n]\n";
    assert_eq!(parse_trace(content).unwrap(), vec!["open(f)", "close(f)"]);
}

#[test]
fn test_parse_trace_jvm_array_descriptor_is_plain_text() {
    let content = "[Ljava/lang/String;->clone()\nLjava/io/File;->delete()\n";
    let trace = parse_trace(content).unwrap();
    assert_eq!(
        trace,
        vec!["[Ljava/lang/String;->clone()", "Ljava/io/File;->delete()"]
    );
}

#[test]
fn test_parse_trace_empty() {
    assert!(parse_trace("").unwrap().is_empty());
    assert!(parse_trace("[]").unwrap().is_empty());
}

#[test]
fn test_load_trace_from_file() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "Landroid/app/Activity;->onCreate")?;
    writeln!(file, "Ljava/io/File;->delete(/sdcard/x)")?;
    file.flush()?;

    let trace = load_trace(file.path())?;
    assert_eq!(trace.len(), 2);
    assert_eq!(trace[0], "Landroid/app/Activity;->onCreate");

    Ok(())
}

#[test]
fn test_load_trace_missing_file() {
    let err = load_trace("/nonexistent/trace.txt").unwrap_err();
    assert!(matches!(err, TraceError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/trace.txt"));
}

#[test]
fn test_load_trace_invalid_json() -> anyhow::Result<()> {
    let mut file = NamedTempFile::new()?;
    write!(file, "[\"open(f)\", 42")?;
    file.flush()?;

    let err = load_trace(file.path()).unwrap_err();
    assert!(matches!(err, TraceError::Json { .. }));

    Ok(())
}

#[test]
fn test_save_then_load_preserves_order() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("trace.txt");
    let trace: Trace = vec!["b()".into(), "a(1)".into(), "b()".into()];

    save_trace(&path, &trace)?;
    assert_eq!(load_trace(&path)?, trace);

    Ok(())
}

#[test]
fn test_call_names() {
    let trace = vec!["open(f)", "read", "close(f, 0)"];
    assert_eq!(call_names(&trace).unwrap(), vec!["open", "read", "close"]);
}

#[test]
fn test_call_names_rejects_malformed() {
    let trace = vec!["open(f)", "read(f"];
    assert!(call_names(&trace).is_err());
}
