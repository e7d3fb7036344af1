// Tests for output formatting
//
// These tests cover the human renderings of states, reports and schemas
// and the machine formats' shapes.

use super::*;
use formflow_core::{FieldValues, IssueCode};
use formflow_schemas::contact_schema;
use std::cell::RefCell;
use std::rc::Rc;

/// Writer that keeps everything written for later inspection
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn rejected_state() -> SubmissionState {
    let mut fields = FieldValues::new();
    fields.insert("first".into(), "".into());
    fields.insert("last".into(), "Doe".into());
    let mut issues = FieldErrorMap::new();
    issues.insert("first".into(), "First name is required".into());
    SubmissionState::rejected("Invalid form data", fields, issues)
}

#[test]
fn test_state_human_rejection() {
    let formatted = format_state_human(&rejected_state());
    assert!(formatted.starts_with("✗ Invalid form data\n"));
    assert!(formatted.contains("Errors:\n  • first: First name is required\n"));
    assert!(formatted.contains("  first = \"\"\n"));
    assert!(formatted.contains("  last = \"Doe\"\n"));
}

#[test]
fn test_state_human_success_and_initial() {
    let formatted = format_state_human(&SubmissionState::succeeded("Form submitted successfully"));
    assert_eq!(formatted, "✓ Form submitted successfully\n");
    assert_eq!(format_state_human(&SubmissionState::initial()), "No submission yet\n");
}

#[test]
fn test_state_json_matches_wire_shape() {
    let formatted = OutputFormat::Json
        .format_state(&SubmissionState::succeeded("Form submitted successfully"))
        .unwrap();
    assert_eq!(formatted, r#"{"message":"Form submitted successfully"}"#);
}

#[test]
fn test_report_human_lists_issues_and_fields() {
    let issues = vec![
        Issue::new("email", IssueCode::Required, "Email is required"),
        Issue::new("email", IssueCode::Email, "Invalid email address"),
    ];
    let mut errors = FieldErrorMap::new();
    errors.insert("email".into(), "Email is required".into());

    let formatted = format_report_human(&ValidationReport {
        valid: false,
        issues,
        errors,
    });
    assert!(formatted.contains("2 issue(s)"));
    assert!(formatted.contains("1. $.email [required] Email is required"));
    assert!(formatted.contains("2. $.email [email] Invalid email address"));
    assert!(formatted.contains("  • email: Email is required"));
}

#[test]
fn test_schema_human_table() {
    let formatted = format_schema_human(&contact_schema());
    assert!(formatted.starts_with("Schema: contact\n"));
    assert!(formatted.contains("Field"));
    assert!(formatted.contains("required, email"));
}

#[test]
fn test_render_table_alignment() {
    let table = render_table(
        &["Session", "Outcome"],
        &[
            vec!["alice".to_string(), "accepted".to_string()],
            vec!["bob-the-builder".to_string(), "rejected".to_string()],
        ],
    );
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Session         │ Outcome");
    assert_eq!(lines[2], "alice           │ accepted");
}

#[test]
fn test_writer_quiet_suppresses_info_but_not_data() {
    let buffer = SharedBuffer::default();
    let mut writer = OutputWriter::with_writer(OutputFormat::Human, false, true, Box::new(buffer.clone()));

    writer.info("hidden").unwrap();
    writer.success("hidden").unwrap();
    writer.state(&SubmissionState::succeeded("shown")).unwrap();

    assert_eq!(buffer.contents(), "✓ shown\n");
}

#[test]
fn test_writer_machine_format_skips_decorations() {
    let buffer = SharedBuffer::default();
    let mut writer = OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(buffer.clone()));

    writer.section("State").unwrap();
    writer.warning("careful").unwrap();
    writer.state(&rejected_state()).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
    assert_eq!(parsed["issues"]["first"], "First name is required");
    assert_eq!(parsed["fields"]["last"], "Doe");
}

#[test]
fn test_writer_yaml_state() {
    let buffer = SharedBuffer::default();
    let mut writer = OutputWriter::with_writer(OutputFormat::Yaml, false, false, Box::new(buffer.clone()));
    writer.state(&SubmissionState::succeeded("done")).unwrap();
    assert_eq!(buffer.contents(), "message: done\n");
}
