use super::types::RawConfigEntry;
use serde_json::Value;

/// Request kind that marks an entry as the test debug configuration.
pub const TEST_REQUEST: &str = "test";

/// First entry, in document order, that is a test request for `debugger_type`.
///
/// Other entries (launch/attach requests, other debuggers, junk) are skipped.
pub fn select_first<'a>(entries: &'a [Value], debugger_type: &str) -> Option<&'a RawConfigEntry> {
    entries
        .iter()
        .filter_map(Value::as_object)
        .find(|entry| is_test_entry(entry, debugger_type))
}

fn is_test_entry(entry: &RawConfigEntry, debugger_type: &str) -> bool {
    let field = |key: &str| entry.get(key).and_then(Value::as_str);
    field("type") == Some(debugger_type) && field("request") == Some(TEST_REQUEST)
}
