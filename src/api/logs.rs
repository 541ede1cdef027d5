use serde::Deserialize;

/// A structured (`terraform -json`) log line. Only the fields we display are decoded.
#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(rename = "@message")]
    message: String,
}

/// Turn a raw plan/apply log stream into display lines.
///
/// JSON lines contribute their `@message`; anything else is kept verbatim.
pub fn log_messages(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| match serde_json::from_str::<LogEntry>(line) {
            Ok(entry) => entry.message,
            Err(_) => line.to_string(),
        })
        .collect()
}
