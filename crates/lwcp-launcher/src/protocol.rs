//! Parsing of the tool's JSON status envelope
//!
//! With `SFDX_JSON_TO_STDOUT=true` the tool prints its final status as a JSON
//! object on stdout, usually pretty-printed across several lines:
//!
//! ```json
//! {
//!   "status": 1,
//!   "name": "SimulatorNotFound",
//!   "message": "Unable to boot simulator",
//!   "warnings": []
//! }
//! ```
//!
//! [`EnvelopeParser`] is fed stdout one line at a time and yields each
//! complete envelope. Non-JSON lines (progress text) are ignored.

use serde::Deserialize;
use serde_json::Value;

use lwcp_core::prelude::*;

/// Upper bound on buffered lines for a single envelope
const MAX_ENVELOPE_LINES: usize = 2000;

/// The tool's JSON status envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    pub status: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ToolResponse {
    pub fn is_error(&self) -> bool {
        self.status != 0
    }

    /// Human-readable error, `"<name>: <message>"` when both are present
    pub fn error_message(&self) -> Option<String> {
        if !self.is_error() {
            return None;
        }
        match (&self.name, &self.message) {
            (Some(name), Some(message)) => Some(format!("{}: {}", name, message)),
            (None, Some(message)) => Some(message.clone()),
            (Some(name), None) => Some(name.clone()),
            (None, None) => None,
        }
    }
}

/// Parse a single complete JSON document as a status envelope
pub fn parse_tool_response(text: &str) -> Option<ToolResponse> {
    match serde_json::from_str::<ToolResponse>(text.trim()) {
        Ok(response) => Some(response),
        Err(e) => {
            trace!("Not a tool status envelope: {}", e);
            None
        }
    }
}

/// Line-by-line collector for multi-line JSON envelopes
#[derive(Debug, Default)]
pub struct EnvelopeParser {
    buffer: Vec<String>,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl EnvelopeParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a partial envelope is currently buffered
    pub fn is_collecting(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Feed one stdout line. Returns an envelope when this line completes one.
    pub fn feed(&mut self, line: &str) -> Option<ToolResponse> {
        if !self.is_collecting() && !line.trim_start().starts_with('{') {
            return None;
        }

        self.buffer.push(line.to_string());
        self.scan(line);

        if self.depth == 0 {
            let text = self.buffer.join("\n");
            self.reset();
            return parse_tool_response(&text);
        }

        if self.buffer.len() > MAX_ENVELOPE_LINES {
            warn!("Discarding oversized JSON output from tool");
            self.reset();
        }
        None
    }

    fn scan(&mut self, line: &str) {
        for c in line.chars() {
            if self.in_string {
                match (self.escaped, c) {
                    (true, _) => self.escaped = false,
                    (false, '\\') => self.escaped = true,
                    (false, '"') => self.in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => self.in_string = true,
                '{' | '[' => self.depth += 1,
                '}' | ']' => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
        }
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.depth = 0;
        self.in_string = false;
        self.escaped = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line_success() {
        let response = parse_tool_response(r#"{"status":0,"result":{"ok":true}}"#).unwrap();
        assert!(!response.is_error());
        assert_eq!(response.error_message(), None);
    }

    #[test]
    fn test_parse_error_message_with_name() {
        let response =
            parse_tool_response(r#"{"status":1,"name":"NoDevice","message":"not found"}"#)
                .unwrap();
        assert!(response.is_error());
        assert_eq!(
            response.error_message().as_deref(),
            Some("NoDevice: not found")
        );
    }

    #[test]
    fn test_parse_rejects_non_envelope() {
        assert!(parse_tool_response("Launching emulator...").is_none());
        assert!(parse_tool_response(r#"{"other":1}"#).is_none());
    }

    #[test]
    fn test_parser_collects_pretty_printed_envelope() {
        let lines = [
            "Starting simulator SFDXSimulator",
            "{",
            r#"  "status": 1,"#,
            r#"  "message": "brace } inside string { is fine","#,
            r#"  "warnings": ["a", "b"]"#,
            "}",
        ];
        let mut parser = EnvelopeParser::new();
        let mut found = None;
        for line in lines {
            if let Some(response) = parser.feed(line) {
                found = Some(response);
            }
        }
        let response = found.expect("envelope should be parsed");
        assert_eq!(response.status, 1);
        assert_eq!(
            response.message.as_deref(),
            Some("brace } inside string { is fine")
        );
        assert_eq!(response.warnings, vec!["a", "b"]);
        assert!(!parser.is_collecting());
    }

    #[test]
    fn test_parser_ignores_plain_lines() {
        let mut parser = EnvelopeParser::new();
        assert!(parser.feed("just text").is_none());
        assert!(!parser.is_collecting());
    }

    #[test]
    fn test_parser_handles_escaped_quotes() {
        let mut parser = EnvelopeParser::new();
        let response = parser
            .feed(r#"{"status":2,"message":"say \"hi\" {"}"#)
            .expect("single line envelope");
        assert_eq!(response.message.as_deref(), Some("say \"hi\" {"));
    }
}
