//! Record transformation: CSV cells to Octane payloads
//!
//! The step script and parameter table bodies are assembled by hand rather
//! than through serde_json. The target expects exactly the escaping the legacy
//! tool produced: only `"` and `'` get a backslash, nothing else is escaped.

use crate::core::error::MigrationError;
use crate::core::source::SourceRow;
use crate::octane::entities::ManualTest;

/// Two-character line break marker used inside the script string
pub const LINE_MARKER: &str = "\\n";

/// Prefix of generated parameter table names
pub const PARAMETERS_TABLE_PREFIX: &str = "paramTable";

/// Everything a single row contributes to the migration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRow {
    pub record: u64,
    pub test: ManualTest,
    pub steps_json: String,
    pub parameter_columns: [String; 4],
}

impl TransformedRow {
    pub fn from_row(row: &SourceRow) -> Result<Self, MigrationError> {
        let test = ManualTest::new(row.name()?)
            .with_description(row.description()?)
            .with_expected_result(row.expected_result()?);
        let steps_json = build_steps_json(row.step_text()?);
        let parameter_columns = row.parameter_columns()?.map(str::to_string);

        Ok(Self {
            record: row.number(),
            test,
            steps_json,
            parameter_columns,
        })
    }

    /// Parameter table for the created test, as `(name, json)`
    pub fn parameters_for(&self, test_id: &str) -> (String, String) {
        let name = parameters_table_name(test_id);
        let columns = self.parameter_columns.each_ref().map(String::as_str);
        let json = build_parameters_json(&columns, &name);
        (name, json)
    }
}

/// Name of the parameter table created for a test: `paramTable<test id>`
///
/// The name is only written into the table body; the server assigns the
/// table id used when attaching it.
pub fn parameters_table_name(test_id: &str) -> String {
    format!("{}{}", PARAMETERS_TABLE_PREFIX, test_id)
}

/// Split with the legacy semantics: text without a separator is returned
/// whole (even when empty), otherwise trailing empty pieces are dropped.
fn split_trimming_trailing(text: &str, separator: char) -> Vec<&str> {
    if !text.contains(separator) {
        return vec![text];
    }
    let mut parts: Vec<&str> = text.split(separator).collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Build the script upload body from a cell of newline-separated steps
pub fn build_steps_json(step_text: &str) -> String {
    let mut script = String::with_capacity(step_text.len() * 2);
    for step in split_trimming_trailing(step_text, '\n') {
        script.push_str("- ");
        script.push_str(&escape_step(step));
        script.push_str(LINE_MARKER);
    }
    format!(
        "{{\"script\":\"{}\",\"comment\":\"\",\"revision_type\":\"Minor\"}}",
        script
    )
}

/// Backslash quotes and collapse each run of CR/LF into one line marker
pub fn escape_step(step: &str) -> String {
    let mut escaped = String::with_capacity(step.len());
    let mut in_break = false;
    for ch in step.chars() {
        if ch == '\r' || ch == '\n' {
            if !in_break {
                escaped.push_str(LINE_MARKER);
                in_break = true;
            }
            continue;
        }
        in_break = false;
        if ch == '"' || ch == '\'' {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Parse one `key:value` line; anything not splitting into two parts is None
pub fn parse_pair(line: &str) -> Option<(&str, &str)> {
    match split_trimming_trailing(line.trim(), ':').as_slice() {
        [key, value] => Some((*key, *value)),
        _ => None,
    }
}

/// Parameter table built from the four parameter columns of a row
///
/// Each column is one iteration. Headers come from the first column that has
/// any valid pair; keys that only appear in later columns stay in their
/// iteration but are not listed as parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTable {
    pub name: String,
    pub headers: Vec<String>,
    pub iterations: Vec<Vec<(String, String)>>,
}

impl ParameterTable {
    pub fn from_columns(name: impl Into<String>, columns: &[&str]) -> Self {
        let mut headers: Vec<String> = Vec::new();
        let mut iterations = Vec::with_capacity(columns.len());

        for column in columns {
            let header_source = headers.is_empty();
            let pairs: Vec<(String, String)> = split_trimming_trailing(column, '\n')
                .into_iter()
                .filter_map(parse_pair)
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();

            if header_source {
                for (key, _) in &pairs {
                    if !headers.contains(key) {
                        headers.push(key.clone());
                    }
                }
            }
            iterations.push(pairs);
        }

        Self {
            name: name.into(),
            headers,
            iterations,
        }
    }

    /// Body for `POST .../test_data_tables`
    pub fn to_json(&self) -> String {
        let iterations: Vec<String> = self
            .iterations
            .iter()
            .map(|pairs| {
                let fields: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("\"{}\":\"{}\"", k, v))
                    .collect();
                format!("{{{}}}", fields.join(","))
            })
            .collect();
        let parameters: Vec<String> = self.headers.iter().map(|h| format!("\"{}\"", h)).collect();

        format!(
            "{{\"data\":[{{\"name\":\"{}\",\"data\":{{\"iterations\":[{}],\"parameters\":[{}]}}}}]}}",
            self.name,
            iterations.join(","),
            parameters.join(",")
        )
    }
}

pub fn build_parameters_json(columns: &[&str], table_name: &str) -> String {
    ParameterTable::from_columns(table_name, columns).to_json()
}
