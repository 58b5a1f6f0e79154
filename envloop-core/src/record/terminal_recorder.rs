use super::{Record, Recorder};
use log::info;

/// Prints records through the [`log`] facade at info level.
///
/// A record is formatted as `[Label] key1 = v1 | key2 = v2` with keys sorted.
pub struct TerminalRecorder {
    label: String,
}

impl TerminalRecorder {
    /// Constructs the recorder.
    ///
    /// `label` is title-cased, e.g., `environment_loop` becomes `Environment Loop`.
    pub fn new(label: &str) -> Self {
        Self {
            label: title_case(label),
        }
    }

    /// Returns the label prepended to each line.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Formats a record into a single line.
    pub fn format(&self, record: &Record) -> String {
        let fields = record
            .sorted_keys()
            .into_iter()
            .filter_map(|k| record.get(k).map(|v| format!("{} = {}", title_case(k), v)))
            .collect::<Vec<_>>()
            .join(" | ");
        if self.label.is_empty() {
            fields
        } else {
            format!("[{}] {}", self.label, fields)
        }
    }
}

impl Recorder for TerminalRecorder {
    fn write(&mut self, record: Record) {
        info!("{}", self.format(&record));
    }
}

fn title_case(s: &str) -> String {
    s.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
