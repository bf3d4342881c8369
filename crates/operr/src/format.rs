// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic rendering of an [`Error`] and of its captured stack.
//!
//! The single-line form is
//!
//! ```text
//! <code> file:line - operation: cause, message
//! ```
//!
//! with every empty part dropped together with its separator. Logs and the
//! wire record depend on this exact shape.

use std::fmt;

use crate::error::Error;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = self.cause.as_ref().map(|c| c.to_string()).unwrap_or_default();
        let code = if self.code.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.code)
        };

        let parts = [
            (code.as_str(), " "),
            (self.location(), " - "),
            (self.operation.as_str(), ": "),
            (cause.as_str(), ", "),
            (self.message.as_str(), ""),
        ];

        let mut pending = "";
        for (text, sep) in parts.into_iter().filter(|(text, _)| !text.is_empty()) {
            f.write_str(pending)?;
            f.write_str(text)?;
            pending = sep;
        }
        Ok(())
    }
}

impl Error {
    /// Multi-line stack trace.
    ///
    /// The first line is `function(): message` for the innermost captured
    /// frame; each following line is a tab-indented `file:line`. Errors with
    /// no capture render just `(): message`.
    pub fn stack_trace(&self) -> String {
        let mut lines = self.stack_trace_lines();
        for line in lines.iter_mut().skip(1) {
            line.insert(0, '\t');
        }
        lines.join("\n")
    }

    /// The entries of [`Error::stack_trace`] as a list, without indentation.
    pub fn stack_trace_lines(&self) -> Vec<String> {
        let frames: Vec<_> = self.runtime_frames().collect();
        let function = frames.first().map(|f| f.function.as_str()).unwrap_or("");

        let mut lines = Vec::with_capacity(frames.len() + 1);
        lines.push(format!("{function}(): {}", self.message));
        lines.extend(frames.iter().map(ToString::to_string));
        lines
    }
}
