use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one report entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Passed
    Ok,
    /// Not a failure; recorded for the reader
    Info(String),
    /// Passed, but something looks off
    Warning(String),
    /// Failed
    Failed(String),
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "✓",
            CheckStatus::Info(_) => "i",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
        }
    }

    fn label(&self) -> Option<(&'static str, &str)> {
        match self {
            CheckStatus::Ok => None,
            CheckStatus::Info(msg) => Some(("NOTE", msg)),
            CheckStatus::Warning(msg) => Some(("WARNING", msg)),
            CheckStatus::Failed(msg) => Some(("FAILED", msg)),
        }
    }
}

/// One entry of a [`ValidationReport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationCheck {
    /// What was checked
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok)
    }

    pub(crate) fn info(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Info(message.into()))
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Warning(message.into()))
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Failed(message.into()))
    }

    fn with_status(name: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }
}

/// Whole-file validation report
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Entries in the order they were checked
    pub checks: Vec<ValidationCheck>,
    /// Path or label of the validated file
    pub file_path: String,
}

impl ValidationReport {
    /// Empty report for `file_path`
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Append an entry
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|c| pred(&c.status)).count()
    }

    /// True if any entry failed
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// True if any entry is a warning
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Entries that passed
    pub fn success_count(&self) -> usize {
        self.count(|s| *s == CheckStatus::Ok)
    }

    /// Entries that are warnings
    pub fn warning_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Warning(_)))
    }

    /// Entries that failed
    pub fn failure_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Failed(_)))
    }

    fn verdict(&self) -> &'static str {
        if self.has_failures() {
            "Validation FAILED"
        } else if self.has_warnings() {
            "Validation PASSED with warnings"
        } else {
            "Validation PASSED"
        }
    }

    fn summary(&self) -> String {
        format!(
            "{} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )
    }

    /// Render with terminal colours when the `colorized_output` feature is on
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::{Emoji, StyledObject};

            let mut out = format!(
                "{}\n{}: {}\n\n",
                style("SOFA Validation Report").bold().cyan(),
                style("File").bold(),
                self.file_path
            );
            for check in &self.checks {
                let paint = |s: String| -> StyledObject<String> {
                    match check.status {
                        CheckStatus::Ok => style(s).green(),
                        CheckStatus::Info(_) => style(s).dim(),
                        CheckStatus::Warning(_) => style(s).yellow(),
                        CheckStatus::Failed(_) => style(s).red(),
                    }
                };
                let symbol = match check.status {
                    CheckStatus::Ok => Emoji("✓", "[OK]"),
                    CheckStatus::Info(_) => Emoji("ℹ", "[i]"),
                    CheckStatus::Warning(_) => Emoji("⚠", "[WARN]"),
                    CheckStatus::Failed(_) => Emoji("✗", "[FAIL]"),
                };
                out.push_str(&format!("{} {}", symbol, paint(check.name.clone())));
                if let Some((label, msg)) = check.status.label() {
                    out.push_str(&format!(" - {}: {}", paint(label.to_string()).bold(), msg));
                }
                out.push('\n');
            }
            let verdict = if self.has_failures() {
                style(self.verdict()).red()
            } else if self.has_warnings() {
                style(self.verdict()).yellow()
            } else {
                style(self.verdict()).green()
            };
            out.push_str(&format!(
                "\n{}: {}\n{}\n",
                style("Summary").bold(),
                self.summary(),
                verdict.bold()
            ));
            out
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SOFA Validation Report")?;
        writeln!(f, "File: {}", self.file_path)?;
        writeln!(f)?;
        for check in &self.checks {
            write!(f, "[{}] {}", check.status.symbol(), check.name)?;
            match check.status.label() {
                Some((label, msg)) => writeln!(f, " - {}: {}", label, msg)?,
                None => writeln!(f)?,
            }
        }
        writeln!(f)?;
        writeln!(f, "Summary: {}", self.summary())?;
        writeln!(f, "{}", self.verdict())
    }
}
