use crate::ast::SourceSpan;
use crate::string::classify;
use serde::{Deserialize, Serialize};

pub const FALLBACK_DETAILS_MESSAGE: &str =
    "See https://github.com/tildeio/ember-this-fallback#embroider-compatibility for more details.";

// ═══════════════════════════════════════════════════════════════════════════════
// MESSAGE COMPOSITION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn ambiguous_attr_fallback_warning(head_name: &str) -> Vec<String> {
    let original = format!("{{{{{}}}}}", head_name);

    vec![
        format!(
            "Found ambiguous mustache statement as attribute node value `{}`.",
            original
        ),
        "Falling back to runtime dynamic resolution. You can avoid this fallback by:".to_string(),
        format!("- {}", explicit_helper_suggestion(head_name)),
        format!("- {}", this_property_suggestion(head_name)),
        FALLBACK_DETAILS_MESSAGE.to_string(),
    ]
}

pub fn ambiguous_statement_fallback_warning(head_name: &str) -> Vec<String> {
    vec![
        format!("Found ambiguous mustache statement: `{{{{{}}}}}`.", head_name),
        "Falling back to runtime dynamic resolution. You can avoid this fallback by:".to_string(),
        format!("- {}", explicit_helper_suggestion(head_name)),
        format!("- {}", explicit_component_suggestion(head_name)),
        format!("- {}", this_property_suggestion(head_name)),
        FALLBACK_DETAILS_MESSAGE.to_string(),
    ]
}

fn explicit_component_suggestion(name: &str) -> String {
    format!(
        "explicitly invoking a known component with angle-brackets: `<{} />`",
        classify(name)
    )
}

fn explicit_helper_suggestion(name: &str) -> String {
    format!(
        "explicitly invoking a known helper with parens: `{{{{({})}}}}`",
        name
    )
}

fn this_property_suggestion(name: &str) -> String {
    format!(
        "prefacing a known property on `this` with `this`: `{{{{this.{}}}}}`",
        name
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTIC RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    AmbiguousAttribute,
    AmbiguousStatement,
}

/// One fallback occurrence, reported alongside the rewritten template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub head: String,
    pub lines: Vec<String>,
    #[serde(default)]
    pub loc: SourceSpan,
}

impl Diagnostic {
    pub fn ambiguous_attribute(head: &str, loc: SourceSpan) -> Self {
        Self {
            kind: DiagnosticKind::AmbiguousAttribute,
            head: head.to_string(),
            lines: ambiguous_attr_fallback_warning(head),
            loc,
        }
    }

    pub fn ambiguous_statement(head: &str, loc: SourceSpan) -> Self {
        Self {
            kind: DiagnosticKind::AmbiguousStatement,
            head: head.to_string(),
            lines: ambiguous_statement_fallback_warning(head),
            loc,
        }
    }

    pub fn message(&self) -> String {
        join_log_lines(&self.lines)
    }

    /// Log form: `label:line:column` (1-based column) followed by the message
    /// lines, each on its own tab-indented line.
    pub fn render(&self, label: &str) -> String {
        let mut header = label.to_string();
        if !self.loc.is_synthetic() {
            header.push_str(&format!(
                ":{}:{}",
                self.loc.start.line,
                self.loc.start.column + 1
            ));
        }
        join_log_lines(&[header, self.message()])
    }
}

fn join_log_lines(lines: &[String]) -> String {
    lines.join("\n\t")
}
