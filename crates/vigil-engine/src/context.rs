//! Renders an analysis into bounded text for the chat prompt.

use std::fmt::Write as _;

use vigil_core::entities::{AnalysisRecord, AnalysisResult};

/// Context used when a conversation has no analysis attached.
pub const NO_CONTEXT: &str =
    "No analysis is available yet. Answer generally and suggest analyzing a page first.";

#[derive(Debug, Clone, Copy)]
pub struct ContextBuilder {
    max_scripts: usize,
}

impl ContextBuilder {
    /// `max_scripts` caps how many script blocks are rendered.
    #[must_use]
    pub const fn new(max_scripts: usize) -> Self {
        Self { max_scripts }
    }

    #[must_use]
    pub fn build(&self, analysis: Option<&AnalysisResult>) -> String {
        let Some(analysis) = analysis else {
            return NO_CONTEXT.to_string();
        };

        let mut out = String::new();
        let _ = writeln!(out, "Page: {}", analysis.url);
        let _ = writeln!(
            out,
            "Scripts: {} total, {} third-party, {} analyzed",
            analysis.total_scripts,
            analysis.third_party_script_count,
            analysis.analyses.len()
        );
        let skipped = analysis.truncated_count();
        if skipped > 0 {
            let _ = writeln!(
                out,
                "{skipped} further third-party scripts were not analyzed."
            );
        }

        for (i, record) in analysis.analyses.iter().take(self.max_scripts).enumerate() {
            out.push('\n');
            write_block(&mut out, i + 1, record);
        }

        let hidden = analysis.analyses.len().saturating_sub(self.max_scripts);
        if hidden > 0 {
            let _ = write!(out, "\n({hidden} more analyzed scripts not shown)\n");
        }
        out
    }
}

fn write_block(out: &mut String, n: usize, record: &AnalysisRecord) {
    let data = if record.data_collected.is_empty() {
        "none reported".to_string()
    } else {
        record.data_collected.join(", ")
    };
    let _ = writeln!(out, "{n}. {} ({})", record.script_name, record.script_url);
    let _ = writeln!(out, "   Purpose: {}", record.purpose);
    let _ = writeln!(out, "   Risk: {}", record.risk_level);
    let _ = writeln!(out, "   Data collected: {data}");
    let _ = writeln!(out, "   Recommendation: {}", record.recommendation);
}
