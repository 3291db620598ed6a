use crate::ast::Program;
use crate::lexical::LexicalMetrics;
use crate::logging::codes;
use crate::pipeline::output::PipelineOutput;
use crate::syntax::ParseError;
use crate::utils::SourceMap;
use std::time::Duration;

/// Everything produced by one pass over a source text
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub source: String,
    pub program: Program,
    pub diagnostics: Vec<ParseError>,
    pub lexical_metrics: LexicalMetrics,
    pub token_count: usize,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn new(
        source: String,
        program: Program,
        diagnostics: Vec<ParseError>,
        lexical_metrics: LexicalMetrics,
        processing_duration: Duration,
    ) -> Self {
        Self {
            source,
            program,
            token_count: lexical_metrics.total_tokens,
            diagnostics,
            lexical_metrics,
            processing_duration,
        }
    }

    /// True when the tree can be trusted
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostic_messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }

    /// Every diagnostic with the offending line and a caret underline
    pub fn render_diagnostics(&self) -> String {
        let source_map = SourceMap::new(self.source.clone());

        self.diagnostics
            .iter()
            .map(|d| source_map.format_error(&d.span(), &d.to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_output(&self) -> PipelineOutput {
        PipelineOutput::from(self)
    }

    pub(crate) fn log_success(&self) {
        crate::log_success!(
            codes::success::SOURCE_PROCESSING_SUCCESS,
            "Source processing completed",
            "bytes" => self.source.len(),
            "tokens" => self.token_count,
            "statements" => self.program.len(),
            "diagnostics" => self.diagnostics.len(),
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
