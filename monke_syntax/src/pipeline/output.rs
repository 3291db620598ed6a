use crate::ast::Program;
use crate::lexical::LexicalMetrics;
use crate::pipeline::PipelineResult;
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Serializable view of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub program: Program,
    /// Canonical rendering of the program
    pub rendered: String,
    pub diagnostics: Vec<DiagnosticOutput>,
    pub token_count: usize,
    pub lexical_metrics: LexicalMetrics,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticOutput {
    pub code: String,
    pub message: String,
    pub span: Span,
}

impl PipelineOutput {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&PipelineResult> for PipelineOutput {
    fn from(result: &PipelineResult) -> Self {
        Self {
            program: result.program.clone(),
            rendered: result.program.to_string(),
            diagnostics: result
                .diagnostics
                .iter()
                .map(|d| DiagnosticOutput {
                    code: d.error_code().as_str().to_string(),
                    message: d.to_string(),
                    span: d.span(),
                })
                .collect(),
            token_count: result.token_count,
            lexical_metrics: result.lexical_metrics.clone(),
            duration_ms: result.processing_duration.as_secs_f64() * 1000.0,
        }
    }
}
