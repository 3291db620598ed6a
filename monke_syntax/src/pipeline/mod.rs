//! End-to-end processing: source text or file to program plus diagnostics

mod error;
pub mod output;
mod result;

pub use error::PipelineError;
pub use output::{DiagnosticOutput, PipelineOutput};
pub use result::PipelineResult;

use crate::config::compile_time::source::MAX_SOURCE_SIZE;
use crate::config::runtime::RuntimeConfig;
use crate::lexical::Lexer;
use crate::logging;
use crate::syntax::Parser;
use crate::{log_error, log_info};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

/// Lex and parse a source string with default preferences
pub fn process_source(source: &str) -> PipelineResult {
    process_source_with_config(source, &RuntimeConfig::default())
}

/// Lex and parse with the config's lexical and parser preferences; its
/// logging table is applied by `logging::init_global_logging_with_config`
pub fn process_source_with_config(source: &str, config: &RuntimeConfig) -> PipelineResult {
    let start_time = Instant::now();

    let lexer = Lexer::with_preferences(source, config.lexical.clone());
    let mut parser = Parser::with_preferences(lexer, config.parser.clone());
    let program = parser.parse_program();
    let lexical_metrics = parser.lexical_metrics().clone();
    let diagnostics = parser.into_errors();

    let result = PipelineResult::new(
        source.to_string(),
        program,
        diagnostics,
        lexical_metrics,
        start_time.elapsed(),
    );
    result.log_success();
    result
}

/// Read a UTF-8 source file and process it; log events carry the file path
pub fn process_file(path: impl AsRef<Path>) -> Result<PipelineResult, PipelineError> {
    process_file_with_config(path, &RuntimeConfig::default())
}

pub fn process_file_with_config(
    path: impl AsRef<Path>,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let path = path.as_ref();

    logging::with_source_context(path.to_path_buf(), || {
        log_info!("Processing source file", "file" => path.display());

        let source = read_source(path)?;
        Ok(process_source_with_config(&source, config))
    })
}

fn read_source(path: &Path) -> Result<String, PipelineError> {
    let display = path.display().to_string();

    let metadata = fs::metadata(path).map_err(|e| {
        let error = match e.kind() {
            ErrorKind::NotFound => PipelineError::SourceNotFound {
                path: display.clone(),
            },
            _ => PipelineError::Io(e),
        };
        log_error!(error.error_code(), "Cannot access source file", "path" => &display);
        error
    })?;

    if metadata.len() > MAX_SOURCE_SIZE {
        let error = PipelineError::SourceTooLarge {
            size: metadata.len(),
            max_size: MAX_SOURCE_SIZE,
        };
        log_error!(error.error_code(), "Source file exceeds size limit",
            "path" => &display,
            "size" => metadata.len(),
            "max_size" => MAX_SOURCE_SIZE
        );
        return Err(error);
    }

    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|_| {
        let error = PipelineError::InvalidEncoding {
            path: display.clone(),
        };
        log_error!(error.error_code(), "Source file is not valid UTF-8", "path" => &display);
        error
    })
}
