//! CLI logic for the Tether layout tool.
//!
//! Reads one graph document, advances it by a single layout step and writes
//! it back out. Standard streams are the defaults, so a harness can call
//! the tool once per frame and feed the output straight back in.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Read, Write},
};

use log::info;

use tether::{LayoutEngine, TetherError, config::AppConfig};

/// Run the Tether CLI application
///
/// Input and output go through the paths in `args`, or through stdin and
/// stdout when they are not given.
///
/// # Errors
///
/// Returns `TetherError` for:
/// - File and stream I/O errors
/// - Configuration loading errors
/// - Malformed or invalid documents
/// - Numeric failures during the step
pub fn run(args: &Args) -> Result<(), TetherError> {
    info!(
        input_path:? = args.input,
        output_path:? = args.output;
        "Processing graph document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = match &args.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };

    let output = step_document(&source, app_config, args.pretty)?;

    match &args.output {
        Some(path) => {
            fs::write(path, output)?;
            info!(output_file = path.as_str(); "Document written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{output}")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Step one document held in memory and return the serialized result.
///
/// # Errors
///
/// Returns any error raised while parsing, stepping or serializing.
pub fn step_document(source: &str, config: AppConfig, pretty: bool) -> Result<String, TetherError> {
    let engine = LayoutEngine::new(config);
    let document = engine.step_source(source)?;
    engine.to_json(&document, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_document_compact_and_pretty() {
        let source = r#"{"nodes": [{"name": "a"}, {"name": "b"}]}"#;
        let compact = step_document(source, AppConfig::default(), false).unwrap();
        assert_eq!(
            compact,
            r#"{"nodes":[{"name":"a","pos":[1.0,1.0]},{"name":"b","pos":[1.0,1.0]}],"edges":[]}"#
        );

        let pretty = step_document(source, AppConfig::default(), true).unwrap();
        assert!(pretty.lines().count() > 1);
    }

    #[test]
    fn test_step_document_reports_source() {
        let source = r#"{"nodes": [], "edges": [{"source": 1, "target": 0}]}"#;
        match step_document(source, AppConfig::default(), false) {
            Err(TetherError::Validation { src, .. }) => assert_eq!(src, source),
            other => panic!("Expected Validation, got {other:?}"),
        }
    }
}
