use std::{fs, ops::Range, path::Path};

use kbc_common::{ConfigError as KbcError, KbcConfig};

pub mod description;
pub mod keycodes;
pub mod summary;

#[derive(Debug)]
pub struct DescriptionError {
    pub message: String,
    /// Byte range of the offending text.
    pub span: Option<Range<usize>>,
}

impl std::fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{}\n    at: ({:?})", &self.message, span),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for DescriptionError {}

impl From<std::io::Error> for DescriptionError {
    fn from(err: std::io::Error) -> Self {
        Self {
            message: err.to_string(),
            span: None,
        }
    }
}

impl From<&str> for DescriptionError {
    fn from(err: &str) -> Self {
        Self {
            message: err.to_string(),
            span: None,
        }
    }
}

impl From<KbcError> for DescriptionError {
    fn from(err: KbcError) -> Self {
        Self {
            message: err.to_string(),
            span: None,
        }
    }
}

impl DescriptionError {
    pub fn new(message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            message: message.into(),
            span: Some(span),
        }
    }

    pub fn config(err: KbcError, span: Range<usize>) -> Self {
        Self::new(err.to_string(), span)
    }

    /// The span in characters, which is what the report renderer counts in.
    fn char_span(&self, source: &str) -> Option<Range<usize>> {
        let span = self.span.clone()?;
        let start = source.get(..span.start)?.chars().count();
        let len = source.get(span)?.chars().count();
        Some(start..start + len)
    }

    /// One-based line and column of the start of the span.
    pub fn line_col(&self, source: &str) -> Option<(usize, usize)> {
        let start = self.span.as_ref()?.start;
        let before = source.get(..start)?;
        let line = before.matches('\n').count() + 1;
        let col = before
            .rfind('\n')
            .map_or(before, |i| &before[i + 1..])
            .chars()
            .count()
            + 1;
        Some((line, col))
    }
}

/// Parse `src`, printing a source annotated report to stderr when it fails.
pub fn pretty_parse(file: &Path, src: &str) -> Result<KbcConfig, DescriptionError> {
    match description::parse(src) {
        Ok(config) => Ok(config),
        Err(err) => {
            use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
            let filename = file.to_str().unwrap_or("<unknown>");
            let mut colors = ColorGenerator::new();

            let a = colors.next();
            if let Some(span) = err.char_span(src) {
                let report = Report::build(ReportKind::Error, (filename, span.clone()))
                    .with_message("Invalid keyboard description".to_string())
                    .with_label(
                        Label::new((filename, span))
                            .with_message(&err.message)
                            .with_color(a),
                    )
                    .finish();
                if let Err(io) = report.eprint((filename, Source::from(src))) {
                    log::warn!("unable to print report: {io}");
                }
            }
            Err(err)
        }
    }
}

/// Read and parse a description file.
pub fn load(file: &Path) -> Result<KbcConfig, DescriptionError> {
    let src = fs::read_to_string(file)?;
    log::debug!("loaded {} ({} bytes)", file.display(), src.len());
    pretty_parse(file, &src)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
