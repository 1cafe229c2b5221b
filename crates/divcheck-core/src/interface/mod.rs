//! Presentation of query pages

pub mod formatter;

pub use formatter::{Formatter, FormatterFactory, JsonFormatter, OutputFormat, TerminalFormatter};
