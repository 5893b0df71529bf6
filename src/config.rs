//! Command-line configuration.

use crate::error::{Result, SplitError};
use std::path::PathBuf;

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Full balance report as JSON
    #[default]
    Json,

    /// Settlements only, as CSV
    Csv,
}

/// Options for one run of the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Group file to read
    pub input: PathBuf,

    pub format: OutputFormat,

    /// Validate the group before computing
    pub strict: bool,

    /// Send payment-due notices through the log notifier
    pub notify: bool,
}

impl RunConfig {
    /// Parses arguments, excluding the program name.
    ///
    /// The first positional argument is the input file; options may appear
    /// anywhere.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut input = None;
        let mut format = OutputFormat::default();
        let mut strict = false;
        let mut notify = false;

        for arg in args {
            let arg: String = arg.into();
            match arg.as_str() {
                "--csv" => format = OutputFormat::Csv,
                "--json" => format = OutputFormat::Json,
                "--strict" => strict = true,
                "--notify" => notify = true,
                flag if flag.starts_with("--") => {
                    return Err(SplitError::UnknownOption(flag.to_string()));
                }
                path if input.is_none() => input = Some(PathBuf::from(path)),
                extra => return Err(SplitError::UnknownOption(extra.to_string())),
            }
        }

        Ok(RunConfig {
            input: input.ok_or(SplitError::MissingArgument)?,
            format,
            strict,
            notify,
        })
    }
}
