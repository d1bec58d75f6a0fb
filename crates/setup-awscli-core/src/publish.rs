//! Environment publishing for later workflow steps.
//!
//! GitHub Actions reads appended lines from the files named by `GITHUB_PATH`
//! and `GITHUB_OUTPUT` once the step exits. Without those files the values go
//! out as `::add-path::` and `::set-output` workflow commands instead.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Environment variable naming the PATH command file.
pub const PATH_FILE_VAR: &str = "GITHUB_PATH";
/// Environment variable naming the output command file.
pub const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// Sink for the results of a run.
pub trait Publisher {
    /// Prepend `dir` to the search path of subsequent steps.
    fn add_path(&mut self, dir: &Path) -> io::Result<()>;

    /// Set a named step output.
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()>;
}

/// Publishes through the Actions runner's command files, or through workflow
/// commands written to `console` when a file is not configured.
#[derive(Debug)]
pub struct ActionsPublisher<W = io::Stdout> {
    path_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    console: W,
}

impl ActionsPublisher {
    /// Use the given command files. `None` falls back to commands on stdout.
    pub fn new(path_file: Option<PathBuf>, output_file: Option<PathBuf>) -> Self {
        Self::with_console(path_file, output_file, io::stdout())
    }
}

impl Default for ActionsPublisher {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl<W: Write> ActionsPublisher<W> {
    /// Like [`ActionsPublisher::new`], with fallback commands written to `console`.
    pub fn with_console(
        path_file: Option<PathBuf>,
        output_file: Option<PathBuf>,
        console: W,
    ) -> Self {
        Self {
            path_file,
            output_file,
            console,
        }
    }

    /// The fallback sink.
    pub fn console(&self) -> &W {
        &self.console
    }
}

fn append_line(file: &Path, line: &str) -> io::Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(file)?;
    writeln!(f, "{line}")
}

/// Escape a workflow command message.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value.
pub fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

impl<W: Write> Publisher for ActionsPublisher<W> {
    fn add_path(&mut self, dir: &Path) -> io::Result<()> {
        let dir = dir.to_string_lossy();
        if let Some(file) = &self.path_file {
            append_line(file, &dir)
        } else {
            tracing::debug!("{PATH_FILE_VAR} not set; emitting add-path command");
            writeln!(self.console, "::add-path::{}", escape_data(&dir))
        }
    }

    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        if value.contains('\n') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output {name} must be a single line"),
            ));
        }

        if let Some(file) = &self.output_file {
            append_line(file, &format!("{name}={value}"))
        } else {
            tracing::debug!("{OUTPUT_FILE_VAR} not set; emitting set-output command");
            writeln!(
                self.console,
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            )
        }
    }
}
