//! Line-oriented recording of engine inputs.
//!
//! A recording is a RON file: the first line is the [`Config`] the engine was
//! built from, every following line is one [`Input`]. Replaying it rebuilds
//! the engine and feeds the inputs back in order.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::common::config::Config;
use crate::layout_engine::{EventResponse, LayoutCommand, LayoutEngine, LayoutEvent};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Input {
    Event(LayoutEvent),
    Command(LayoutCommand),
}

impl Input {
    pub fn apply(self, engine: &mut LayoutEngine) -> EventResponse {
        match self {
            Input::Event(event) => engine.handle_event(event),
            Input::Command(command) => engine.handle_command(command),
        }
    }
}

impl From<LayoutEvent> for Input {
    fn from(event: LayoutEvent) -> Self { Input::Event(event) }
}

impl From<LayoutCommand> for Input {
    fn from(command: LayoutCommand) -> Self { Input::Command(command) }
}

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is empty", .0.display())]
    Empty(PathBuf),
    #[error("{}:{line}: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("Recorded config is invalid:\n{}", .0.join("\n"))]
    InvalidConfig(Vec<String>),
    #[error("Failed to encode recording entry: {0}")]
    Encode(#[from] ron::Error),
    #[error("Failed to write recording: {0}")]
    Write(#[from] io::Error),
}

/// Appends engine inputs to a recording file. A `Record` built without a path
/// accepts everything and writes nothing.
#[derive(Debug, Default)]
pub struct Record {
    file: Option<File>,
}

impl Record {
    pub fn new(path: Option<&Path>) -> Result<Self, ReplayError> {
        let file = match path {
            Some(path) => Some(File::create(path).map_err(|source| ReplayError::Io {
                path: path.to_path_buf(),
                source,
            })?),
            None => None,
        };
        Ok(Self { file })
    }

    pub fn is_enabled(&self) -> bool { self.file.is_some() }

    pub fn start(&mut self, config: &Config) -> Result<(), ReplayError> {
        let Some(file) = self.file.as_mut() else { return Ok(()) };
        let line = ron::ser::to_string(config)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    pub fn on_input(&mut self, input: &Input) -> Result<(), ReplayError> {
        let Some(file) = self.file.as_mut() else { return Ok(()) };
        let line = ron::ser::to_string(input)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Reads a newline-separated list of inputs with no config header.
pub fn read_inputs(path: &Path) -> Result<Vec<Input>, ReplayError> {
    let file = open(path)?;
    let mut inputs = Vec::new();
    for (index, line) in file.lines().enumerate() {
        let line = line.map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
        if line.trim().is_empty() {
            continue;
        }
        inputs.push(parse_line(path, index + 1, &line)?);
    }
    Ok(inputs)
}

pub fn replay(path: &Path) -> Result<LayoutEngine, ReplayError> { replay_with(path, |_, _| {}) }

/// Rebuilds the engine from a recording, calling `on_input` after each input
/// has been applied.
pub fn replay_with(
    path: &Path,
    mut on_input: impl FnMut(&Input, &EventResponse),
) -> Result<LayoutEngine, ReplayError> {
    let file = open(path)?;
    let mut lines = file.lines().enumerate();

    let config: Config = loop {
        let Some((index, line)) = lines.next() else {
            return Err(ReplayError::Empty(path.to_path_buf()));
        };
        let line = line.map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
        if !line.trim().is_empty() {
            break parse_line(path, index + 1, &line)?;
        }
    };
    let issues = config.validate();
    if !issues.is_empty() {
        return Err(ReplayError::InvalidConfig(issues));
    }
    let mut engine = LayoutEngine::new(&config);

    let mut count = 0;
    for (index, line) in lines {
        let line = line.map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
        if line.trim().is_empty() {
            continue;
        }
        let input: Input = parse_line(path, index + 1, &line)?;
        debug!(line = index + 1, ?input, "Replaying");
        let response = input.clone().apply(&mut engine);
        on_input(&input, &response);
        count += 1;
    }
    info!(path = %path.display(), inputs = count, "Replay finished");
    Ok(engine)
}

fn open(path: &Path) -> Result<BufReader<File>, ReplayError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })
}

fn parse_line<T: for<'de> Deserialize<'de>>(
    path: &Path,
    line: usize,
    text: &str,
) -> Result<T, ReplayError> {
    ron::de::from_str(text).map_err(|source| ReplayError::Parse {
        path: path.to_path_buf(),
        line,
        source,
    })
}
