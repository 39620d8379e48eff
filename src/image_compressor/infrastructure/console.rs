//! Line-driven front end. Each command stands in for one control on the page.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use super::error::InfrastructureError;
use super::file_storage::LocalFileStorage;
use crate::application::orchestrator::Orchestrator;
use crate::application::session::ViewState;
use crate::domain::source_image::PickedFile;

const HELP: &str = "\
Commands:
  open <path>              pick a file
  drop <path> [<path>...]  drop files (only the first is used)
  quality <0-100>          move the quality slider
  download                 save the compressed image
  status                   show the current page
  help                     show this text
  quit                     leave";

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a number")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(PathBuf),
    Drop(Vec<PathBuf>),
    Quality(u32),
    Download,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;
        match name.to_lowercase().as_str() {
            "open" => {
                let rest = line.trim_start()[name.len()..].trim();
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("open"));
                }
                Ok(Command::Open(PathBuf::from(rest)))
            }
            "drop" => {
                let paths: Vec<PathBuf> = words.map(PathBuf::from).collect();
                if paths.is_empty() {
                    return Err(CommandError::MissingArgument("drop"));
                }
                Ok(Command::Drop(paths))
            }
            "quality" => {
                let value = words.next().ok_or(CommandError::MissingArgument("quality"))?;
                let value = value.trim_end_matches('%');
                value
                    .parse()
                    .map(Command::Quality)
                    .map_err(|_| CommandError::InvalidNumber(value.to_string()))
            }
            "download" | "save" => Ok(Command::Download),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn abbreviate(url: &str) -> String {
    const SHOWN: usize = 32;
    if url.len() <= SHOWN {
        return url.to_string();
    }
    let cut = url
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|i| *i <= SHOWN)
        .last()
        .unwrap_or(0);
    format!("{}... ({} chars)", &url[..cut], url.len())
}

pub fn render_view(view: &ViewState) -> String {
    if !view.section_visible {
        return format!("No image selected. Quality: {}", view.quality_label);
    }
    let original_preview = view.original_preview.as_deref().map(abbreviate).unwrap_or_default();
    let compressed_preview = view.compressed_preview.as_deref().unwrap_or("-");
    format!(
        "Original:   {}  [{}]\nQuality:    {}\nCompressed: {}  [{}]\nDownload:   {}",
        view.original_size,
        original_preview,
        view.quality_label,
        view.compressed_size,
        compressed_preview,
        if view.download_visible { "available" } else { "hidden" },
    )
}

pub struct Console<'a, W: Write> {
    orchestrator: &'a Orchestrator,
    storage: &'a LocalFileStorage,
    out: W,
}

impl<'a, W: Write> Console<'a, W> {
    pub fn new(orchestrator: &'a Orchestrator, storage: &'a LocalFileStorage, out: W) -> Self {
        Self {
            orchestrator,
            storage,
            out,
        }
    }

    /// Reads commands until `quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> Result<(), InfrastructureError>
    where
        R: AsyncBufRead + Unpin,
    {
        writeln!(self.out, "{}", HELP)?;
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(e) => writeln!(self.out, "{}", e)?,
            }
        }
        self.orchestrator.settle().await;
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Result<(), InfrastructureError> {
        debug!("Executing {:?}", command);
        match command {
            Command::Open(path) => {
                if let Some(file) = self.pick(&path).await? {
                    self.show_outcome(self.orchestrator.select_file(file)).await?;
                }
            }
            Command::Drop(paths) => {
                let mut files = Vec::new();
                for path in &paths {
                    if let Some(file) = self.pick(path).await? {
                        files.push(file);
                    }
                }
                self.show_outcome(self.orchestrator.drop_files(files)).await?;
            }
            Command::Quality(percent) => match self.orchestrator.slider_input(percent) {
                Ok(()) => writeln!(self.out, "Quality: {}", self.orchestrator.view().quality_label)?,
                Err(e) => writeln!(self.out, "{}", e.user_message())?,
            },
            Command::Download => {
                self.orchestrator.settle().await;
                match self.orchestrator.download(self.storage).await {
                    Ok(Some(path)) => writeln!(self.out, "Saved {}", path.display())?,
                    Ok(None) => writeln!(self.out, "Nothing to download yet")?,
                    Err(e) => writeln!(self.out, "{}", e.user_message())?,
                }
            }
            Command::Status => writeln!(self.out, "{}", render_view(&self.orchestrator.view()))?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    async fn pick(&mut self, path: &Path) -> Result<Option<PickedFile>, InfrastructureError> {
        match self.storage.pick_file(path).await {
            Ok(file) => Ok(Some(file)),
            Err(e) => {
                writeln!(self.out, "Cannot read {}: {}", path.display(), e)?;
                Ok(None)
            }
        }
    }

    async fn show_outcome(
        &mut self,
        outcome: Result<(), crate::application::error::ApplicationError>,
    ) -> Result<(), InfrastructureError> {
        match outcome {
            Ok(()) => {
                self.orchestrator.settle().await;
                writeln!(self.out, "{}", render_view(&self.orchestrator.view()))?;
            }
            Err(e) => writeln!(self.out, "{}", e.user_message())?,
        }
        Ok(())
    }
}
