use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Page {
    Stories,
    Add,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Student stories in the terminal")]
pub struct Cli {
    /// Directory holding the local story store.
    #[arg(long, default_value = ".stories")]
    pub store_dir: PathBuf,

    /// Page to open first.
    #[arg(long, value_enum, default_value_t = Page::Stories)]
    pub page: Page,

    /// Where log output goes; the terminal itself is taken by the UI.
    #[arg(long, default_value = "stories.log")]
    pub log_file: PathBuf,

    /// Print every saved story as JSON and exit.
    #[arg(long)]
    pub dump: bool,

    /// Print the rendered stories page markup and exit.
    #[arg(long, conflicts_with = "dump")]
    pub html: bool,
}
