use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use student_stories::{
    cli::{Cli, Page},
    featured::featured_stories,
    refresh,
    ui::{Action, UI},
    FileStorage, StoryContainer, StoryStore,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let storage = FileStorage::open(&cli.store_dir)
        .wrap_err_with(|| format!("failed to open story store at {}", cli.store_dir.display()))?;
    let mut store = StoryStore::new(storage);

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&store.debug_stories())?);
        return Ok(());
    }
    if cli.html {
        let mut container = StoryContainer::with_static(&featured_stories());
        refresh(&mut container, &store);
        println!("{}", container.markup());
        return Ok(());
    }

    let mut ui = UI::new()?;
    let mut page = cli.page;

    loop {
        let action = match page {
            Page::Stories => ui.stories_page(&store)?,
            Page::Add => ui.add_story_page(&mut store)?,
        };
        match action {
            Action::Stories => page = Page::Stories,
            Action::AddStory => page = Page::Add,
            Action::Quit => break,
        }
    }

    Ok(())
}

fn init_tracing(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .wrap_err_with(|| format!("failed to open log file {}", log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
