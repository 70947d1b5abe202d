use anyhow::Result;
use clap::Parser;
use manga_dl::{
    logging,
    manga::get::{pause, show_banner, GetManga},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Started with no arguments, most likely by double clicking.
    let bare = std::env::args_os().len() <= 1;
    let manga = GetManga::parse();
    logging::init(manga.verbose);

    if bare || manga.title {
        show_banner()?;
    }

    manga.get().await?.download().await?;

    if bare {
        pause()?;
    }
    Ok(())
}
