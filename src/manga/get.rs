use super::{default_path, search_titles, Manga};
use crate::{eta::EtaOptions, site::Site};
use anyhow::{bail, Context, Result};
use clap::{builder::FalseyValueParser, Parser};
use console::Term;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use indicatif::ProgressBar;
use std::{path::PathBuf, time::Duration};

const BANNER: &str = r"   __  ___                        ___  __
  /  |/  /__ ____  ___ ____ _____/ _ \/ /
 / /|_/ / _ `/ _ \/ _ `/ _ `/___/ // / /__
/_/  /_/\_,_/_//_/\_, /\_,_/   /____/____/
                /___/
";

#[derive(Parser, Debug)]
#[command(author, version, about = "Mass downloads manga from manganelo.com", long_about = None)]
pub struct GetManga {
    /// Path to download the manga into, defaults to its title in the current directory
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Name of the manga to search for, asked for when missing
    #[arg(short, long)]
    pub name: Option<String>,

    /// Shows the banner (hidden by default when ran with arguments)
    #[arg(short, long)]
    pub title: bool,

    /// Link to the manga's title page, skips searching
    #[arg(short, long)]
    pub link: Option<String>,

    /// Never draw the progress line
    #[arg(long, env = "HIDE_ETA", value_parser = FalseyValueParser::new())]
    pub hide_eta: bool,

    /// Draw the progress line even when stderr is not a terminal
    #[arg(long, env = "SHOW_ETA", value_parser = FalseyValueParser::new())]
    pub show_eta: bool,

    /// Log what is being fetched and saved to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl GetManga {
    /// Resolved once here and handed to everything that reports progress.
    pub fn eta_options(&self) -> EtaOptions {
        EtaOptions::resolve(self.hide_eta, self.show_eta, Term::stderr().is_term())
    }

    /// Works out which manga to download, either straight from `--link` or
    /// by searching and letting the user pick a result.
    pub async fn get(&self) -> Result<Manga> {
        let site = Site::new()?;
        let eta = self.eta_options();

        let (link, path) = match &self.link {
            Some(link) => (link.clone(), self.path.clone()),
            None => {
                let query = match &self.name {
                    Some(name) => name.clone(),
                    None => Input::<String>::with_theme(&ColorfulTheme::default())
                        .with_prompt("Manga name")
                        .interact_text()
                        .context("Unable to read the manga name")?,
                };

                let spinner = spinner(&eta, format!("Searching for {}...", query));
                let results = search_titles(&site, &query).await;
                spinner.finish_and_clear();
                let results = results.with_context(|| format!("Searching for {}", query))?;
                if results.is_empty() {
                    bail!("Found no manga with a title of {}", query);
                }

                let labels: Vec<String> = results.iter().map(|result| result.label()).collect();
                let choice = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt("Choose a manga")
                    .items(&labels)
                    .default(0)
                    .interact()
                    .context("No manga was chosen")?;
                let chosen = &results[choice];
                tracing::debug!("picked {} by {}", chosen.title, chosen.author);

                let path = match &self.path {
                    Some(path) => path.clone(),
                    None => default_path(&chosen.title)?,
                };
                (chosen.link.clone(), Some(path))
            }
        };

        let spinner = spinner(&eta, "Fetching chapter list...".to_string());
        let manga = Manga::open(site, &link, path, eta).await;
        spinner.finish_and_clear();
        manga
    }
}

fn spinner(eta: &EtaOptions, message: String) -> ProgressBar {
    let spinner = if eta.hidden {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Clears the screen and prints the banner.
pub fn show_banner() -> Result<()> {
    let term = Term::stdout();
    term.clear_screen()?;
    term.write_line(BANNER)?;
    Ok(())
}

/// Keeps a double-clicked console window open until Enter is pressed.
pub fn pause() -> Result<()> {
    Term::stdout().read_line()?;
    Ok(())
}
