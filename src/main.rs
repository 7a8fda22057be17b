//! moodify - apply mood themes to pages from the command line

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use moodify::dom::sample_page;
use moodify::page::STYLE_ELEMENT_ID;
use moodify::popup::{suggest_mood, ApplyOutcome, ResetOutcome};
use moodify::theme::Mood;
use moodify::{css, Config, Extension};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Moodify theme engine
#[derive(Parser, Debug)]
#[command(name = "moodify", version, about = "Apply mood themes to web pages")]
struct Args {
    /// Config file (defaults to ./moodify.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database for saved themes (overrides config)
    #[arg(short, long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available moods and their themes
    Themes,
    /// Print the stylesheet generated for a mood
    Css { mood: Mood },
    /// Apply a mood theme to a sample page at URL and save it
    Apply {
        #[arg(long)]
        url: String,
        /// Mood to apply; defaults to the last selected one
        mood: Option<Mood>,
    },
    /// Reset the theme at URL and forget it
    Reset {
        #[arg(long)]
        url: String,
    },
    /// Show the theme saved for URL
    Show {
        #[arg(long)]
        url: String,
    },
    /// Show or change popup preferences
    Prefs {
        #[arg(long)]
        ai_mode: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(database) = args.database {
        config.db_path = Some(database);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ext = Extension::new(config).await?;

    match args.command {
        Command::Themes => {
            for (mood, theme) in ext.registry().list() {
                println!(
                    "{:<10} {:<10} bg {} text {} accent {} font {}",
                    mood,
                    theme.display_name(),
                    theme.background(),
                    theme.text(),
                    theme.accent(),
                    theme.font()
                );
            }
        }
        Command::Css { mood } => {
            print!("{}", css::generate(ext.registry().lookup(mood), Some(mood)));
        }
        Command::Apply { url, mood } => {
            let document = sample_page(&url).shared();
            ext.tabs().open(&url, document.clone()).await;

            let mut popup = ext.popup().await?;
            match mood {
                Some(mood) => {
                    popup.select_mood(mood).await?;
                }
                None if popup.selected().is_none() => {
                    if popup.ai_mode() {
                        let mood = suggest_mood();
                        println!("AI suggests: {}", ext.registry().lookup(mood).display_name());
                        popup.select_mood(mood).await?;
                    }
                }
                None => {}
            }

            match popup.apply().await? {
                ApplyOutcome::Applied { url, theme } => {
                    let doc = document.lock();
                    println!("Applied {} to {}", theme.display_name(), url);
                    println!(
                        "  style nodes: {}, body classes: {}",
                        doc.elements_by_id(STYLE_ELEMENT_ID).len(),
                        doc.classes(doc.body()).join(" ")
                    );
                }
                ApplyOutcome::NoMoodSelected => {
                    bail!("no mood selected; pass one, e.g. `apply --url {} focus`", url)
                }
                ApplyOutcome::NotThemable { .. } => println!("Page {} cannot be themed", url),
                ApplyOutcome::Rejected { error } => bail!("page rejected theme: {}", error),
            }
        }
        Command::Reset { url } => {
            ext.tabs().open(&url, sample_page(&url).shared()).await;
            match ext.popup().await?.reset().await? {
                ResetOutcome::Reset { url } => println!("Theme reset to original on {}", url),
                ResetOutcome::NotThemable { .. } => println!("Page {} cannot be themed", url),
                ResetOutcome::Rejected { error } => bail!("page rejected reset: {}", error),
            }
        }
        Command::Show { url } => match ext.store().page_theme(&url).await? {
            Some(theme) => println!("{}", serde_json::to_string_pretty(&theme)?),
            None => println!("No theme saved for {}", url),
        },
        Command::Prefs { ai_mode } => {
            let mut popup = ext.popup().await?;
            if let Some(enabled) = ai_mode {
                if let Some(mood) = popup.set_ai_mode(enabled).await? {
                    println!("AI suggests: {}", mood);
                }
            }
            println!("aiMode: {}", popup.ai_mode());
            match popup.selected() {
                Some(mood) => println!("lastMood: {}", mood),
                None => println!("lastMood: (none)"),
            }
        }
    }

    Ok(())
}
