use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use likesync::{cli, config, error, sync::SyncOptions};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightBlue.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print the login URL instead of opening a browser
    #[clap(long, global = true)]
    no_browser: bool,

    /// Defaults to `sync` when omitted
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Mirror liked songs into the target playlist
    Sync(SyncArgs),

    /// List your playlists
    Playlists,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct SyncArgs {
    /// Name of the playlist to keep in sync (overrides LIKESYNC_PLAYLIST)
    #[clap(long)]
    pub playlist: Option<String>,

    /// Tracks per add/remove request, 1-100 (overrides LIKESYNC_BATCH_SIZE)
    #[clap(long, value_parser = config::parse_batch_size)]
    pub batch_size: Option<usize>,

    /// Show what would change without touching the playlist
    #[clap(long)]
    pub dry_run: bool,

    /// Exit with an error when any batch failed
    #[clap(long)]
    pub strict: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

async fn load_settings() -> Arc<config::Settings> {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    match config::Settings::from_env() {
        Ok(settings) => Arc::new(settings),
        Err(e) => error!(
            "Invalid configuration: {}\nSet it in the environment or in {}",
            e,
            config::env_file_path().display()
        ),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let open_browser = !cli.no_browser;

    match cli.command.unwrap_or(Command::Sync(SyncArgs::default())) {
        Command::Sync(args) => {
            let settings = load_settings().await;
            let options = SyncOptions {
                playlist_name: args
                    .playlist
                    .unwrap_or_else(|| settings.playlist_name.clone()),
                batch_size: args.batch_size.unwrap_or(settings.batch_size),
                dry_run: args.dry_run,
            };
            cli::sync(settings, options, args.strict, open_browser).await
        }
        Command::Playlists => cli::playlists(load_settings().await, open_browser).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
