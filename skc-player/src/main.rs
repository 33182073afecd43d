//! skc-player - command-line front end for the player control client
//!
//! Drives a networked audio player: play media, resume audiobooks from their
//! saved position, send transport commands and announcements.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use skc_common::config::{DataFolderResolver, TomlConfig};
use skc_common::time::millis_to_duration;
use skc_player::{Media, MediaCategory, MediaType, PlayerCmd, PlayerService, PlayerSession};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "skc-player")]
#[command(about = "Player control client for SKC")]
#[command(version)]
struct Cli {
    /// Bootstrap TOML configuration file
    #[arg(short, long, env = "SKC_CONFIG")]
    config: Option<PathBuf>,

    /// Folder holding the saved play state
    #[arg(short, long)]
    data_folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play media now
    Play(MediaArgs),

    /// Resume media from its saved position
    Resume(MediaArgs),

    /// Save the current position for media
    Save(MediaArgs),

    /// Send a transport command
    Cmd {
        #[arg(value_enum)]
        cmd: TransportCmd,
    },

    /// Speak a text on the player
    Say {
        text: String,

        /// Speak even if announcements are disabled
        #[arg(long)]
        force: bool,
    },

    /// Show the saved position for media if it can be resumed
    Bookmark(MediaArgs),

    /// Remove saved positions past the retention period
    Prune,

    /// Show the player configuration
    Config,

    /// Show the current player state
    State,

    /// Play media until Ctrl-C, then save the position and pause
    Session {
        #[command(flatten)]
        media: MediaArgs,

        /// Resume from the saved position
        #[arg(long)]
        bookmark: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TransportCmd {
    Play,
    Pause,
    PlayPause,
    Previous,
    Next,
    VolumeUp,
    VolumeDown,
    ClearQueue,
}

impl From<TransportCmd> for PlayerCmd {
    fn from(cmd: TransportCmd) -> Self {
        match cmd {
            TransportCmd::Play => PlayerCmd::Play,
            TransportCmd::Pause => PlayerCmd::Pause,
            TransportCmd::PlayPause => PlayerCmd::PlayPause,
            TransportCmd::Previous => PlayerCmd::Previous,
            TransportCmd::Next => PlayerCmd::Next,
            TransportCmd::VolumeUp => PlayerCmd::VolumeUp,
            TransportCmd::VolumeDown => PlayerCmd::VolumeDown,
            TransportCmd::ClearQueue => PlayerCmd::ClearQueue,
        }
    }
}

/// Media descriptor, either as JSON or as individual fields
#[derive(Args, Debug)]
struct MediaArgs {
    /// Media as JSON (`{"type":"spotify","category":"audiobook",...}`)
    #[arg(long, conflicts_with_all = ["media_type", "category", "id", "artist", "title"])]
    media_json: Option<String>,

    /// Source (library, spotify, applemusic, amazonmusic, tunein)
    #[arg(long = "type")]
    media_type: Option<MediaType>,

    /// Category (album, playlist, audiobook, station, ...)
    #[arg(long, default_value = "album")]
    category: String,

    #[arg(long)]
    id: Option<String>,

    #[arg(long, default_value = "")]
    artist: String,

    #[arg(long)]
    title: Option<String>,
}

impl MediaArgs {
    fn to_media(&self) -> Result<Media> {
        if let Some(json) = &self.media_json {
            return serde_json::from_str(json).context("Invalid --media-json");
        }

        let Some(media_type) = self.media_type else {
            bail!("--type is required without --media-json");
        };
        let Some(title) = &self.title else {
            bail!("--title is required without --media-json");
        };

        let media = Media::new(
            media_type,
            MediaCategory::from(self.category.clone()),
            &self.artist,
            title,
        );
        Ok(match &self.id {
            Some(id) => media.with_id(id),
            None => media,
        })
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let bootstrap = TomlConfig::load_or_default(cli.config.as_deref());
    init_tracing(&bootstrap.logging.level);

    info!(
        "Starting skc-player v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let data_folder =
        DataFolderResolver::new(cli.data_folder.as_deref(), bootstrap.data_folder.as_deref()).resolve();
    info!("Data folder: {}", data_folder.display());

    let service = Arc::new(
        PlayerService::from_bootstrap(&bootstrap, &data_folder)
            .context("Failed to initialize player service")?,
    );

    match cli.command {
        Command::Play(args) => {
            let media = args.to_media()?;
            service.play(&media).await.context("Play failed")?;
        }
        Command::Resume(args) => {
            let media = args.to_media()?;
            let state = service.load_play_state(&media).await?;
            println!(
                "Resumed '{}' at track {} / {} s",
                state.media.title, state.track_no, state.elapsed_time
            );
        }
        Command::Save(args) => {
            let media = args.to_media()?;
            let state = service.save_play_state(&media).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Command::Cmd { cmd } => {
            service.send_cmd(cmd.into()).await?;
        }
        Command::Say { text, force } => {
            if force {
                service.say(&text).await?;
            } else if !service.say_if_enabled(&text).await? {
                println!("Announcements are disabled");
            }
        }
        Command::Bookmark(args) => {
            let media = args.to_media()?;
            match service.get_saved_bookmark_if_offerable(&media) {
                Some(state) => println!("{}", serde_json::to_string_pretty(&state)?),
                None => println!("No bookmark"),
            }
        }
        Command::Prune => {
            let removed = service.bookmarks().prune(skc_common::time::now_millis())?;
            println!("Removed {} saved position(s)", removed);
        }
        Command::Config => {
            let config = service.get_config().await?;
            println!("{}", serde_json::to_string_pretty(config.as_ref())?);
        }
        Command::State => {
            let state = service.get_state().await?;
            println!("{:#?}", state);
        }
        Command::Session { media, bookmark } => {
            let media = media.to_media()?;
            let mut session = PlayerSession::new(Arc::clone(&service), media)
                .from_bookmark(bookmark)
                .with_settle_delay(millis_to_duration(bootstrap.settle_delay_ms));

            session.enter().await?;
            println!("Playing '{}', press Ctrl-C to stop", session.media().title);

            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;

            let state = session.leave().await?;
            println!(
                "Saved '{}' at track {} / {} s",
                state.media.title, state.track_no, state.elapsed_time
            );
        }
    }

    Ok(())
}
