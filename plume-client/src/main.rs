use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plume_client::app::{AppContext, default_appearance_source};
use plume_client::appearance::{ManualAppearanceSource, OsAppearanceSource};
use plume_client::infrastructure::logging::init_tracing;
use plume_config::{ConfigLoader, ConfigSource};
use plume_model::api::PreferencesSnapshot;
use plume_model::{AppearanceMode, ColorScheme, LabelPreference};
use tracing::{debug, info};

const ACCESS_TOKEN_VAR: &str = "PLUME_ACCESS_TOKEN";

#[derive(Parser)]
#[command(name = "plume-prefs", about = "Inspect and update Plume moderation preferences")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch preferences from the server and print them
    Sync,
    /// Print the local defaults without contacting the server
    Show,
    /// Enable or disable adult content
    SetAdult {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Set the policy for one label group
    SetLabel {
        group: String,
        pref: LabelPreference,
    },
    /// Resolve the effective color scheme
    Theme {
        #[arg(long, default_value = "auto")]
        mode: AppearanceMode,
        /// Simulated OS scheme; detected from the system when omitted
        #[arg(long)]
        os: Option<ColorScheme>,
    },
}

/// How the OS appearance source is built for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppearancePlan {
    /// No OS lookups; the preference commands never read the theme.
    Inert,
    Fixed(ColorScheme),
    /// Spawn the platform detector.
    Detect,
}

impl Command {
    fn appearance_plan(&self) -> AppearancePlan {
        match self {
            Command::Theme { os: Some(scheme), .. } => AppearancePlan::Fixed(*scheme),
            Command::Theme { os: None, .. } => AppearancePlan::Detect,
            _ => AppearancePlan::Inert,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = ConfigLoader::from_process_env()
        .context("failed to read environment")?
        .load()
        .context("failed to load client configuration")?;
    init_tracing(&loaded.config.log_filter);

    if loaded.env_file_loaded {
        info!("loaded .env file");
    }
    match &loaded.source {
        ConfigSource::EnvPath(path) | ConfigSource::File(path) => {
            info!(path = %path.display(), "client config loaded from file")
        }
        ConfigSource::EnvInline => {
            info!("client config loaded from inline environment json")
        }
        ConfigSource::Default => debug!("using default client config"),
    }

    let appearance: Arc<dyn OsAppearanceSource> = match cli.command.appearance_plan() {
        AppearancePlan::Inert => Arc::new(ManualAppearanceSource::new(None)),
        AppearancePlan::Fixed(scheme) => {
            Arc::new(ManualAppearanceSource::new(Some(scheme)))
        }
        AppearancePlan::Detect => {
            let source = default_appearance_source(&loaded.config);
            source.refresh().await;
            source
        }
    };

    let context = AppContext::bootstrap(loaded.config, appearance)?;
    if let Ok(token) = std::env::var(ACCESS_TOKEN_VAR)
        && !token.trim().is_empty()
    {
        context.api_client.set_token(Some(token.trim().to_string())).await;
    }

    let outcome = run(&context, cli.command).await;
    print_toasts(&context);
    outcome
}

async fn run(context: &AppContext, command: Command) -> Result<()> {
    let preferences = &context.preferences;
    match command {
        Command::Sync => {
            preferences.sync().await?;
            print_preferences(context)
        }
        Command::Show => print_preferences(context),
        Command::SetAdult { enabled } => {
            preferences.set_adult_content_enabled(enabled).await?;
            print_preferences(context)
        }
        Command::SetLabel { group, pref } => {
            preferences.set_content_label_pref_by_id(&group, pref).await?;
            print_preferences(context)
        }
        Command::Theme { mode, .. } => {
            context.theme.set_appearance_mode(mode);
            println!("{}", serde_json::to_string_pretty(&context.theme.current())?);
            Ok(())
        }
    }
}

fn print_preferences(context: &AppContext) -> Result<()> {
    let snapshot = PreferencesSnapshot::from(&context.preferences.snapshot());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn print_toasts(context: &AppContext) {
    for toast in context.toasts.active(Instant::now()) {
        eprintln!("[{:?}] {}", toast.level, toast.message);
    }
}
