//! Application entry point — tts-pro.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse the command line.
//! 3. Load [`AppSettings`] from disk (returns default on first run).
//! 4. Create the config directory; failure here aborts the process. On first
//!    run a default `settings.toml` is written there.
//! 5. Load or initialise the configuration document via [`TtsSession`].
//! 6. Run the requested command and print its status line.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tts_pro::{
    config::{AppPaths, AppSettings},
    registry::ProfileFields,
    synth::{SpeechJob, DEFAULT_SPEED, SPEED_RANGE},
    TtsSession,
};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "tts-pro", version, about = "Text-to-speech with saved voice profiles")]
struct Cli {
    /// Path to settings.toml.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Path to the JSON configuration document.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert text to speech and save the audio file.
    Speak {
        text: String,
        /// Voice profile to use instead of the active one.
        #[arg(short, long)]
        profile: Option<String>,
        /// Output alias to write to instead of the active one.
        #[arg(short, long)]
        output: Option<String>,
        /// Speaking speed (0.5 – 2.0).
        #[arg(short, long, default_value_t = DEFAULT_SPEED, value_parser = parse_speed)]
        speed: f64,
    },
    /// Manage voice profiles.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage output directories.
    #[command(subcommand)]
    Output(OutputCommand),
    /// Show or clear synthesis history.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Store the API key.
    ApiKey { key: String },
    /// Check that the API is reachable.
    Ping,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    List,
    Create {
        name: String,
        #[command(flatten)]
        fields: ProfileArgs,
    },
    /// Change the given fields; zero values leave a field unchanged.
    Edit {
        name: String,
        #[command(flatten)]
        fields: ProfileArgs,
    },
    Delete { name: String },
    /// Make a profile the active one.
    Use { name: String },
}

#[derive(Debug, Subcommand)]
enum OutputCommand {
    List,
    Add { name: String, path: PathBuf },
    Delete { name: String },
    /// Make an alias the active one.
    Use { name: String },
}

#[derive(Debug, Subcommand)]
enum HistoryCommand {
    List,
    Clear,
}

#[derive(Debug, Args)]
struct ProfileArgs {
    #[arg(long)]
    voice_id: Option<String>,
    #[arg(long)]
    backend: Option<String>,
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    temperature: Option<f64>,
    #[arg(long)]
    top_p: Option<f64>,
    #[arg(long)]
    chunk_length: Option<u32>,
    /// `true` or `false`.
    #[arg(long)]
    normalize: Option<bool>,
    /// Volume adjustment (-1.0 – 1.0).
    #[arg(long, allow_hyphen_values = true)]
    volume: Option<f64>,
}

impl From<ProfileArgs> for ProfileFields {
    fn from(args: ProfileArgs) -> Self {
        ProfileFields {
            voice_id: args.voice_id,
            backend: args.backend,
            format: args.format,
            temperature: args.temperature,
            top_p: args.top_p,
            chunk_length: args.chunk_length,
            normalize: args.normalize,
            prosody_volume: args.volume,
        }
    }
}

fn parse_speed(s: &str) -> Result<f64, String> {
    let speed: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if SPEED_RANGE.contains(&speed) {
        Ok(speed)
    } else {
        Err(format!(
            "speed must be between {} and {}",
            SPEED_RANGE.start(),
            SPEED_RANGE.end()
        ))
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn marker(is_active: bool) -> &'static str {
    if is_active {
        " (active)"
    } else {
        ""
    }
}

fn print_profiles(session: &TtsSession) {
    for (name, p) in session.profiles() {
        println!("- {name}{}:", marker(name == session.active_profile()));
        println!("  voice id:     {}", p.voice_id);
        println!("  backend:      {}", p.backend);
        println!("  format:       {}", p.format);
        println!("  temperature:  {}", p.temperature);
        println!("  top-p:        {}", p.top_p);
        println!("  chunk length: {}", p.chunk_length);
        println!("  normalize:    {}", if p.normalize { "yes" } else { "no" });
        println!("  volume:       {}", p.prosody_volume);
    }
    println!("backends: {}", session.backend_options().join(", "));
    println!("formats:  {}", session.format_options().join(", "));
}

fn print_outputs(session: &TtsSession) {
    for (name, path) in session.output_paths() {
        println!(
            "- {name}{}: {}",
            marker(name == session.active_output()),
            path.display()
        );
    }
}

fn print_history(session: &TtsSession) {
    let mut any = false;
    for (i, record) in session.list_history().enumerate() {
        any = true;
        let when: String = record.timestamp.chars().take(19).collect();
        println!("{}. [{when}]", i + 1);
        println!("   profile: {}", record.voice_profile);
        println!("   backend: {}", record.backend);
        println!("   speed:   {}", record.speed);
        println!("   file:    {}", record.filename);
        println!("{}", "-".repeat(40));
    }
    if !any {
        println!("no history yet");
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one command. `Err` carries the message shown to the operator.
async fn run(session: &mut TtsSession, command: Command) -> Result<String, String> {
    let status = match command {
        Command::Speak {
            text,
            profile,
            output,
            speed,
        } => {
            let mut job = SpeechJob::new(text).with_speed(speed);
            job.profile = profile;
            job.output = output;
            let path = session.synthesize(&job).await.map_err(|e| e.to_string())?;
            format!("saved {}", path.display())
        }
        Command::Profile(cmd) => match cmd {
            ProfileCommand::List => {
                print_profiles(session);
                return Ok(String::new());
            }
            ProfileCommand::Create { name, fields } => session.create_profile(&name, fields.into()),
            ProfileCommand::Edit { name, fields } => session.edit_profile(&name, fields.into()),
            ProfileCommand::Delete { name } => session.delete_profile(&name),
            ProfileCommand::Use { name } => session.set_active_profile(&name),
        }
        .map_err(|e| e.to_string())?,
        Command::Output(cmd) => match cmd {
            OutputCommand::List => {
                print_outputs(session);
                return Ok(String::new());
            }
            OutputCommand::Add { name, path } => session.add_output_path(&name, path),
            OutputCommand::Delete { name } => session.delete_output_path(&name),
            OutputCommand::Use { name } => session.set_active_output(&name),
        }
        .map_err(|e| e.to_string())?,
        Command::History(HistoryCommand::List) => {
            print_history(session);
            return Ok(String::new());
        }
        Command::History(HistoryCommand::Clear) => {
            session.clear_history().map_err(|e| e.to_string())?
        }
        Command::ApiKey { key } => session.set_api_key(&key).map_err(|e| e.to_string())?,
        Command::Ping => {
            if session.test_connection().await {
                "API connection OK".to_string()
            } else {
                return Err("cannot reach the API; check the API key and network".into());
            }
        }
    };
    Ok(status)
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command line
    let cli = Cli::parse();

    // 3. Settings
    let first_run =
        cli.settings.is_none() && AppSettings::is_first_run(&AppPaths::new().settings_file);
    let loaded = match &cli.settings {
        Some(path) => AppSettings::load_from(path),
        None => AppSettings::load(),
    };
    let settings = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load settings ({e}); using defaults");
        AppSettings::default()
    });

    // 4. Paths
    let mut paths = AppPaths::new().with_storage(&settings.storage);
    if let Some(config) = cli.config {
        paths.document_file = config;
    }
    std::fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!(
            "cannot create config directory {}",
            paths.config_dir.display()
        )
    })?;
    if first_run {
        match settings.save_to(&paths.settings_file) {
            Ok(()) => log::info!(
                "wrote default settings to {}",
                paths.settings_file.display()
            ),
            Err(e) => log::warn!("cannot write {} ({e})", paths.settings_file.display()),
        }
    }

    // 5. Configuration document
    let mut session = TtsSession::load_or_init(&paths, &settings.api).with_context(|| {
        format!(
            "cannot initialise configuration at {}",
            paths.document_file.display()
        )
    })?;

    // 6. Command
    match run(&mut session, cli.command).await {
        Ok(status) => {
            if !status.is_empty() {
                println!("{status}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => {
            eprintln!("error: {message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn speed_bounds_are_enforced() {
        assert_eq!(parse_speed("1.5"), Ok(1.5));
        assert!(parse_speed("0.4").is_err());
        assert!(parse_speed("2.5").is_err());
        assert!(parse_speed("fast").is_err());
    }

    #[test]
    fn edit_without_normalize_flag_leaves_it_unset() {
        let cli = Cli::try_parse_from(["tts-pro", "profile", "edit", "calm", "--backend", "s1"])
            .expect("parse");
        match cli.command {
            Command::Profile(ProfileCommand::Edit { fields, .. }) => {
                let fields: ProfileFields = fields.into();
                assert_eq!(fields.normalize, None);
                assert_eq!(fields.backend.as_deref(), Some("s1"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn negative_volume_is_accepted() {
        let cli = Cli::try_parse_from([
            "tts-pro", "profile", "create", "soft", "--voice-id", "r1", "--volume", "-0.5",
            "--normalize", "false",
        ])
        .expect("parse");
        match cli.command {
            Command::Profile(ProfileCommand::Create { fields, .. }) => {
                assert_eq!(fields.volume, Some(-0.5));
                assert_eq!(fields.normalize, Some(false));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
