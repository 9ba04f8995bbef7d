// IssueTag - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation
// 3. Command dispatch (convert, watch, profile management)

use issuetag::app::profile_store::ProfileStore;
use issuetag::app::state::{AppState, Conversion};
use issuetag::app::watch::{ClipboardWatcher, WatchSettings};
use issuetag::core::extractor::IssueExtractor;
use issuetag::platform::clipboard::{ClipboardAccess, SystemClipboard};
use issuetag::platform::config::{self, AppConfig, PlatformPaths};
use issuetag::util::error::{ConfigError, IssueTagError, Result};
use issuetag::util::{constants, logging};

use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// IssueTag - turn pasted build output into numbered issue tags.
///
/// Extracts error, warning, and failed-module lines from build logs,
/// removes duplicates, wraps each in <issueN> tags, and copies the result
/// to the clipboard, optionally framed by a saved profile's text.
#[derive(Parser, Debug)]
#[command(name = "issuetag", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Directory holding profiles.json and last_profile.txt.
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file to use instead of the platform default.
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert build output from a file or stdin and copy it.
    ///
    /// When the input contains no issue lines nothing is copied and the
    /// clipboard keeps its previous content.
    Convert(ConvertArgs),

    /// Watch the clipboard and convert build output as it is copied.
    Watch(ProfileChoice),

    /// Manage saved pretext/posttext profiles.
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// File containing build output ("-" or omitted reads stdin).
    input: Option<PathBuf>,

    #[command(flatten)]
    choice: ProfileChoice,

    /// Also print the converted text to stdout.
    #[arg(long = "print")]
    print: bool,

    /// Print the converted text instead of copying it.
    #[arg(long = "no-copy")]
    no_copy: bool,
}

#[derive(Args, Debug)]
struct ProfileChoice {
    /// Frame the output with this profile and remember it as last used.
    #[arg(short = 'p', long = "profile", conflicts_with = "no_profile")]
    profile: Option<String>,

    /// Ignore the last used profile for this run.
    #[arg(long = "no-profile")]
    no_profile: bool,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// List saved profiles (* marks the last used one).
    List,

    /// Print a profile's pretext and posttext.
    Show { name: String },

    /// Create or overwrite a profile.
    Save {
        name: String,

        /// Text placed before the issues.
        #[arg(long = "pre", default_value = "")]
        pretext: String,

        /// Text placed after the issues.
        #[arg(long = "post", default_value = "")]
        posttext: String,
    },

    /// Delete a profile.
    Delete { name: String },

    /// Make a profile the default for future conversions.
    Use { name: String },

    /// Stop applying a default profile.
    Clear,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());

    // Config chooses the log level, so it is loaded before logging starts and
    // its warnings are replayed afterwards.
    let (app_config, config_warnings) = config::load_config(&config_path);

    logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "IssueTag starting"
    );

    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Configuration warning");
    }

    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| platform_paths.data_dir.clone());

    let result = check_explicit_config(cli.config.as_deref())
        .and_then(|()| run(cli.command, &app_config, &data_dir));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("Error: {e}");
            match e {
                IssueTagError::Profile(ref p) if p.is_validation() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

/// A config file named on the command line must exist; the platform default
/// may be absent.
fn check_explicit_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) if !path.is_file() => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
        }
        .into()),
        _ => Ok(()),
    }
}

fn run(command: Command, app_config: &AppConfig, data_dir: &Path) -> Result<()> {
    let store = ProfileStore::new(data_dir);
    tracing::debug!(store = %store.profiles_path().display(), "Using profile store");

    match command {
        Command::Convert(args) => run_convert(args, app_config, &store),
        Command::Watch(choice) => run_watch(choice, app_config, &store),
        Command::Profile(cmd) => run_profile(cmd, &store),
    }
}

fn build_extractor(app_config: &AppConfig) -> IssueExtractor {
    IssueExtractor::with_extra_rules(&app_config.extra_ignore_paths, &app_config.extra_keywords)
}

/// Load state and apply the command-line profile choice.
fn load_state(store: &ProfileStore, choice: &ProfileChoice) -> Result<AppState> {
    let mut state = AppState::load(store)?;
    if choice.no_profile {
        state.clear_selection();
    } else if let Some(ref name) = choice.profile {
        state.select(store, name)?;
    }
    Ok(state)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            // Build logs are not always valid UTF-8; keep what can be read.
            let bytes = std::fs::read(path).map_err(|e| IssueTagError::Io {
                path: path.to_path_buf(),
                operation: "read input",
                source: e,
            })?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|e| IssueTagError::Io {
                    path: PathBuf::from("<stdin>"),
                    operation: "read input",
                    source: e,
                })?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

fn run_convert(args: ConvertArgs, app_config: &AppConfig, store: &ProfileStore) -> Result<()> {
    let input = read_input(args.input.as_deref())?;
    let state = load_state(store, &args.choice)?;
    let conversion = state.convert(&build_extractor(app_config), &input);

    if !conversion.has_issues() {
        eprintln!(
            "No issues found ({} line(s) ignored); clipboard unchanged.",
            conversion.extraction.noise_lines
        );
        return Ok(());
    }

    if args.no_copy || args.print || app_config.print {
        println!("{}", conversion.output);
    }

    if !args.no_copy {
        let mut clipboard = SystemClipboard::open()?;
        clipboard.set_text(&conversion.output)?;
        eprintln!("✓ {} and copied to clipboard", summary(&conversion));
    }

    Ok(())
}

fn run_watch(choice: ProfileChoice, app_config: &AppConfig, store: &ProfileStore) -> Result<()> {
    let state = load_state(store, &choice)?;
    let extractor = build_extractor(app_config);
    let mut clipboard = SystemClipboard::open()?;

    eprintln!(
        "Watching clipboard{} (Ctrl+C to stop)...",
        state
            .selected
            .as_deref()
            .map(|name| format!(" with profile '{name}'"))
            .unwrap_or_default()
    );

    let mut watcher = ClipboardWatcher::new(&state, &extractor, WatchSettings::from(app_config));
    watcher.run(&mut clipboard, |conversion| {
        eprintln!("✓ {}", summary(conversion));
    });
    Ok(())
}

fn summary(conversion: &Conversion) -> String {
    let count = conversion.extraction.len();
    let mut text = format!(
        "Converted {count} issue{}",
        if count == 1 { "" } else { "s" }
    );
    if conversion.extraction.duplicate_lines > 0 {
        text.push_str(&format!(
            " ({} duplicate(s) removed)",
            conversion.extraction.duplicate_lines
        ));
    }
    if let Some(ref profile) = conversion.profile {
        text.push_str(&format!(" with profile '{profile}'"));
    }
    text
}

fn run_profile(cmd: ProfileCommand, store: &ProfileStore) -> Result<()> {
    match cmd {
        ProfileCommand::List => {
            let state = AppState::load(store)?;
            if state.profiles.is_empty() {
                eprintln!("No profiles saved.");
            }
            for name in state.profiles.keys() {
                let marker = if state.selected.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {name}");
            }
        }
        ProfileCommand::Show { name } => {
            let profile = store.get(&name)?;
            println!("[{}]", profile.name);
            println!("pretext:\n{}", profile.text.pretext);
            println!("posttext:\n{}", profile.text.posttext);
        }
        ProfileCommand::Save {
            name,
            pretext,
            posttext,
        } => {
            let mut state = AppState::load(store)?;
            let replaced = state.save_profile(store, &name, &pretext, &posttext)?;
            let verb = if replaced { "Updated" } else { "Saved" };
            eprintln!("{verb} profile '{}'", name.trim());
        }
        ProfileCommand::Delete { name } => {
            let mut state = AppState::load(store)?;
            state.delete_profile(store, &name)?;
            eprintln!("Deleted profile '{}'", name.trim());
        }
        ProfileCommand::Use { name } => {
            let mut state = AppState::load(store)?;
            state.select(store, &name)?;
            eprintln!("Profile '{}' will be used by default", name.trim());
        }
        ProfileCommand::Clear => {
            store.clear_last_used()?;
            eprintln!("No profile will be used by default");
        }
    }
    Ok(())
}
