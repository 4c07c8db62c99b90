use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use issuefocus::api::FocusApi;
use issuefocus::commands::{CmdMessage, CmdResult, EntryView, FocusPaths, MessageLevel};
use issuefocus::config::{FocusConfig, CONFIG_KEYS};
use issuefocus::error::{FocusError, Result};
use issuefocus::model::Preferences;
use issuefocus::store::fs::FsStore;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use unicode_width::UnicodeWidthStr;

mod args;
use args::{Cli, Commands};

const LINE_WIDTH: usize = 100;
const HOME_ENV: &str = "ISSUEFOCUS_HOME";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = FocusPaths {
        data_dir: data_dir()?,
    };
    tracing::debug!(data_dir = %paths.data_dir.display(), "resolved data directory");
    let mut api = FocusApi::new(FsStore::new(paths.data_dir.clone()), paths);

    match cli.command {
        Commands::Classify { file } => handle_classify(&api, file),
        Commands::Apply { file, output } => handle_apply(&api, file, output),
        Commands::Watch { file, output } => handle_watch(api, file, output),
        Commands::Settings {
            category,
            switch,
            reset,
        } => handle_settings(&mut api, category, switch, reset),
        Commands::Config { key, value } => handle_config(&api, key, value),
    }
}

/// Logs go to stderr; stdout may be carrying a page.
fn init_tracing(verbose: bool) {
    let default = if verbose { "issuefocus=debug" } else { "issuefocus=warn" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "issuefocus", "issuefocus")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            FocusError::Config(format!(
                "Could not determine a data directory; set {}",
                HOME_ENV
            ))
        })
}

fn handle_classify(api: &FocusApi<FsStore>, file: PathBuf) -> Result<()> {
    let result = api.classify_page(&file)?;
    print_entries(&result.entries);
    finish(&result)
}

fn handle_apply(api: &FocusApi<FsStore>, file: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let result = api.apply_page(&file, output.as_deref())?;
    if let Some(html) = &result.html {
        print!("{}", html);
    }
    finish(&result)
}

fn handle_watch(api: FocusApi<FsStore>, file: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let target = output.as_ref().unwrap_or(&file);
    eprintln!(
        "{}",
        format!("Watching {} (Ctrl-C to stop)", target.display()).dimmed()
    );
    let result = api.watch_page(&file, output.as_deref())?;
    finish(&result)
}

fn handle_settings(
    api: &mut FocusApi<FsStore>,
    category: Option<String>,
    switch: Option<String>,
    reset: bool,
) -> Result<()> {
    let result = match (category, switch) {
        _ if reset => api.reset_settings()?,
        (Some(category), Some(switch)) => api.set_category(&category, &switch)?,
        _ => api.show_settings()?,
    };
    if let Some(prefs) = &result.preferences {
        print_preferences(prefs);
    }
    finish(&result)
}

fn handle_config(api: &FocusApi<FsStore>, key: Option<String>, value: Option<String>) -> Result<()> {
    let showing_all = key.is_none();
    let result = api.config(key, value)?;
    if showing_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    finish(&result)
}

/// Print the messages; an error-level message becomes the command's error.
fn finish(result: &CmdResult) -> Result<()> {
    let (errors, others): (Vec<&CmdMessage>, Vec<&CmdMessage>) = result
        .messages
        .iter()
        .partition(|m| matches!(m.level, MessageLevel::Error));
    print_messages(&others);
    match errors.first() {
        Some(error) => Err(FocusError::Api(error.content.clone())),
        None => Ok(()),
    }
}

fn print_messages(messages: &[&CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_entries(entries: &[EntryView]) {
    const ID_WIDTH: usize = 14;
    const CATEGORY_WIDTH: usize = 17;
    const STATE_WIDTH: usize = 7;

    for entry in entries {
        let id = truncate_to_width(&entry.entry_id, ID_WIDTH);
        let category = entry.category.map(|c| c.key()).unwrap_or("—");
        let state = if entry.hidden { "hidden" } else { "shown" };

        let fixed = ID_WIDTH + CATEGORY_WIDTH + STATE_WIDTH + 3;
        let excerpt = truncate_to_width(&entry.excerpt, LINE_WIDTH.saturating_sub(fixed));

        let id = pad_to_width(&id, ID_WIDTH);
        let category = pad_to_width(category, CATEGORY_WIDTH);
        let state = pad_to_width(state, STATE_WIDTH);
        if entry.hidden {
            println!("{} {} {} {}", id.dimmed(), category.yellow(), state.red(), excerpt.dimmed());
        } else {
            println!("{} {} {} {}", id.dimmed(), category.normal(), state.green(), excerpt);
        }
    }
}

fn print_preferences(prefs: &Preferences) {
    for (category, hide) in prefs.iter() {
        let key = pad_to_width(category.key(), 17);
        if hide {
            println!("{} {}  {}", key.bold(), "hide".red(), category.label().dimmed());
        } else {
            println!("{} {}  {}", key.bold(), "show".green(), category.label().dimmed());
        }
    }
}

fn print_config(config: &FocusConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}
