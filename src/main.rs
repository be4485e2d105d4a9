use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use ignore::WalkBuilder;
use rayon::prelude::*;
use spellreview::checker::dictionary::Dictionary;
use spellreview::cli::output::{self, OutputFormat};
use spellreview::review::{DictionaryOracle, Locator};
use spellreview::{checker::SpellChecker, cli, dict, CheckResult, Config};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spellreview")]
#[command(version, about = "Spell check files and review corrections one word at a time", long_about = None)]
struct Cli {
    /// Files or directories to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Fix misspellings in place (auto-apply top suggestion)
    #[arg(short, long)]
    fix: bool,

    /// Review each misspelling interactively
    #[arg(short, long, requires = "fix")]
    interactive: bool,

    /// Start the interactive review at a reported locator
    #[arg(long, value_name = "LOCATOR", requires = "interactive")]
    resume: Option<Locator>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if errors are found
    #[arg(long)]
    no_fail: bool,

    /// Language/dictionary to use (e.g., en_US, en_GB)
    #[arg(short, long, env = "SPELLREVIEW_LANGUAGE")]
    language: Option<String>,

    /// Use this FST dictionary file instead of the installed one
    #[arg(long, value_name = "FST")]
    dictionary: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Add words to personal dictionary
    #[arg(long)]
    add_to_dict: Vec<String>,

    /// Pattern to ignore (regex)
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Personal dictionary file
    #[arg(long)]
    personal_dict: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Download a dictionary
    Download {
        /// Language code (e.g., en_US, en_GB)
        language: String,
    },
    /// Update all dictionaries
    Update,
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellreview", &mut io::stdout());
        return Ok(());
    }

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    let config = Config::load(
        cli.language.clone(),
        cli.personal_dict.clone(),
        cli.ignore_pattern.clone(),
    )?;

    let checker = match &cli.dictionary {
        Some(path) => SpellChecker::with_dictionary(Dictionary::load_from_path(path)?, &config)?,
        None => SpellChecker::new(&config)?,
    };

    for word in &cli.add_to_dict {
        checker
            .learn(word)
            .with_context(|| format!("Failed to add '{}' to the personal dictionary", word))?;
    }

    if cli.files.is_empty() {
        if !cli.add_to_dict.is_empty() {
            return Ok(());
        }
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let files = expand_files(&cli.files);
    let colored = !cli.no_color;
    debug!(files = files.len(), language = %config.language, "starting");

    if cli.fix {
        let mut total_fixed = 0;
        let mut total_learned = 0;
        for file_path in &files {
            let result = if cli.interactive {
                let resume = cli.resume.as_ref().filter(|locator| resumes_in(locator, file_path));
                cli::review_file(&checker, file_path, &config, resume, colored)?
            } else {
                cli::fix_file(&checker, file_path)?
            };
            total_fixed += result.fixed_count;
            total_learned += result.learned_count;
        }
        output::print_fix_summary(total_fixed, total_learned, files.len(), colored);
        return Ok(());
    }

    let results: Vec<(PathBuf, Result<CheckResult>)> = files
        .par_iter()
        .map(|file_path| (file_path.clone(), cli::check_file(&checker, file_path, &config)))
        .collect();

    let mut reports = Vec::new();
    for (file_path, result) in results {
        reports.push((file_path, result?));
    }

    let borrowed: Vec<(&Path, &CheckResult)> = reports.iter().map(|(p, r)| (p.as_path(), r)).collect();
    output::print_errors(&borrowed, colored, cli.format)?;

    let total_errors: usize = reports.iter().map(|(_, r)| r.error_count).sum();
    if cli.format == OutputFormat::Text {
        output::print_check_summary(total_errors, files.len(), colored);
    }

    if total_errors > 0 && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

/// Files as given, directories walked with gitignore rules applied.
fn expand_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkBuilder::new(path).build() {
                match entry {
                    Ok(entry) if entry.file_type().is_some_and(|t| t.is_file()) => {
                        files.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(err) => warn!(%err, "skipping unreadable entry"),
                }
            }
        } else if path.exists() {
            files.push(path.clone());
        } else {
            eprintln!("Error: File not found: {}", path.display());
        }
    }
    files
}

/// A locator without a path applies to every file.
fn resumes_in(locator: &Locator, file_path: &Path) -> bool {
    locator.path.as_deref().map_or(true, |path| path == file_path)
}

fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Dict { action } => match action {
            DictCommands::List => dict::manager::list_dictionaries()?,
            DictCommands::Download { language } => dict::manager::download_dictionary(&language)?,
            DictCommands::Update => dict::manager::update_dictionaries()?,
            DictCommands::Info { language } => dict::manager::show_info(&language)?,
        },
    }
    Ok(())
}
