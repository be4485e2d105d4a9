use crate::review::UnknownWord;
use crate::{CheckResult, SpellError};
use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Lines and columns are 1-based here; the locator keeps zero-based numbers.
#[derive(Debug, Serialize, Deserialize)]
struct JsonError {
    file: String,
    line: usize,
    column: usize,
    word: String,
    suggestions: Vec<String>,
    context: String,
    locator: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonOutput {
    files_checked: usize,
    total_errors: usize,
    errors: Vec<JsonError>,
}

pub fn print_errors(
    reports: &[(&Path, &CheckResult)],
    colored_output: bool,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (file_path, result) in reports {
                print_text_errors(file_path, result, colored_output);
            }
            Ok(())
        }
        OutputFormat::Json => print_json_errors(reports),
    }
}

fn print_text_errors(file_path: &Path, result: &CheckResult, colored_output: bool) {
    if result.errors.is_empty() {
        return;
    }

    let file_name = file_path.display().to_string();
    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for error in &result.errors {
        let line_info = format!("{}:{}", error.line + 1, error.start_column + 1);

        if colored_output {
            println!(
                "  {} {} {}",
                line_info.blue().bold(),
                error.word.red().bold(),
                highlight(&error.context, &error.word, colored_output)
            );
        } else {
            println!("  {} {} {}", line_info, error.word, error.context);
        }

        if !error.suggestions.is_empty() {
            println!("    → {}", format_suggestions(&error.suggestions, colored_output));
        }
    }
}

fn print_json_errors(reports: &[(&Path, &CheckResult)]) -> Result<()> {
    let errors: Vec<JsonError> = reports
        .iter()
        .flat_map(|(file_path, result)| result.errors.iter().map(move |e| json_error(file_path, e)))
        .collect();

    let output = JsonOutput {
        files_checked: reports.len(),
        total_errors: errors.len(),
        errors,
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

fn json_error(file_path: &Path, error: &SpellError) -> JsonError {
    JsonError {
        file: file_path.display().to_string(),
        line: error.line + 1,
        column: error.start_column + 1,
        word: error.word.clone(),
        suggestions: error.suggestions.clone(),
        context: error.context.clone(),
        locator: error.locator.to_string(),
    }
}

fn format_suggestions(suggestions: &[String], colored_output: bool) -> String {
    if colored_output {
        suggestions
            .iter()
            .take(5)
            .map(|s| s.green().to_string())
            .collect::<Vec<_>>()
            .join(&", ".dimmed().to_string())
    } else {
        suggestions.iter().take(5).cloned().collect::<Vec<_>>().join(", ")
    }
}

fn highlight(context: &str, word: &str, colored: bool) -> String {
    if colored {
        context.replace(word, &word.red().bold().to_string())
    } else {
        context.to_string()
    }
}

/// Cut `width` chars of context around `[start, end)` out of `line`.
pub fn context_window(line: &str, start: usize, end: usize, width: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let from = start.saturating_sub(width);
    let to = (end + width).min(chars.len());
    let window: String = chars[from.min(to)..to].iter().collect();

    match (from > 0, to < chars.len()) {
        (true, true) => format!("...{}...", window),
        (true, false) => format!("...{}", window),
        (false, true) => format!("{}...", window),
        (false, false) => window,
    }
}

/// Shown before each interactive decision.
pub fn print_occurrence(file_path: &Path, occurrence: &UnknownWord, context: &str, colored: bool) {
    let position = format!("{}:{}", occurrence.line + 1, occurrence.start_column + 1);
    if colored {
        println!(
            "\n{} {}:{}",
            "Misspelling found:".yellow().bold(),
            file_path.display(),
            position.blue()
        );
    } else {
        println!("\nMisspelling found: {}:{}", file_path.display(), position);
    }
    println!("  {}", highlight(context, &occurrence.word, colored));
}

pub fn print_check_summary(total_errors: usize, files: usize, colored: bool) {
    println!();
    if total_errors == 0 {
        if colored {
            println!("{}", "✓ No spelling errors found!".green().bold());
        } else {
            println!("✓ No spelling errors found!");
        }
        return;
    }

    let error_word = if total_errors == 1 { "error" } else { "errors" };
    let file_word = if files == 1 { "file" } else { "files" };
    if colored {
        println!(
            "{} {} {} found in {} {}",
            "✗".red().bold(),
            total_errors.to_string().red().bold(),
            error_word,
            files,
            file_word
        );
    } else {
        println!("✗ {} {} found in {} {}", total_errors, error_word, files, file_word);
    }
}

pub fn print_fix_summary(total_fixed: usize, total_learned: usize, files: usize, colored: bool) {
    println!();
    if total_fixed == 0 && total_learned == 0 {
        if colored {
            println!("{}", "No corrections needed!".green().bold());
        } else {
            println!("No corrections needed!");
        }
        return;
    }

    let fix_word = if total_fixed == 1 { "correction" } else { "corrections" };
    let file_word = if files == 1 { "file" } else { "files" };
    let mut summary = format!("{} {} applied to {} {}", total_fixed, fix_word, files, file_word);
    if total_learned > 0 {
        summary.push_str(&format!(", {} learned", total_learned));
    }

    if colored {
        println!("{} {}", "✓".green().bold(), summary);
    } else {
        println!("✓ {}", summary);
    }
}
