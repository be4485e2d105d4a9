use crate::checker::dictionary::Dictionary;
use crate::config::Config;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

// Pinned commit so a download always yields the same list
const WORDLIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/6e4bc58ad764c3e6df8b5be4048671962c9d6a23";
const WORDLIST_VERSION: &str = "2023.12";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryInfo {
    pub language: String,
    pub path: PathBuf,
    pub word_count: usize,
    pub size_bytes: u64,
    pub sha256: String,
}

impl DictionaryInfo {
    pub fn read(language: &str, path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read dictionary: {}", path.display()))?;
        let dictionary = Dictionary::load_from_path(path)?;
        Ok(Self {
            language: language.to_string(),
            path: path.to_path_buf(),
            word_count: dictionary.len(),
            size_bytes: bytes.len() as u64,
            sha256: sha256_hex(&bytes),
        })
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn data_dir() -> Result<PathBuf> {
    Config::data_dir().context("Failed to get data directory")
}

/// Languages with a `.dict` file in `dir`, sorted.
fn installed_languages(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut languages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("dict") {
            if let Some(language) = path.file_stem().and_then(|s| s.to_str()) {
                languages.push(language.to_string());
            }
        }
    }
    languages.sort();
    Ok(languages)
}

fn wordlist_url(language: &str) -> Result<String> {
    match language {
        "en_US" | "en_GB" => Ok(format!("{}/words_alpha.txt", WORDLIST_BASE_URL)),
        other => anyhow::bail!(
            "Language '{}' is not supported. Only 'en_US' and 'en_GB' are currently available.",
            other
        ),
    }
}

/// One lowercase word per line, single letters dropped.
fn parse_wordlist(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| word.chars().count() > 1)
        .collect()
}

fn install_wordlist(language: &str, content: &str, dict_path: &Path) -> Result<DictionaryInfo> {
    let words = parse_wordlist(content);
    debug!(language, words = words.len(), "building dictionary");
    Dictionary::build_from_words(&words, dict_path)?;
    DictionaryInfo::read(language, dict_path)
}

pub fn list_dictionaries() -> Result<()> {
    let data_dir = data_dir()?;
    let languages = installed_languages(&data_dir)?;

    if languages.is_empty() {
        println!("{}", "No dictionaries installed.".yellow());
        println!(
            "Run {} to download a dictionary.",
            "spellreview dict download en_US".cyan()
        );
        return Ok(());
    }

    println!("{}", "Installed dictionaries:".bold());
    println!();

    for language in &languages {
        let path = data_dir.join(format!("{}.dict", language));
        let size_kb = fs::metadata(&path)?.len() / 1024;
        println!(
            "  {} {} ({})",
            "✓".green(),
            language.cyan().bold(),
            format!("{}KB", size_kb).dimmed()
        );
    }

    println!();
    println!("Data directory: {}", data_dir.display().to_string().dimmed());

    Ok(())
}

pub fn download_dictionary(language: &str) -> Result<()> {
    let wordlist_url = wordlist_url(language)?;
    println!(
        "{} dictionary for {} (version: {})...",
        "Downloading".cyan().bold(),
        language.yellow(),
        WORDLIST_VERSION.dimmed()
    );
    println!("Source: {}", wordlist_url.dimmed());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid progress template")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Downloading...");

    let response = reqwest::blocking::get(&wordlist_url).context("Failed to download dictionary")?;
    if !response.status().is_success() {
        pb.abandon_with_message("Download failed");
        anyhow::bail!("Failed to download dictionary: HTTP {}", response.status());
    }
    let content = response.text().context("Failed to read dictionary download")?;
    pb.finish_with_message("Download complete");

    println!("{}", "Building dictionary...".cyan());
    let dict_path = Dictionary::dictionary_path(language)?;
    let installed = install_wordlist(language, &content, &dict_path)?;
    info!(language, path = %dict_path.display(), words = installed.word_count, "dictionary installed");

    println!("Found {} words", installed.word_count.to_string().yellow());
    println!(
        "{} Dictionary installed: {}",
        "✓".green().bold(),
        dict_path.display().to_string().cyan()
    );

    Ok(())
}

pub fn update_dictionaries() -> Result<()> {
    let languages = installed_languages(&data_dir()?)?;

    if languages.is_empty() {
        println!("{}", "No dictionaries to update.".yellow());
        return Ok(());
    }

    println!(
        "{} {} {}...",
        "Updating".cyan().bold(),
        languages.len(),
        if languages.len() == 1 { "dictionary" } else { "dictionaries" }
    );
    println!();

    for language in languages {
        download_dictionary(&language)?;
        println!();
    }

    println!("{} All dictionaries updated!", "✓".green().bold());

    Ok(())
}

pub fn show_info(language: &str) -> Result<()> {
    let dict_path = Dictionary::dictionary_path(language)?;

    if !dict_path.exists() {
        println!("{} Dictionary for {} not found.", "✗".red().bold(), language.yellow());
        println!(
            "Run {} to download it.",
            format!("spellreview dict download {}", language).cyan()
        );
        return Ok(());
    }

    let info = DictionaryInfo::read(language, &dict_path)?;

    println!("{}", format!("Dictionary: {}", info.language).bold());
    println!("  Path: {}", info.path.display());
    println!("  Size: {} KB", info.size_bytes / 1024);
    println!("  Words: {}", info.word_count.to_string().yellow());
    println!("  SHA-256: {}", info.sha256.dimmed());
    println!("  Version: {}", WORDLIST_VERSION);
    println!("  Format: FST (Finite State Transducer)");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_wordlist() {
        let words = parse_wordlist("Apple\n a\n\nbanana  \r\nÉclair\n");
        assert_eq!(words, ["apple", "banana", "éclair"]);
    }

    #[test]
    fn test_install_wordlist_reports_count_and_checksum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dicts").join("en_US.dict");

        let info = install_wordlist("en_US", "zebra\napple\napple\nx\n", &path).unwrap();

        assert_eq!(info.word_count, 2);
        assert_eq!(info.size_bytes, fs::metadata(&path).unwrap().len());
        assert_eq!(info.sha256.len(), 64);
        assert_eq!(info.sha256, sha256_hex(&fs::read(&path).unwrap()));
        assert!(Dictionary::load_from_path(&path).unwrap().contains("zebra"));
    }

    #[test]
    fn test_installed_languages() {
        let dir = tempdir().unwrap();
        assert!(installed_languages(&dir.path().join("missing")).unwrap().is_empty());

        fs::write(dir.path().join("en_US.dict"), b"").unwrap();
        fs::write(dir.path().join("en_GB.dict"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        assert_eq!(installed_languages(dir.path()).unwrap(), ["en_GB", "en_US"]);
    }

    #[test]
    fn test_unsupported_language() {
        assert!(wordlist_url("fr_FR").is_err());
        assert!(wordlist_url("en_GB").unwrap().ends_with("words_alpha.txt"));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
