use anyhow::{Context, Result};
use fst::{Automaton, IntoStreamer, Set, SetBuilder, Streamer};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Words bundled so a first run works before any download.
const BOOTSTRAP_WORDS: &str = "
    the be to of and a in that have i it for not on with he as you do at
    this but his by from they we say her she or an will my one all would
    there their what so up out if about who get which go me when make can
    like time no just him know take people into year your good some could
    them see other than then now look only come its over think also back
    after use two how our work first well way even new want because any
    these give day most us is are was were has had been being word words
    text file line check spell spelling review change ignore learn
    function class method variable string integer boolean array list
    dictionary object parameter return import export async await promise
    callback error exception test debug compile build deploy version
    configuration
";

/// The main word list, stored as an FST set of lowercase words.
pub struct Dictionary {
    set: Set<Vec<u8>>,
}

impl Dictionary {
    /// Load the installed dictionary for `language`, bootstrapping a small
    /// one if none is installed yet.
    pub fn load(language: &str) -> Result<Self> {
        let dict_path = Self::dictionary_path(language)?;

        if !dict_path.exists() {
            debug!(language, path = %dict_path.display(), "no dictionary installed, bootstrapping");
            Self::build_from_words(&Self::bootstrap_words(), &dict_path)?;
        }

        Self::load_from_path(&dict_path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;
        let set = Set::new(bytes)
            .with_context(|| format!("Failed to parse dictionary: {}", path.display()))?;

        Ok(Self { set })
    }

    /// Build an in-memory dictionary.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let set = Set::from_iter(Self::normalize(words)).context("Failed to build dictionary")?;
        Ok(Self { set })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn words_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut stream = self
            .set
            .search(fst::automaton::Str::new(prefix).starts_with())
            .into_stream();

        let mut results = Vec::new();
        while let Some(key) = stream.next() {
            if let Ok(word) = std::str::from_utf8(key) {
                results.push(word.to_string());
            }
        }
        results
    }

    /// Words whose length in chars is within `len_range`, stopping after `limit`.
    ///
    /// Walks the whole set; keep `limit` small.
    pub fn words_by_length(&self, len_range: std::ops::RangeInclusive<usize>, limit: usize) -> Vec<String> {
        let mut stream = self.set.stream();
        let mut results = Vec::new();

        while let Some(key) = stream.next() {
            if results.len() >= limit {
                break;
            }
            if let Ok(word) = std::str::from_utf8(key) {
                if len_range.contains(&word.chars().count()) {
                    results.push(word.to_string());
                }
            }
        }
        results
    }

    /// Write an FST dictionary built from `words` to `output_path`.
    pub fn build_from_words<S: AsRef<str>>(words: &[S], output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let file = File::create(output_path)
            .with_context(|| format!("Failed to create dictionary: {}", output_path.display()))?;
        let mut builder =
            SetBuilder::new(BufWriter::new(file)).context("Failed to create FST builder")?;

        for word in Self::normalize(words) {
            builder
                .insert(word.as_bytes())
                .context("Failed to insert word into dictionary")?;
        }
        builder.finish().context("Failed to finalize dictionary")?;

        Ok(())
    }

    pub fn dictionary_path(language: &str) -> Result<PathBuf> {
        let data_dir = crate::config::Config::data_dir().context("Failed to get data directory")?;
        Ok(data_dir.join(format!("{}.dict", language)))
    }

    fn bootstrap_words() -> Vec<&'static str> {
        BOOTSTRAP_WORDS.split_whitespace().collect()
    }

    /// FST insertion needs sorted, unique keys.
    fn normalize<S: AsRef<str>>(words: &[S]) -> Vec<String> {
        let mut sorted: Vec<String> = words
            .iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        sorted.sort();
        sorted.dedup();
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_build_and_load_dictionary() {
        let dir = tempdir().unwrap();
        let dict_path = dir.path().join("test.dict");

        Dictionary::build_from_words(&["hello", "World", "test", "hello"], &dict_path).unwrap();

        let dict = Dictionary::load_from_path(&dict_path).unwrap();
        assert!(dict.contains("hello"));
        assert!(dict.contains("world"));
        assert!(!dict.contains("notfound"));
        assert_eq!(dict.len(), 3);
    }

    #[test]
    fn test_prefix_and_length_queries() {
        let dict = Dictionary::from_words(&["cat", "car", "cart", "dog"]).unwrap();
        assert_eq!(dict.words_with_prefix("ca"), ["car", "cart", "cat"]);
        assert_eq!(dict.words_by_length(3..=3, 10), ["car", "cat", "dog"]);
        assert_eq!(dict.words_by_length(3..=4, 2), ["car", "cart"]);
    }

    #[test]
    fn test_bootstrap_words_are_usable() {
        let dict = Dictionary::from_words(&Dictionary::bootstrap_words()).unwrap();
        assert!(dict.contains("the"));
        assert!(dict.contains("configuration"));
    }
}
