use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::matcher::{AnalysisResult, analyze};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access word list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Known words in discovery order, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashSet<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    /// Returns `false` if the word was already known.
    pub fn insert(&mut self, word: &str) -> bool {
        if self.index.contains(word) {
            return false;
        }
        self.index.insert(word.to_owned());
        self.words.push(word.to_owned());
        true
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocabulary = Vocabulary::new();
        for word in iter {
            vocabulary.insert(word.as_ref());
        }
        vocabulary
    }
}

/// Splits a word list on `\n` or `\r\n`. Every line is kept, including a
/// trailing empty one; an empty list yields an empty vocabulary.
pub fn parse_words(contents: &str) -> Vocabulary {
    if contents.is_empty() {
        return Vocabulary::new();
    }
    let terminated = contents.matches('\n').count();
    contents
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            // a `\r` on the final, unterminated segment is part of the word
            if i < terminated {
                line.strip_suffix('\r').unwrap_or(line)
            } else {
                line
            }
        })
        .collect()
}

pub fn join_words(vocabulary: &Vocabulary) -> String {
    vocabulary.words().join("\n")
}

/// Vocabulary shared by request handlers and backed by a newline-delimited file.
#[derive(Debug)]
pub struct VocabularyStore {
    path: PathBuf,
    vocabulary: Mutex<Vocabulary>,
    write_lock: tokio::sync::Mutex<()>,
    // set by inserts, cleared when a write snapshots the words
    dirty: AtomicBool,
}

impl VocabularyStore {
    pub fn new(path: impl Into<PathBuf>, vocabulary: Vocabulary) -> Self {
        VocabularyStore {
            path: path.into(),
            vocabulary: Mutex::new(vocabulary),
            write_lock: tokio::sync::Mutex::new(()),
            dirty: AtomicBool::new(false),
        }
    }

    /// Never fails: a missing or unreadable word list is logged and treated as
    /// empty. Invalid UTF-8 is decoded lossily so the other words survive.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let vocabulary = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let vocabulary = parse_words(&String::from_utf8_lossy(&bytes));
                info!(path = %path.display(), words = vocabulary.len(), "loaded word list");
                vocabulary
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load word list, starting empty");
                Vocabulary::new()
            }
        };
        Self::new(path, vocabulary)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lock().contains(word)
    }

    pub fn words(&self) -> Vec<String> {
        self.lock().words().to_vec()
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        analyze(text, self.lock().words())
    }

    /// Analyzes `text` against the current words, then remembers it if unseen.
    /// Both happen under one lock. Returns whether `text` was added; the caller
    /// is responsible for persisting.
    pub fn analyze_and_record(&self, text: &str) -> (AnalysisResult, bool) {
        let mut vocabulary = self.lock();
        let result = analyze(text, vocabulary.words());
        let added = !text.is_empty() && vocabulary.insert(text);
        if added {
            self.dirty.store(true, Ordering::SeqCst);
        }
        (result, added)
    }

    /// Adds `word` and rewrites the word list. Returns `Ok(false)` without
    /// touching the file if the word is already known.
    pub async fn append(&self, word: &str) -> Result<bool, StoreError> {
        if word.is_empty() {
            return Ok(false);
        }
        let added = {
            let mut vocabulary = self.lock();
            let added = vocabulary.insert(word);
            if added {
                self.dirty.store(true, Ordering::SeqCst);
            }
            added
        };
        if !added {
            return Ok(false);
        }
        match self.persist().await {
            Ok(()) => debug!(path = %self.path.display(), %word, "stored word list"),
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to store word list");
                return Err(e);
            }
        }
        Ok(true)
    }

    /// True while some inserted word has not yet been handed to a write.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Persists only if words were added since the last write. Returns
    /// whether the file was rewritten.
    pub async fn flush(&self) -> Result<bool, StoreError> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.persist().await?;
        Ok(true)
    }

    /// Rewrites the whole word list with the current words. Writes are
    /// serialized and each one snapshots the words after taking its turn, so
    /// the file never goes back to an older state.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let contents = {
            let vocabulary = self.lock();
            self.dirty.store(false, Ordering::SeqCst);
            join_words(&vocabulary)
        };

        let result = self.write_atomically(contents).await;
        if result.is_err() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        result
    }

    async fn write_atomically(&self, contents: String) -> Result<(), StoreError> {
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, contents)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Persists in the background; the outcome is only logged.
    pub fn spawn_persist(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            match store.persist().await {
                Ok(()) => debug!(path = %store.path.display(), "stored word list"),
                Err(e) => error!(path = %store.path.display(), error = %e, "failed to store word list"),
            }
        })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "words".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn lock(&self) -> MutexGuard<'_, Vocabulary> {
        // the vocabulary is only ever appended to, so a poisoned guard is still consistent
        self.vocabulary.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
