pub mod config;
pub mod matcher;
pub mod server;
pub mod vocabulary;

pub use config::Config;
pub use matcher::{AnalysisResult, analyze, analyze_many, compare_lexical, word_value};
pub use server::{AppError, AppState, build_router};
pub use vocabulary::{StoreError, Vocabulary, VocabularyStore, join_words, parse_words};
