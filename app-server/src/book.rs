//! The corpora served by the handler.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Book {
    Bible,
    Quran,
    Torah,
}

impl Book {
    /// Every book, in startup loading order.
    pub const ALL: [Book; 3] = [Book::Bible, Book::Quran, Book::Torah];

    /// Corpus id, also the stem of the data and cache files.
    pub fn id(self) -> &'static str {
        match self {
            Book::Bible => "bible",
            Book::Quran => "quran",
            Book::Torah => "torah",
        }
    }

    /// Display name used in prompt headings.
    pub fn name(self) -> &'static str {
        match self {
            Book::Bible => "Bible",
            Book::Quran => "Quran",
            Book::Torah => "Torah",
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid book \"{0}\": must be bible, quran, or torah")]
pub struct UnknownBook(pub String);

impl FromStr for Book {
    type Err = UnknownBook;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Book::ALL
            .into_iter()
            .find(|book| book.id() == s)
            .ok_or_else(|| UnknownBook(s.to_string()))
    }
}
