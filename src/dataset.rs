use std::{
    convert::TryFrom,
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader},
    str::FromStr,
};

use crate::errors::{Error, Result};
use crate::hmm::vocab::{BOS, EOS};

/// Separates the word from its tag. The last occurrence wins, so words may
/// contain the delimiter themselves.
pub const TAG_DELIMITER: char = '/';

/// Splits an untagged input line into word tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// One tagged sentence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub words: Vec<String>,
    pub tags: Vec<String>,
}

impl Sequence {
    pub fn push(&mut self, word: String, tag: String) {
        self.words.push(word);
        self.tags.push(tag);
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Iterates `(word, tag)` pairs in sentence order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.words
            .iter()
            .map(String::as_str)
            .zip(self.tags.iter().map(String::as_str))
    }

    /// Parses a `word/tag word/tag ...` line. `line_no` is only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let mut seq = Sequence::default();
        for token in tokenize(line) {
            let (word, tag) = token.rsplit_once(TAG_DELIMITER).ok_or_else(|| {
                Error::malformed_corpus(line_no, format!("token {token:?} has no tag delimiter"))
            })?;
            if word.is_empty() || tag.is_empty() {
                return Err(Error::malformed_corpus(
                    line_no,
                    format!("token {token:?} has an empty word or tag"),
                ));
            }
            if tag == BOS || tag == EOS {
                return Err(Error::malformed_corpus(
                    line_no,
                    format!("tag {tag:?} is reserved for sentence boundaries"),
                ));
            }
            seq.push(word.to_string(), tag.to_string());
        }
        Ok(seq)
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (word, tag)) in self.pairs().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{word}{TAG_DELIMITER}{tag}")?;
        }
        Ok(())
    }
}

/// A tagged corpus, one sentence per line.
#[derive(Debug, Default)]
pub struct Dataset {
    pub seqs: Vec<Sequence>,
}

impl Dataset {
    /// Appends every sentence read from `reader`. Blank lines are skipped.
    pub fn read<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                log::debug!("skip blank line {}", i + 1);
                continue;
            }
            self.seqs.push(Sequence::parse(&line, i + 1)?);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn max_length(&self) -> usize {
        self.seqs.iter().map(|x| x.len()).max().unwrap_or_default()
    }

    pub fn total_items(&self) -> usize {
        self.seqs.iter().map(|x| x.len()).sum()
    }
}

impl TryFrom<File> for Dataset {
    type Error = Error;

    fn try_from(f: File) -> Result<Self> {
        let mut ds = Dataset::default();
        ds.read(BufReader::new(f))?;
        Ok(ds)
    }
}

impl FromStr for Dataset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut ds = Dataset::default();
        ds.read(s.as_bytes())?;
        Ok(ds)
    }
}
