//! Bigram tag model and its text layout.
//!
//! ```text
//! <number of tags>
//! <number of words>
//! <tag> <tag> ...
//! <word> <word> ...
//! <transition row for tag 0>      one line per tag, one float per tag
//! ...
//! <emission row for tag 0>        one line per tag, one float per word
//! ...
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use serde::Serialize;

use crate::errors::{Error, Result};
use crate::hmm::{
    matrix::Matrix,
    model::Model,
    smoothing::ProbMatrix,
    tagger::{Space, Tagger},
    vocab::{BOS, EOS, UNK},
};
use crate::quark::{Quark, StringTable};

use super::tagger::BigramTagger;

/// Transition and emission probabilities over a fixed tag and word alphabet.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BigramModel {
    tags: Quark,
    words: Quark,
    /// `[prev tag][tag]`
    transition: ProbMatrix,
    /// `[tag][word]`
    emission: ProbMatrix,
    #[serde(skip)]
    bos: usize,
    #[serde(skip)]
    eos: usize,
    #[serde(skip)]
    unk: usize,
}

impl BigramModel {
    /// Assembles a model, checking that the matrices fit the alphabets and
    /// that the reserved symbols are present.
    pub fn new(
        tags: Quark,
        words: Quark,
        transition: ProbMatrix,
        emission: ProbMatrix,
    ) -> Result<Self> {
        if !tags.is_unique() || !words.is_unique() {
            return Err(Error::invalid_model("duplicate entry in the tag or word list"));
        }
        let l = tags.len();
        if transition.num_rows() != l || transition.num_cols() != l {
            return Err(Error::invalid_model(format!(
                "transition matrix is {}x{}, expected {l}x{l}",
                transition.num_rows(),
                transition.num_cols()
            )));
        }
        if emission.num_rows() != l || emission.num_cols() != words.len() {
            return Err(Error::invalid_model(format!(
                "emission matrix is {}x{}, expected {l}x{}",
                emission.num_rows(),
                emission.num_cols(),
                words.len()
            )));
        }
        let bos = tags
            .to_id(BOS)
            .ok_or_else(|| Error::invalid_model(format!("tag list lacks {BOS}")))?;
        let eos = tags
            .to_id(EOS)
            .ok_or_else(|| Error::invalid_model(format!("tag list lacks {EOS}")))?;
        let unk = words
            .to_id(UNK)
            .ok_or_else(|| Error::invalid_model(format!("word list lacks {UNK}")))?;
        Ok(Self {
            tags,
            words,
            transition,
            emission,
            bos,
            eos,
            unk,
        })
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    pub fn transition(&self) -> &ProbMatrix {
        &self.transition
    }

    pub fn emission(&self) -> &ProbMatrix {
        &self.emission
    }

    pub fn bos(&self) -> usize {
        self.bos
    }

    pub fn eos(&self) -> usize {
        self.eos
    }

    /// Index of the word used for emission lookup; unseen tokens map to the sentinel.
    pub fn word_id(&self, token: &str) -> usize {
        self.words.to_id(token).unwrap_or(self.unk)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::read(BufReader::new(File::open(path)?))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        self.write(&mut w)?;
        w.flush()?;
        Ok(())
    }

    pub fn write<W: Write>(&self, mut w: W) -> Result<()> {
        writeln!(w, "{}", self.tags.len())?;
        writeln!(w, "{}", self.words.len())?;
        writeln!(w, "{}", self.tags.as_slice().join(" "))?;
        writeln!(w, "{}", self.words.as_slice().join(" "))?;
        for row in self.transition.rows().chain(self.emission.rows()) {
            write_row(&mut w, row)?;
        }
        Ok(())
    }

    /// Reads a model, failing on any disagreement between the declared
    /// sizes and the actual content.
    pub fn read<R: BufRead>(r: R) -> Result<Self> {
        let mut lines = r.lines().enumerate();
        let mut next_line = |what: &str| -> Result<(usize, String)> {
            match lines.next() {
                Some((i, line)) => Ok((i + 1, line?)),
                None => Err(Error::invalid_model(format!("unexpected end of file, expected {what}"))),
            }
        };

        let num_tags = parse_count(next_line("tag count")?)?;
        let num_words = parse_count(next_line("word count")?)?;

        let (_, line) = next_line("tag list")?;
        let tags: Vec<String> = line.split_whitespace().map(String::from).collect();
        if tags.len() != num_tags {
            return Err(Error::invalid_model(format!(
                "declared {num_tags} tags, found {}",
                tags.len()
            )));
        }
        let (_, line) = next_line("word list")?;
        let words: Vec<String> = line.split_whitespace().map(String::from).collect();
        if words.len() != num_words {
            return Err(Error::invalid_model(format!(
                "declared {num_words} words, found {}",
                words.len()
            )));
        }

        let mut read_matrix = |name: &str, cols: usize| -> Result<ProbMatrix> {
            let mut rows = Vec::with_capacity(num_tags);
            for _ in 0..num_tags {
                let (no, line) = next_line(name)?;
                let row = parse_row(&line, no)?;
                if row.len() != cols {
                    return Err(Error::invalid_model(format!(
                        "line {no}: {name} row has {} values, expected {cols}",
                        row.len()
                    )));
                }
                rows.push(row);
            }
            Matrix::from_rows(rows, cols)
                .ok_or_else(|| Error::invalid_model(format!("ragged {name} matrix")))
        };
        let transition = read_matrix("transition", num_tags)?;
        let emission = read_matrix("emission", num_words)?;

        for (i, line) in lines {
            if !line?.trim().is_empty() {
                return Err(Error::invalid_model(format!("line {}: trailing content", i + 1)));
            }
        }

        Self::new(Quark::from(tags), Quark::from(words), transition, emission)
    }
}

fn write_row<W: Write>(w: &mut W, row: &[f64]) -> Result<()> {
    for (i, p) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b" ")?;
        }
        write!(w, "{p:.18e}")?;
    }
    writeln!(w)?;
    Ok(())
}

fn parse_count((no, line): (usize, String)) -> Result<usize> {
    line.trim()
        .parse()
        .map_err(|e| Error::invalid_model(format!("line {no}: bad count {line:?}: {e}")))
}

fn parse_row(line: &str, no: usize) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|s| match s.parse::<f64>() {
            Ok(p) if p.is_finite() && p >= 0.0 => Ok(p),
            Ok(p) => Err(Error::invalid_model(format!("line {no}: {p} is not a probability"))),
            Err(e) => Err(Error::invalid_model(format!("line {no}: bad value {s:?}: {e}"))),
        })
        .collect()
}

impl Model for BigramModel {
    fn tags(&self) -> &Quark {
        &self.tags
    }

    fn words(&self) -> &Quark {
        &self.words
    }

    fn tagger(&self, space: Space) -> impl Tagger + '_ {
        BigramTagger::new(self, space)
    }

    fn dump<W: Write>(&self, w: W) -> Result<()> {
        serde_json::to_writer_pretty(w, self)?;
        Ok(())
    }
}
