use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::dataset::Sequence;
use crate::errors::{Error, Result};

/// Arithmetic domain the decoder multiplies probabilities in.
///
/// `Linear` multiplies raw probabilities and underflows to zero on long
/// sentences. `Log` adds natural logarithms instead; the chosen path only
/// differs where linear scores have underflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    #[default]
    Linear,
    Log,
}

impl Space {
    /// Maps a probability into this space.
    #[inline]
    pub fn from_prob(self, p: f64) -> f64 {
        match self {
            Self::Linear => p,
            Self::Log => p.ln(),
        }
    }

    /// Joint score of two independent events.
    #[inline]
    pub fn combine(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Linear => a * b,
            Self::Log => a + b,
        }
    }

    /// Score of the certain event.
    #[inline]
    pub fn one(self) -> f64 {
        match self {
            Self::Linear => 1.0,
            Self::Log => 0.0,
        }
    }

    /// Score of the impossible event.
    #[inline]
    pub fn zero(self) -> f64 {
        match self {
            Self::Linear => 0.0,
            Self::Log => f64::NEG_INFINITY,
        }
    }
}

impl FromStr for Space {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "log" => Ok(Self::Log),
            _ => Err(Error::invalid_argument(format!("unknown space: {s}"))),
        }
    }
}

impl Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Linear => "linear",
            Self::Log => "log",
        })
    }
}

pub trait Tagger {
    /// Loads a sentence. Tokens outside the word alphabet read the
    /// sentinel's emission column.
    fn set_sentence(&mut self, tokens: &[&str]);
    /// Number of tokens of the loaded sentence.
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Writes the best tag path of the loaded sentence into `labels` and
    /// returns its score.
    ///
    /// # Panics
    ///
    /// Panics if `labels` is shorter than the loaded sentence.
    fn viterbi(&mut self, labels: &mut [usize]) -> f64;
    /// Score of an arbitrary tag path over the loaded sentence, boundary
    /// transitions included. A path of the wrong length or holding an
    /// out-of-range tag index scores as impossible.
    fn score(&self, path: &[usize]) -> f64;
    /// Decodes `tokens` into `word/tag` pairs, keeping the surface tokens.
    fn tag(&mut self, tokens: &[&str]) -> Sequence;
}
