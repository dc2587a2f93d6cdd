use std::{io::Read, time::Instant};

use serde::{Deserialize, Serialize};

use super::{
    bigram::BigramModel,
    counts::EventCounts,
    smoothing::{ProbMatrix, Smoothing, SmoothingKind, DEFAULT_DISCOUNT},
    vocab::Vocabulary,
};
use crate::{
    dataset::Dataset,
    errors::{Error, Result},
};

/// Training parameters. One smoothing policy covers both matrices of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainOpts {
    pub smoothing: SmoothingKind,
    /// Amount subtracted from every seen count by the discounting policies.
    pub discount: f64,
}

impl Default for TrainOpts {
    fn default() -> Self {
        Self {
            smoothing: SmoothingKind::default(),
            discount: DEFAULT_DISCOUNT,
        }
    }
}

impl TrainOpts {
    /// Reads options from JSON. Missing fields keep their defaults.
    pub fn from_json<R: Read>(r: R) -> Result<Self> {
        let opts: Self = serde_json::from_reader(r)?;
        opts.validate()?;
        Ok(opts)
    }

    fn validate(&self) -> Result<()> {
        // Counts are whole numbers, so a discount above one could turn a cell negative.
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(Error::invalid_argument(format!(
                "discount must lie in [0, 1], got {}",
                self.discount
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct Trainer {
    opts: TrainOpts,
}

impl Trainer {
    pub fn new(opts: TrainOpts) -> Result<Self> {
        opts.validate()?;
        Ok(Self { opts })
    }

    pub fn opts(&self) -> &TrainOpts {
        &self.opts
    }

    /// Sets a parameter by name, e.g. `set("discount", "0.5")`.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let mut opts = self.opts.clone();
        match name {
            "smoothing" => opts.smoothing = value.parse()?,
            "discount" => {
                opts.discount = value
                    .parse()
                    .map_err(|e| Error::invalid_argument(format!("discount={value}: {e}")))?
            }
            _ => return Err(Error::invalid_argument(format!("unknown parameter: {name}"))),
        }
        opts.validate()?;
        self.opts = opts;
        Ok(())
    }

    /// Estimates a model from a tagged corpus.
    pub fn train(&self, ds: &Dataset) -> Result<BigramModel> {
        if ds.is_empty() {
            return Err(Error::invalid_argument("training corpus is empty"));
        }
        let begin = Instant::now();
        let vocab = Vocabulary::build(ds);
        log::info!(
            "set data (sentences: {}, items: {}, tags: {}, words: {})",
            ds.len(),
            ds.total_items(),
            vocab.num_tags(),
            vocab.num_words()
        );
        let counts = EventCounts::count(ds, &vocab);

        let smoothing = self.opts.smoothing.build(self.opts.discount);
        let (transition, emission) = estimate(smoothing.as_ref(), &counts);
        log::info!(
            "smoothing: {}, discount: {}, time cost: {:?}",
            self.opts.smoothing,
            self.opts.discount,
            begin.elapsed()
        );
        BigramModel::new(vocab.tags, vocab.words, transition, emission)
    }
}

#[cfg(feature = "parallel")]
fn estimate(smoothing: &dyn Smoothing, counts: &EventCounts) -> (ProbMatrix, ProbMatrix) {
    rayon::join(
        || smoothing.smooth(&counts.transition),
        || smoothing.smooth(&counts.emission),
    )
}

#[cfg(not(feature = "parallel"))]
fn estimate(smoothing: &dyn Smoothing, counts: &EventCounts) -> (ProbMatrix, ProbMatrix) {
    (
        smoothing.smooth(&counts.transition),
        smoothing.smooth(&counts.emission),
    )
}
