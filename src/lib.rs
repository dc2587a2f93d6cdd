//! # hmmtag
//!
//! Bigram hidden Markov model part-of-speech tagger: estimates tag
//! transition and word emission probabilities from a `word/tag` corpus with
//! absolute-discount smoothing, and decodes sentences with Viterbi.
//!
//! ```no_run
//! use hmmtag::{BigramModel, Dataset, Model, Space, Tagger, Trainer};
//!
//! let ds: Dataset = "the/DET dog/NOUN runs/VERB".parse().unwrap();
//! let model = Trainer::default().train(&ds).unwrap();
//! model.save("model.txt").unwrap();
//!
//! let model = BigramModel::from_path("model.txt").unwrap();
//! let mut tagger = model.tagger(Space::Linear);
//! println!("{}", tagger.tag(&["the", "dog", "runs"]));
//! ```

pub mod dataset;
pub mod errors;
pub mod evaluation;
pub mod hmm;
pub mod quark;

pub use dataset::{Dataset, Sequence};
pub use errors::{Error, Result};
pub use evaluation::{Estimation, Evaluation};
pub use hmm::{
    bigram::{BigramModel, BigramTagger},
    model::Model,
    smoothing::SmoothingKind,
    tag_all,
    tagger::{Space, Tagger},
    trainer::{TrainOpts, Trainer},
};
pub use quark::{Quark, StringTable};
