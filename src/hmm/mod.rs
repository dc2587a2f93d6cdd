pub mod bigram;
pub mod counts;
pub mod matrix;
pub mod model;
pub mod smoothing;
pub mod tagger;
pub mod trainer;
pub mod vocab;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::dataset::{tokenize, Sequence};

use self::bigram::{BigramModel, BigramTagger};
use self::tagger::{Space, Tagger};

/// Tags every line independently. Results keep the input order.
#[cfg(feature = "parallel")]
pub fn tag_all<S: AsRef<str> + Sync>(model: &BigramModel, lines: &[S], space: Space) -> Vec<Sequence> {
    lines
        .par_iter()
        .map_init(
            || BigramTagger::new(model, space),
            |tagger, line| tagger.tag(&tokenize(line.as_ref())),
        )
        .collect()
}

/// Tags every line independently. Results keep the input order.
#[cfg(not(feature = "parallel"))]
pub fn tag_all<S: AsRef<str> + Sync>(model: &BigramModel, lines: &[S], space: Space) -> Vec<Sequence> {
    let mut tagger = BigramTagger::new(model, space);
    lines
        .iter()
        .map(|line| tagger.tag(&tokenize(line.as_ref())))
        .collect()
}
