use crate::dataset::Sequence;
use crate::hmm::model::Model;
use crate::hmm::tagger::{Space, Tagger};
use crate::quark::StringTable;

use super::context::ViterbiContext;
use super::model::BigramModel;

/// Viterbi decoder over a [`BigramModel`].
///
/// The model is only read. Each tagger owns its trellis, so independent
/// sentences can be decoded by independent taggers.
pub struct BigramTagger<'a> {
    model: &'a BigramModel,
    ctx: ViterbiContext,
}

impl<'a> BigramTagger<'a> {
    pub fn new(model: &'a BigramModel, space: Space) -> Self {
        let l = model.num_tags();
        let mut ctx = ViterbiContext::new(space, l);
        let transition = model.transition();
        /* Copy the transition scores, boundary rows included. */
        for i in 0..l {
            for j in 0..l {
                ctx.trans[l * i + j] = space.from_prob(transition[(i, j)]);
            }
        }
        for j in 0..l {
            ctx.start[j] = space.from_prob(transition[(model.bos(), j)]);
            ctx.end[j] = space.from_prob(transition[(j, model.eos())]);
        }
        Self { model, ctx }
    }

    pub fn space(&self) -> Space {
        self.ctx.space()
    }
}

impl<'a> Tagger for BigramTagger<'a> {
    fn set_sentence(&mut self, tokens: &[&str]) {
        let l = self.ctx.num_labels;
        let space = self.ctx.space();
        self.ctx.set_num_items(tokens.len());
        self.ctx.reset();

        let emission = self.model.emission();
        for (t, token) in tokens.iter().enumerate() {
            let w = self.model.word_id(token);
            for j in 0..l {
                self.ctx.state[l * t + j] = space.from_prob(emission[(j, w)]);
            }
        }
    }

    fn len(&self) -> usize {
        self.ctx.num_items()
    }

    fn viterbi(&mut self, labels: &mut [usize]) -> f64 {
        self.ctx.viterbi(labels)
    }

    fn score(&self, path: &[usize]) -> f64 {
        self.ctx.score(path)
    }

    fn tag(&mut self, tokens: &[&str]) -> Sequence {
        self.set_sentence(tokens);
        let mut labels = vec![0; tokens.len()];
        let score = self.viterbi(&mut labels);
        if !tokens.is_empty() && score == self.space().zero() {
            log::warn!("no path with nonzero probability for a sentence of {} tokens", tokens.len());
        }

        let tags = self.model.tags();
        let mut seq = Sequence::default();
        for (token, &label) in tokens.iter().zip(&labels) {
            seq.push(token.to_string(), tags.to_str(label).unwrap_or_default().to_string());
        }
        seq
    }
}
