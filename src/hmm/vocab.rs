use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::quark::{Quark, StringTable};

/// Sentence-start tag. Implicit predecessor of every sentence's first tag.
pub const BOS: &str = "<s>";
/// Sentence-end tag. Implicit successor of every sentence's last tag.
pub const EOS: &str = "</s>";
/// Word sentinel standing in for every token unseen in training.
pub const UNK: &str = "<UNK>";

/// Tag and word alphabets of a training corpus, finalized in sorted order.
#[derive(Debug)]
pub struct Vocabulary {
    pub tags: Quark,
    pub words: Quark,
    bos: usize,
    eos: usize,
    unk: usize,
}

impl Vocabulary {
    /// Collects every tag and word of `ds`. The boundary tags and the
    /// out-of-vocabulary sentinel are always present.
    pub fn build(ds: &Dataset) -> Self {
        let mut tags: BTreeSet<&str> = [BOS, EOS].into_iter().collect();
        let mut words: BTreeSet<&str> = [UNK].into_iter().collect();
        for (word, tag) in ds.seqs.iter().flat_map(|seq| seq.pairs()) {
            tags.insert(tag);
            words.insert(word);
        }
        let tags = Quark::sorted(tags.into_iter().map(String::from));
        let words = Quark::sorted(words.into_iter().map(String::from));
        // Both alphabets are sorted and always hold the reserved symbols.
        let bos = tags.as_slice().partition_point(|t| t.as_str() < BOS);
        let eos = tags.as_slice().partition_point(|t| t.as_str() < EOS);
        let unk = words.as_slice().partition_point(|w| w.as_str() < UNK);
        Self {
            tags,
            words,
            bos,
            eos,
            unk,
        }
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    pub fn bos(&self) -> usize {
        self.bos
    }

    pub fn eos(&self) -> usize {
        self.eos
    }

    /// Column of the out-of-vocabulary sentinel.
    pub fn unk(&self) -> usize {
        self.unk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabets_are_sorted() {
        let ds: Dataset = "time/NOUN flies/VERB\nflies/NOUN like/VERB arrows/NOUN"
            .parse()
            .unwrap();
        let vocab = Vocabulary::build(&ds);
        assert_eq!(vocab.tags.as_slice(), ["</s>", "<s>", "NOUN", "VERB"]);
        assert_eq!(
            vocab.words.as_slice(),
            ["<UNK>", "arrows", "flies", "like", "time"]
        );
        assert_eq!(vocab.eos(), 0);
        assert_eq!(vocab.bos(), 1);
    }

    #[test]
    fn reserved_indices_follow_sort_order() {
        let ds: Dataset = "!/# ,/$ a/X".parse().unwrap();
        let vocab = Vocabulary::build(&ds);
        assert_eq!(vocab.tags.as_slice(), ["#", "$", "</s>", "<s>", "X"]);
        assert_eq!(vocab.words.as_slice(), ["!", ",", "<UNK>", "a"]);
        assert_eq!((vocab.eos(), vocab.bos(), vocab.unk()), (2, 3, 2));
        assert_eq!(vocab.tags.to_id(BOS), Some(vocab.bos()));
        assert_eq!(vocab.words.to_id(UNK), Some(vocab.unk()));
    }

    #[test]
    fn empty_corpus_keeps_reserved_symbols() {
        let vocab = Vocabulary::build(&Dataset::default());
        assert_eq!(vocab.num_tags(), 2);
        assert_eq!(vocab.num_words(), 1);
    }
}
