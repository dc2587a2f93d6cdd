use crate::dataset::Dataset;
use crate::quark::StringTable;

use super::matrix::Matrix;
use super::vocab::Vocabulary;

pub type CountMatrix = Matrix<u32>;

/// Raw event counts of a corpus, indexed by a finalized [`Vocabulary`].
#[derive(Debug)]
pub struct EventCounts {
    /// `[prev tag][tag]`, boundary transitions included.
    pub transition: CountMatrix,
    /// `[tag][word]`. The sentinel column stays zero, even when the corpus
    /// spells the sentinel out as a word.
    pub emission: CountMatrix,
}

impl EventCounts {
    pub fn count(ds: &Dataset, vocab: &Vocabulary) -> Self {
        let l = vocab.num_tags();
        let mut transition = CountMatrix::zeros(l, l);
        let mut emission = CountMatrix::zeros(l, vocab.num_words());
        let bos = vocab.bos();
        let eos = vocab.eos();
        let unk = vocab.unk();

        for seq in &ds.seqs {
            let mut prev = bos;
            for (word, tag) in seq.pairs() {
                // The vocabulary was built from this very dataset.
                let (Some(t), Some(w)) = (vocab.tags.to_id(tag), vocab.words.to_id(word)) else {
                    continue;
                };
                transition[(prev, t)] += 1;
                if w != unk {
                    emission[(t, w)] += 1;
                }
                prev = t;
            }
            if !seq.is_empty() {
                transition[(prev, eos)] += 1;
            }
        }
        Self {
            transition,
            emission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_events() {
        let ds: Dataset = "time/NOUN flies/VERB\nflies/NOUN like/VERB arrows/NOUN"
            .parse()
            .unwrap();
        let vocab = Vocabulary::build(&ds);
        let counts = EventCounts::count(&ds, &vocab);
        // tags: </s> <s> NOUN VERB
        assert_eq!(counts.transition.row(0), [0, 0, 0, 0]);
        assert_eq!(counts.transition.row(1), [0, 0, 2, 0]);
        assert_eq!(counts.transition.row(2), [1, 0, 0, 2]);
        assert_eq!(counts.transition.row(3), [1, 0, 1, 0]);
        // words: <UNK> arrows flies like time
        assert_eq!(counts.emission.row(2), [0, 1, 1, 0, 1]);
        assert_eq!(counts.emission.row(3), [0, 0, 1, 1, 0]);
        assert_eq!(counts.emission.row(1), [0; 5]);
    }

    #[test]
    fn literal_sentinel_is_not_counted() {
        let ds: Dataset = "<UNK>/X a/Y\na/Y".parse().unwrap();
        let vocab = Vocabulary::build(&ds);
        let counts = EventCounts::count(&ds, &vocab);
        let unk = vocab.unk();
        assert!(counts.emission.rows().all(|row| row[unk] == 0));
        // The token still moves the tag chain: <s> -> X -> Y -> </s>.
        let x = vocab.tags.to_id("X").unwrap();
        let y = vocab.tags.to_id("Y").unwrap();
        assert_eq!(counts.transition[(vocab.bos(), x)], 1);
        assert_eq!(counts.transition[(x, y)], 1);
        assert_eq!(counts.emission.row(x).iter().sum::<u32>(), 0);
    }

    #[test]
    fn start_is_never_a_destination() {
        let ds: Dataset = "a/X b/Y a/X\nb/Y".parse().unwrap();
        let vocab = Vocabulary::build(&ds);
        let counts = EventCounts::count(&ds, &vocab);
        let (bos, eos) = (vocab.bos(), vocab.eos());
        assert!(counts.transition.rows().all(|row| row[bos] == 0));
        assert!(counts.transition.row(eos).iter().all(|&c| c == 0));
    }
}
