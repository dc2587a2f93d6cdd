use crate::hmm::tagger::Space;

/// Work space of the Viterbi decoder.
///
/// Buffers grow to the longest sentence seen and are reset for each new one,
/// so nothing computed for one sentence leaks into the next.
#[derive(Debug, Default)]
pub(crate) struct ViterbiContext {
    space: Space,

    /**
     * The total number of distinct tags (L), boundary tags included.
     */
    pub num_labels: usize,

    /**
     * The number of items (T) in the sentence.
     */
    num_items: usize,

    /**
     * The number of items the buffers can hold.
     */
    cap_items: usize,

    /**
     * Start scores.
     *  This is a [L] vector whose element [j] is the score of moving from
     *  the sentence-start tag to #j.
     */
    pub start: Vec<f64>,

    /**
     * End scores.
     *  This is a [L] vector whose element [i] is the score of moving from
     *  #i to the sentence-end tag.
     */
    pub end: Vec<f64>,

    /**
     * Transition scores.
     *  This is a [L][L] matrix whose element [i][j] is the score of tag #j
     *  immediately following tag #i.
     */
    pub trans: Vec<f64>,

    /**
     * State scores.
     *  This is a [T][L] matrix whose element [t][l] is the score of tag #l
     *  emitting the word at #t.
     */
    pub state: Vec<f64>,

    /**
     * Trellis.
     *  This is a [T][L] matrix whose element [t][l] is the score of the best
     *  tag path that starts at BOS and ends with tag #l at #t.
     */
    trellis: Vec<f64>,

    /**
     * Backward edges.
     *  This is a [T][L] matrix whose element [t][j] is the tag #i at #t-1
     *  on the best path arriving at (t, j).
     */
    backward_edge: Vec<usize>,
}

impl ViterbiContext {
    pub fn new(space: Space, num_labels: usize) -> Self {
        let zero = space.zero();
        Self {
            space,
            num_labels,
            start: vec![zero; num_labels],
            end: vec![zero; num_labels],
            trans: vec![zero; num_labels * num_labels],
            ..Default::default()
        }
    }

    pub fn space(&self) -> Space {
        self.space
    }

    pub fn num_items(&self) -> usize {
        self.num_items
    }

    pub fn set_num_items(&mut self, n: usize) {
        let l = self.num_labels;
        self.num_items = n;
        if self.cap_items < n {
            self.state.resize(n * l, 0.0);
            self.trellis.resize(n * l, 0.0);
            self.backward_edge.resize(n * l, 0);
            self.cap_items = n;
        }
    }

    /// Clears the per-sentence tables.
    pub fn reset(&mut self) {
        let zero = self.space.zero();
        self.state.iter_mut().for_each(|x| *x = zero);
        self.trellis.iter_mut().for_each(|x| *x = zero);
        self.backward_edge.iter_mut().for_each(|x| *x = 0);
    }

    pub fn viterbi(&mut self, labels: &mut [usize]) -> f64 {
        let n = self.num_items;
        let l = self.num_labels;
        let space = self.space;
        assert!(labels.len() >= n, "label buffer shorter than the sentence");
        if n == 0 || l == 0 {
            return space.one();
        }

        /* Compute the scores at (0, *): emission times the start transition. */
        for j in 0..l {
            self.trellis[j] = space.combine(self.state[j], self.start[j]);
        }

        /* Compute the scores at (t, *). */
        for t in 1..n {
            let (prev, curr) = self.trellis.split_at_mut(l * t);
            let prev = &prev[l * (t - 1)..];
            for j in 0..l {
                /* Ties keep the lowest predecessor index. */
                let mut argmax = 0;
                let mut max_score = space.combine(prev[0], self.trans[j]);
                for i in 1..l {
                    /* Transit from (t-1, i) to (t, j). */
                    let score = space.combine(prev[i], self.trans[l * i + j]);
                    if score > max_score {
                        max_score = score;
                        argmax = i;
                    }
                }
                /* Backward link (#t, #j) -> (#t-1, #i). */
                self.backward_edge[l * t + j] = argmax;
                /* Add the state score on (t, j). */
                curr[j] = space.combine(max_score, self.state[l * t + j]);
            }
        }

        /* Find the node (#T-1, #i) that reaches EOS with the maximum score. */
        let last = &self.trellis[l * (n - 1)..l * n];
        labels[n - 1] = 0;
        let mut max_score = space.combine(last[0], self.end[0]);
        for i in 1..l {
            let score = space.combine(last[i], self.end[i]);
            if score > max_score {
                max_score = score;
                labels[n - 1] = i;
            }
        }

        /* Tag labels by tracing the backward links. */
        for t in (0..n - 1).rev() {
            let j = labels[t + 1];
            labels[t] = self.backward_edge[l * (t + 1) + j];
        }

        max_score
    }

    /// Score of `labels`, multiplied in the same order as [`Self::viterbi`]
    /// so the best path reproduces the Viterbi score exactly. A path of the
    /// wrong length or naming an unknown tag is impossible.
    pub fn score(&self, labels: &[usize]) -> f64 {
        let n = self.num_items;
        let l = self.num_labels;
        let space = self.space;
        if labels.len() != n || labels.iter().any(|&j| j >= l) {
            return space.zero();
        }
        let Some(&first) = labels.first() else {
            return space.one();
        };

        let mut i = first;
        let mut r = space.combine(self.state[i], self.start[i]);
        for (t, &j) in labels.iter().enumerate().skip(1) {
            r = space.combine(r, self.trans[l * i + j]);
            r = space.combine(r, self.state[l * t + j]);
            i = j;
        }
        space.combine(r, self.end[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two real tags (0, 1); every transition allowed.
    fn context(space: Space) -> ViterbiContext {
        let mut ctx = ViterbiContext::new(space, 2);
        for (dst, p) in ctx.start.iter_mut().zip([0.6, 0.4]) {
            *dst = space.from_prob(p);
        }
        for (dst, p) in ctx.end.iter_mut().zip([0.5, 0.5]) {
            *dst = space.from_prob(p);
        }
        for (dst, p) in ctx.trans.iter_mut().zip([0.7, 0.3, 0.4, 0.6]) {
            *dst = space.from_prob(p);
        }
        ctx.set_num_items(3);
        ctx.reset();
        for (dst, p) in ctx.state.iter_mut().zip([0.5, 0.1, 0.4, 0.3, 0.1, 0.6]) {
            *dst = space.from_prob(p);
        }
        ctx
    }

    fn brute_force(ctx: &ViterbiContext) -> (Vec<usize>, f64) {
        let mut best = (vec![], f64::MIN);
        for code in 0..8usize {
            let path: Vec<usize> = (0..3).map(|t| (code >> (2 - t)) & 1).collect();
            let s = ctx.score(&path);
            if s > best.1 {
                best = (path, s);
            }
        }
        best
    }

    #[test]
    fn init() {
        let mut ctx = ViterbiContext::new(Space::Linear, 9);
        assert_eq!(ctx.num_items(), 0);
        ctx.set_num_items(12);
        assert_eq!(ctx.cap_items, 12);
        ctx.set_num_items(4);
        assert_eq!(ctx.cap_items, 12);
        assert_eq!(ctx.num_items(), 4);
    }

    #[test]
    fn matches_exhaustive_search() {
        for space in [Space::Linear, Space::Log] {
            let mut ctx = context(space);
            let mut labels = vec![0; 3];
            let score = ctx.viterbi(&mut labels);
            let (path, best) = brute_force(&ctx);
            assert_eq!(labels, path, "{space}");
            assert_eq!(score, best, "{space}");
        }
    }

    #[test]
    fn ties_keep_first() {
        let mut ctx = ViterbiContext::new(Space::Linear, 3);
        ctx.start.fill(1.0 / 3.0);
        ctx.end.fill(1.0);
        ctx.trans.fill(1.0 / 3.0);
        ctx.set_num_items(4);
        ctx.reset();
        ctx.state.fill(0.5);
        let mut labels = vec![9; 4];
        ctx.viterbi(&mut labels);
        assert_eq!(labels, [0, 0, 0, 0]);
    }

    #[test]
    fn all_zero_is_not_an_error() {
        let mut ctx = ViterbiContext::new(Space::Linear, 3);
        ctx.set_num_items(2);
        ctx.reset();
        let mut labels = vec![9; 2];
        assert_eq!(ctx.viterbi(&mut labels), 0.0);
        assert_eq!(labels, [0, 0]);
    }

    #[test]
    fn invalid_paths_score_zero() {
        for space in [Space::Linear, Space::Log] {
            let ctx = context(space);
            assert_eq!(ctx.score(&[0, 1, 2]), space.zero(), "{space}");
            assert_eq!(ctx.score(&[0, 9, 0]), space.zero(), "{space}");
            assert_eq!(ctx.score(&[0, 1]), space.zero(), "{space}");
            assert!(ctx.score(&[0, 1, 1]) > space.zero(), "{space}");
        }
    }

    #[test]
    fn empty_sentence() {
        let mut ctx = context(Space::Linear);
        ctx.set_num_items(0);
        assert_eq!(ctx.viterbi(&mut []), 1.0);
        assert_eq!(ctx.score(&[]), 1.0);
    }
}
