//! Estimators turning raw count matrices into row-stochastic probability
//! matrices.
//!
//! Every policy keeps the same contract: a row whose counts sum to zero comes
//! out all-zero, every other row sums to one.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use super::counts::CountMatrix;
use super::matrix::Matrix;
use crate::errors::{Error, Result};

pub type ProbMatrix = Matrix<f64>;

/// Absolute discount used by the Kneser-Ney style policies.
pub const DEFAULT_DISCOUNT: f64 = 0.75;

pub trait Smoothing: Send + Sync {
    fn smooth(&self, counts: &CountMatrix) -> ProbMatrix;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SmoothingKind {
    /// Discount every seen cell, redistribute the mass over all columns.
    #[default]
    #[serde(rename = "kneser-ney")]
    KneserNey,
    /// Discount every seen cell, add a unit of mass over unseen columns only.
    #[serde(rename = "backoff")]
    Backoff,
    /// Add one to every cell.
    #[serde(rename = "laplace")]
    Laplace,
}

impl SmoothingKind {
    pub fn build(self, discount: f64) -> Box<dyn Smoothing> {
        match self {
            Self::KneserNey => Box::new(KneserNey {
                discount,
                target: Target::All,
            }),
            Self::Backoff => Box::new(KneserNey {
                discount,
                target: Target::Unseen,
            }),
            Self::Laplace => Box::new(Laplace),
        }
    }
}

impl FromStr for SmoothingKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kneser-ney" | "kn" => Ok(Self::KneserNey),
            "backoff" => Ok(Self::Backoff),
            "laplace" => Ok(Self::Laplace),
            _ => Err(Error::invalid_argument(format!("unknown smoothing: {s}"))),
        }
    }
}

impl Display for SmoothingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::KneserNey => "kneser-ney",
            Self::Backoff => "backoff",
            Self::Laplace => "laplace",
        })
    }
}

/// Columns that receive a row's discounted mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    All,
    Unseen,
}

/// Discount-and-redistribute estimator.
///
/// Each seen cell loses `discount`. Target columns then receive a share of
/// the redistributed mass in proportion to their novelty weight, i.e. the
/// number of rows in which the column was seen. A column seen nowhere gets
/// weight 1 so the redistribution target is never empty.
///
/// Over all columns the redistributed mass is what the discount removed, so
/// the row keeps its total. Over unseen columns only (backoff) a row with any
/// support hands out a unit of mass instead, and the discount scales nothing
/// but the seen cells.
#[derive(Debug, Clone, Copy)]
pub struct KneserNey {
    discount: f64,
    target: Target,
}

impl KneserNey {
    pub fn new(discount: f64) -> Self {
        Self {
            discount,
            target: Target::All,
        }
    }

    pub fn backoff(discount: f64) -> Self {
        Self {
            discount,
            target: Target::Unseen,
        }
    }
}

/// Number of rows with a nonzero count, per column, floored at one.
fn novelty_weights(counts: &CountMatrix) -> Vec<f64> {
    let mut weights = vec![0.0; counts.num_cols()];
    for row in counts.rows() {
        for (w, &c) in weights.iter_mut().zip(row) {
            if c > 0 {
                *w += 1.0;
            }
        }
    }
    for w in weights.iter_mut().filter(|w| **w == 0.0) {
        *w = 1.0;
    }
    weights
}

/// Divides a row by its sum. A zero-sum row is left as zeros.
fn normalize(row: &mut [f64]) {
    let sum: f64 = row.iter().sum();
    if sum > 0.0 {
        row.iter_mut().for_each(|x| *x /= sum);
    } else {
        row.iter_mut().for_each(|x| *x = 0.0);
    }
}

impl Smoothing for KneserNey {
    fn smooth(&self, counts: &CountMatrix) -> ProbMatrix {
        let weights = novelty_weights(counts);
        let mut probs = ProbMatrix::zeros(counts.num_rows(), counts.num_cols());
        let mut continuation = vec![0.0; counts.num_cols()];

        for (r, row) in counts.rows().enumerate() {
            let support = row.iter().filter(|&&c| c > 0).count();
            let mass = match self.target {
                Target::All => support as f64 * self.discount,
                Target::Unseen if support > 0 => 1.0,
                Target::Unseen => 0.0,
            };

            for ((cont, &w), &c) in continuation.iter_mut().zip(&weights).zip(row) {
                *cont = match self.target {
                    Target::Unseen if c > 0 => 0.0,
                    _ => w,
                };
            }
            let total: f64 = continuation.iter().sum();

            // Discount first, then hand `mass` back across the target columns.
            let out = probs.row_mut(r);
            for ((p, &c), &cont) in out.iter_mut().zip(row).zip(&continuation) {
                *p = if c > 0 { c as f64 - self.discount } else { 0.0 };
                if total > 0.0 {
                    *p += mass * cont / total;
                }
            }
            normalize(out);
        }
        probs
    }
}

/// Add-one estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Laplace;

impl Smoothing for Laplace {
    fn smooth(&self, counts: &CountMatrix) -> ProbMatrix {
        let mut probs = ProbMatrix::zeros(counts.num_rows(), counts.num_cols());
        for (r, row) in counts.rows().enumerate() {
            if row.iter().all(|&c| c == 0) {
                continue;
            }
            let out = probs.row_mut(r);
            for (p, &c) in out.iter_mut().zip(row) {
                *p = c as f64 + 1.0;
            }
            normalize(out);
        }
        probs
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn counts(rows: &[&[u32]]) -> CountMatrix {
        let cols = rows[0].len();
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect(), cols).unwrap()
    }

    // Transition counts of "time/NOUN flies/VERB" + "flies/NOUN like/VERB arrows/NOUN"
    // over the tags </s> <s> NOUN VERB.
    fn transitions() -> CountMatrix {
        counts(&[&[0, 0, 0, 0], &[0, 0, 2, 0], &[1, 0, 0, 2], &[1, 0, 1, 0]])
    }

    fn assert_row(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn novelty_weight_floor() {
        assert_eq!(novelty_weights(&transitions()), [2.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn kneser_ney_rows() {
        let p = KneserNey::new(DEFAULT_DISCOUNT).smooth(&transitions());
        assert_row(p.row(0), &[0.0, 0.0, 0.0, 0.0]);
        assert_row(p.row(1), &[0.125, 0.0625, 0.75, 0.0625]);
        assert_row(p.row(2), &[0.25, 1.0 / 12.0, 1.0 / 6.0, 0.5]);
        assert_row(p.row(3), &[0.375, 0.125, 0.375, 0.125]);
    }

    #[test]
    fn backoff_rows() {
        let p = KneserNey::backoff(DEFAULT_DISCOUNT).smooth(&transitions());
        assert_row(p.row(0), &[0.0, 0.0, 0.0, 0.0]);
        assert_row(p.row(1), &[2.0 / 9.0, 1.0 / 9.0, 5.0 / 9.0, 1.0 / 9.0]);
        assert_row(p.row(2), &[0.1, 2.0 / 15.0, 4.0 / 15.0, 0.5]);
        assert_row(p.row(3), &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 6.0, 1.0 / 3.0]);
    }

    #[test]
    fn backoff_saturated_row_keeps_mass() {
        let p = KneserNey::backoff(DEFAULT_DISCOUNT).smooth(&counts(&[&[1, 3]]));
        assert_row(p.row(0), &[0.25 / 2.5, 2.25 / 2.5]);
    }

    #[test]
    fn rows_are_stochastic() {
        let c = counts(&[&[5, 0, 1, 0, 0], &[0, 0, 0, 0, 0], &[0, 9, 0, 0, 1], &[1, 1, 1, 1, 1]]);
        for kind in [SmoothingKind::KneserNey, SmoothingKind::Backoff, SmoothingKind::Laplace] {
            let p = kind.build(DEFAULT_DISCOUNT).smooth(&c);
            for (r, row) in p.rows().enumerate() {
                assert!(row.iter().all(|x| x.is_finite() && *x >= 0.0), "{kind}");
                let sum: f64 = row.iter().sum();
                if r == 1 {
                    assert_eq!(sum, 0.0, "{kind}");
                } else {
                    assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn unseen_cells_get_mass() {
        let p = KneserNey::new(DEFAULT_DISCOUNT).smooth(&transitions());
        assert!(p.row(2).iter().all(|&x| x > 0.0));
    }

    #[test]
    fn zero_discount_is_relative_frequency() {
        let p = KneserNey::new(0.0).smooth(&counts(&[&[1, 3, 0]]));
        assert_row(p.row(0), &[0.25, 0.75, 0.0]);
    }

    #[test]
    fn laplace_adds_one() {
        let p = Laplace.smooth(&counts(&[&[1, 0, 2], &[0, 0, 0]]));
        assert_row(p.row(0), &[2.0 / 6.0, 1.0 / 6.0, 3.0 / 6.0]);
        assert_row(p.row(1), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn parse_kind() {
        assert_eq!("laplace".parse::<SmoothingKind>().unwrap(), SmoothingKind::Laplace);
        assert_eq!("kn".parse::<SmoothingKind>().unwrap(), SmoothingKind::KneserNey);
        assert!("good-turing".parse::<SmoothingKind>().is_err());
        assert_eq!(SmoothingKind::Backoff.to_string(), "backoff");
    }
}
