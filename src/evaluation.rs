//! Tag accuracy of a decoder output against a reference file of the same shape.

use std::{collections::BTreeMap, fmt::Display, io::BufRead};

use crate::dataset::{tokenize, TAG_DELIMITER};
use crate::errors::{Error, Result};

/// Label-wise performance values.
#[derive(Debug, Default)]
struct LabelMeasure {
    /// Number of correct predictions.
    num_correct: usize,
    /** Number of occurrences of the label in the gold-standard data. */
    num_observation: usize,
    /** Number of predictions. */
    num_prediction: usize,
    /** Precision. */
    precision: f64,
    /** Recall. */
    recall: f64,
    /** F1 score. */
    fmeasure: f64,
}

/// An overall performance values.
#[derive(Debug, Default)]
pub struct Evaluation {
    /** Array of label-wise evaluations. */
    tbl: BTreeMap<String, LabelMeasure>,

    /** Number of correctly predicted items. */
    item_total_correct: usize,
    /** Total number of items. */
    item_total_num: usize,
    /** Item-level accuracy. */
    item_accuracy: f64,

    /** Number of correctly predicted instances. */
    inst_total_correct: usize,
    /** Total number of instances. */
    inst_total_num: usize,
    /** Instance-level accuracy. */
    inst_accuracy: f64,

    /** Macro-averaged precision. */
    macro_precision: f64,
    /** Macro-averaged recall. */
    macro_recall: f64,
    /** Macro-averaged F1 score. */
    macro_fmeasure: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimation {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Tag part of a `word/tag` token; a token without delimiter is its own tag.
fn tag_of(token: &str) -> &str {
    token
        .rsplit_once(TAG_DELIMITER)
        .map_or(token, |(_, tag)| tag)
}

impl Evaluation {
    /// Scores two line-aligned `word/tag` streams. Fails without scoring
    /// anything if their line counts differ.
    pub fn from_readers<O: BufRead, R: BufRead>(output: O, reference: R) -> Result<Self> {
        let output = output.lines().collect::<Result<Vec<_>, _>>()?;
        let reference = reference.lines().collect::<Result<Vec<_>, _>>()?;
        if output.len() != reference.len() {
            return Err(Error::LineCountMismatch {
                output: output.len(),
                reference: reference.len(),
            });
        }
        let mut evaluation = Self::default();
        for (o, r) in output.iter().zip(&reference) {
            evaluation.accumulate_line(o, r);
        }
        evaluation.evaluate();
        Ok(evaluation)
    }

    /// Compares one output line with its reference line, position by position.
    pub fn accumulate_line(&mut self, output: &str, reference: &str) {
        let prediction: Vec<&str> = tokenize(output).into_iter().map(tag_of).collect();
        let reference: Vec<&str> = tokenize(reference).into_iter().map(tag_of).collect();
        self.accumulate(&reference, &prediction);
    }

    /// Accumulates one sentence. Every reference position counts; a missing
    /// prediction is a mismatch.
    pub fn accumulate(&mut self, reference: &[&str], prediction: &[&str]) {
        let mut matched = 0;
        for (i, r) in reference.iter().enumerate() {
            self.tbl.entry(r.to_string()).or_default().num_observation += 1;
            if let Some(p) = prediction.get(i) {
                self.tbl.entry(p.to_string()).or_default().num_prediction += 1;
                if r == p {
                    self.tbl.entry(r.to_string()).or_default().num_correct += 1;
                    matched += 1;
                }
            }
            self.item_total_num += 1;
        }
        self.item_total_correct += matched;

        if matched == reference.len() && prediction.len() == reference.len() {
            self.inst_total_correct += 1;
        }
        self.inst_total_num += 1;
    }

    pub fn evaluate(&mut self) -> Estimation {
        self.macro_precision = 0.0;
        self.macro_recall = 0.0;
        self.macro_fmeasure = 0.0;
        let mut num_labels = 0;
        for lev in self.tbl.values_mut() {
            if lev.num_observation == 0 {
                continue;
            }
            num_labels += 1;

            lev.precision = 0.0;
            lev.recall = 0.0;
            lev.fmeasure = 0.0;

            if lev.num_prediction > 0 {
                lev.precision = lev.num_correct as f64 / lev.num_prediction as f64;
            }
            lev.recall = lev.num_correct as f64 / lev.num_observation as f64;
            if lev.precision + lev.recall > 0.0 {
                lev.fmeasure = lev.precision * lev.recall * 2.0 / (lev.precision + lev.recall);
            }
            self.macro_precision += lev.precision;
            self.macro_recall += lev.recall;
            self.macro_fmeasure += lev.fmeasure;
        }

        if num_labels > 0 {
            self.macro_precision /= num_labels as f64;
            self.macro_recall /= num_labels as f64;
            self.macro_fmeasure /= num_labels as f64;
        }
        if self.item_total_num > 0 {
            self.item_accuracy = self.item_total_correct as f64 / self.item_total_num as f64;
        }
        if self.inst_total_num > 0 {
            self.inst_accuracy = self.inst_total_correct as f64 / self.inst_total_num as f64;
        }
        Estimation {
            accuracy: self.item_accuracy,
            precision: self.macro_precision,
            recall: self.macro_recall,
        }
    }

    /// Matched tags over reference tags. Valid after [`Self::evaluate`].
    pub fn accuracy(&self) -> f64 {
        self.item_accuracy
    }
}

impl Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Performance by label (#match, #model, #ref) (precision, recall, F1):")?;
        for (label, lev) in &self.tbl {
            if lev.num_observation == 0 {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) (******, ******, ******)",
                    label, lev.num_correct, lev.num_prediction, lev.num_observation
                )?;
            } else {
                writeln!(
                    f,
                    "\t{}: ({}, {}, {}) ({:.4}, {:.4}, {:.4})",
                    label,
                    lev.num_correct,
                    lev.num_prediction,
                    lev.num_observation,
                    lev.precision,
                    lev.recall,
                    lev.fmeasure
                )?;
            }
        }
        writeln!(
            f,
            "Macro-average precision, recall, F1: ({}, {}, {})",
            self.macro_precision, self.macro_recall, self.macro_fmeasure
        )?;
        writeln!(
            f,
            "Item accuracy: {}/{} => {}",
            self.item_total_correct, self.item_total_num, self.item_accuracy
        )?;
        writeln!(
            f,
            "Sequence accuracy: {}/{} => {}",
            self.inst_total_correct, self.inst_total_num, self.inst_accuracy
        )
    }
}
