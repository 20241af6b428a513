//! Attribute-set summarizer.
//!
//! Enumerates attribute-value combinations up to a configured order,
//! scores each by outlier support and risk ratio against the unmatched
//! population, filters by the configured minimums, and ranks.

use std::collections::HashMap;

use st_common::{Error, Result};
use st_config::SummarizerConfig;
use st_frame::DataFrame;

use super::{AttributeValue, Explanation, ExplanationItem, Summarizer};

/// Finite stand-in for an unbounded risk ratio (no unmatched outliers).
/// Keeps artifact JSON lossless; serde_json lowers infinities to null.
pub const MAX_RISK_RATIO: f64 = 1e6;

pub struct AttributeSetSummarizer {
    config: SummarizerConfig,
}

impl AttributeSetSummarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self { config }
    }
}

impl Summarizer for AttributeSetSummarizer {
    fn summarize(
        &mut self,
        frame: &DataFrame,
        outlier_column: &str,
        attributes: &[String],
    ) -> Result<Explanation> {
        let mask = frame
            .flag_mask(outlier_column)
            .map_err(|e| Error::Summarization(e.to_string()))?;
        let columns: Vec<&[String]> = attributes
            .iter()
            .map(|a| {
                frame
                    .string_column(a)
                    .map_err(|e| Error::Summarization(e.to_string()))
            })
            .collect::<Result<_>>()?;

        let num_rows = frame.num_rows();
        let num_outliers = mask.iter().filter(|m| **m).count();
        let num_inliers = num_rows - num_outliers;

        if num_outliers == 0 {
            return Ok(Explanation {
                items: Vec::new(),
                num_outliers,
                num_inliers,
            });
        }

        // (attribute index, value) combination -> (matched outliers, matched rows)
        let mut counts: HashMap<Vec<(usize, &str)>, (usize, usize)> = HashMap::new();
        let max_order = self.config.max_order.min(attributes.len());
        for order in 1..=max_order {
            for_each_combination(attributes.len(), order, &mut |indices| {
                for row in 0..num_rows {
                    let key: Vec<(usize, &str)> = indices
                        .iter()
                        .map(|i| (*i, columns[*i][row].as_str()))
                        .collect();
                    let entry = counts.entry(key).or_insert((0, 0));
                    if mask[row] {
                        entry.0 += 1;
                    }
                    entry.1 += 1;
                }
            });
        }

        let mut items: Vec<ExplanationItem> = counts
            .into_iter()
            .filter_map(|(key, (matched_outliers, matched_rows))| {
                if matched_outliers == 0 {
                    return None;
                }
                let support = matched_outliers as f64 / num_outliers as f64;
                let ratio = risk_ratio(matched_outliers, matched_rows, num_outliers, num_rows);
                if support < self.config.min_support || ratio < self.config.min_ratio {
                    return None;
                }
                let matcher = key
                    .into_iter()
                    .map(|(index, value)| AttributeValue {
                        attribute: attributes[index].clone(),
                        value: value.to_string(),
                    })
                    .collect();
                Some(ExplanationItem {
                    matcher,
                    support,
                    ratio,
                    num_records: matched_rows,
                })
            })
            .collect();

        // Rank by ratio, then support, then precision (fewer matched rows
        // for the same outlier coverage), then smaller combinations.
        items.sort_by(|a, b| {
            b.ratio
                .total_cmp(&a.ratio)
                .then(b.support.total_cmp(&a.support))
                .then(a.num_records.cmp(&b.num_records))
                .then(a.matcher.len().cmp(&b.matcher.len()))
                .then(a.matcher.cmp(&b.matcher))
        });

        Ok(Explanation {
            items,
            num_outliers,
            num_inliers,
        })
    }
}

/// Outlier rate among matched rows over the rate among unmatched rows,
/// capped at [`MAX_RISK_RATIO`].
fn risk_ratio(
    matched_outliers: usize,
    matched_rows: usize,
    total_outliers: usize,
    total_rows: usize,
) -> f64 {
    let unmatched_outliers = total_outliers - matched_outliers;
    let unmatched_rows = total_rows - matched_rows;
    if unmatched_rows == 0 || unmatched_outliers == 0 {
        return MAX_RISK_RATIO;
    }
    let matched_rate = matched_outliers as f64 / matched_rows as f64;
    let unmatched_rate = unmatched_outliers as f64 / unmatched_rows as f64;
    (matched_rate / unmatched_rate).min(MAX_RISK_RATIO)
}

/// Invoke `f` with every k-combination of `0..n`, in lexicographic order.
fn for_each_combination(n: usize, k: usize, f: &mut impl FnMut(&[usize])) {
    fn recurse(
        n: usize,
        k: usize,
        start: usize,
        current: &mut Vec<usize>,
        f: &mut impl FnMut(&[usize]),
    ) {
        if current.len() == k {
            f(current);
            return;
        }
        for i in start..n {
            current.push(i);
            recurse(n, k, i + 1, current, f);
            current.pop();
        }
    }
    if k == 0 || k > n {
        return;
    }
    recurse(n, k, 0, &mut Vec::with_capacity(k), f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_frame::Column;

    fn summarizer(min_support: f64, min_ratio: f64, max_order: usize) -> AttributeSetSummarizer {
        AttributeSetSummarizer::new(SummarizerConfig {
            min_support,
            min_ratio,
            max_order,
        })
    }

    /// 8 rows; every outlier sits on host=db1, service=checkout.
    fn skewed_frame() -> DataFrame {
        let mut frame = DataFrame::new();
        frame
            .add_column(
                "host",
                Column::String(
                    ["web1", "web1", "web2", "db1", "db1", "db1", "web2", "db1"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                ),
            )
            .unwrap();
        frame
            .add_column(
                "service",
                Column::String(
                    ["browse", "browse", "browse", "checkout", "checkout", "checkout", "browse", "browse"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                ),
            )
            .unwrap();
        frame
            .add_column(
                "_OUTLIER",
                Column::Double(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0]),
            )
            .unwrap();
        frame
    }

    #[test]
    fn ranks_discriminative_combination_first() {
        let attrs = vec!["host".to_string(), "service".to_string()];
        let explanation = summarizer(0.2, 3.0, 2)
            .summarize(&skewed_frame(), "_OUTLIER", &attrs)
            .unwrap();

        assert_eq!(explanation.num_outliers, 3);
        assert_eq!(explanation.num_inliers, 5);
        assert!(!explanation.items.is_empty());

        let top = &explanation.items[0];
        // service=checkout matches exactly the outliers: unbounded ratio,
        // capped; it outranks host=db1, which also matches an inlier.
        assert!(top
            .matcher
            .iter()
            .any(|av| av.attribute == "service" && av.value == "checkout"));
        assert_eq!(top.ratio, MAX_RISK_RATIO);
        assert_eq!(top.support, 1.0);
    }

    #[test]
    fn support_filter_prunes_rare_combinations() {
        let attrs = vec!["host".to_string()];
        let explanation = summarizer(0.9, 0.0, 1)
            .summarize(&skewed_frame(), "_OUTLIER", &attrs)
            .unwrap();
        // Only host=db1 covers >= 90% of outliers.
        assert_eq!(explanation.items.len(), 1);
        assert_eq!(explanation.items[0].matcher[0].value, "db1");
    }

    #[test]
    fn zero_outliers_yield_empty_items() {
        let mut frame = DataFrame::new();
        frame
            .add_column("host", Column::String(vec!["a".into(), "b".into()]))
            .unwrap();
        frame
            .add_column("_OUTLIER", Column::Double(vec![0.0, 0.0]))
            .unwrap();
        let explanation = summarizer(0.2, 3.0, 1)
            .summarize(&frame, "_OUTLIER", &["host".to_string()])
            .unwrap();
        assert!(explanation.items.is_empty());
        assert_eq!(explanation.num_outliers, 0);
        assert_eq!(explanation.num_inliers, 2);
    }

    #[test]
    fn missing_attribute_column_is_summarization_error() {
        let err = summarizer(0.2, 3.0, 1)
            .summarize(&skewed_frame(), "_OUTLIER", &["region".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::Summarization(_)));
    }

    #[test]
    fn max_order_bounds_combination_size() {
        let attrs = vec!["host".to_string(), "service".to_string()];
        let explanation = summarizer(0.01, 0.0, 1)
            .summarize(&skewed_frame(), "_OUTLIER", &attrs)
            .unwrap();
        assert!(explanation.items.iter().all(|i| i.matcher.len() == 1));
    }

    #[test]
    fn combination_enumeration_is_exhaustive() {
        let mut seen = Vec::new();
        for_each_combination(4, 2, &mut |c| seen.push(c.to_vec()));
        assert_eq!(seen.len(), 6);
        assert!(seen.contains(&vec![0, 3]));
        assert!(seen.contains(&vec![1, 2]));
    }
}
