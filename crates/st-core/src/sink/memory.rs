//! In-memory sink for tests and embedding.

use serde_json::Value;

use st_common::Result;

use super::{Artifact, ResultSink};

/// Records artifacts in memory, in save order.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Vec<(String, Value)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved artifact names, in save order.
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.artifacts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ResultSink for MemorySink {
    fn save(&mut self, name: &str, artifact: &Artifact<'_>) -> Result<()> {
        self.artifacts.push((name.to_string(), artifact.to_json()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_frame::DataFrame;

    #[test]
    fn records_in_save_order() {
        let mut sink = MemorySink::new();
        let empty = DataFrame::new();
        sink.save(
            "outliers1",
            &Artifact::Outliers {
                rows: &empty,
                outlier_column: "_OUTLIER",
            },
        )
        .unwrap();
        sink.save(
            "explanation1",
            &Artifact::Outliers {
                rows: &empty,
                outlier_column: "_OUTLIER",
            },
        )
        .unwrap();
        assert_eq!(sink.names(), vec!["outliers1", "explanation1"]);
        assert!(sink.get("outliers1").is_some());
        assert!(sink.get("outliers2").is_none());
    }
}
