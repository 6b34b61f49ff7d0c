use crate::evaluation::ConfusionMatrix;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::{BufWriter, Error, ErrorKind, Write};
use std::path::Path;

/// Outcome of one holdout run.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub relation: String,
    pub train_instances: u64,
    pub test_instances: u64,
    /// Test instances that carried a label and were scored.
    pub scored_instances: u64,
    pub correct: u64,
    pub accuracy: f64,
    pub kappa: f64,
    pub train_seconds: f64,
    pub test_seconds: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f64>,
}

impl EvaluationReport {
    pub fn from_matrix(
        relation: &str,
        train_instances: u64,
        test_instances: u64,
        matrix: &ConfusionMatrix,
        train_seconds: f64,
        test_seconds: f64,
    ) -> Self {
        Self {
            relation: relation.to_string(),
            train_instances,
            test_instances,
            scored_instances: matrix.total(),
            correct: matrix.correct(),
            accuracy: matrix.accuracy(),
            kappa: matrix.kappa(),
            train_seconds,
            test_seconds,
            extras: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: &str, value: f64) -> Self {
        self.extras.insert(key.to_string(), value);
        self
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::new(ErrorKind::InvalidData, e))
    }

    /// Writes the report as pretty JSON to `path`.
    pub fn export(&self, path: &Path) -> Result<(), Error> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(self.to_json()?.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }

    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }
}

impl Display for EvaluationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "relation={}, train={}, test={}, scored={}, correct={}, acc={}, kappa={}, t_train={:.6}s, t_test={:.6}s",
            self.relation,
            self.train_instances,
            self.test_instances,
            self.scored_instances,
            self.correct,
            Self::fmtv(self.accuracy),
            Self::fmtv(self.kappa),
            self.train_seconds,
            self.test_seconds
        )?;

        for (k, v) in self.extras.iter() {
            write!(f, ", {}={}", k, Self::fmtv(*v))?;
        }

        Ok(())
    }
}
