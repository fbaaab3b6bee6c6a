use anyhow::{anyhow, ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the subject implementation whose bars receive highlight styling.
pub const SUBJECT: &str = "verztable";

/// Workload names, in x-axis order, shared by all mixed-workload tables.
const WORKLOADS: &[&str] = &[
    "Churn",
    "Mixed",
    "Read-Heavy",
    "Write-Heavy",
    "Update-Heavy",
    "Zipfian",
];

/// One bar series: a named implementation (or a key-type category for the
/// summary chart) and one measurement per label, in ns/op. Lower is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Measurements for one chart: ordered x-axis labels plus one value sequence
/// per series. Label order is significant and defines the tick order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkDataset {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl BenchmarkDataset {
    /// Check the structural invariant: every series has exactly one value per
    /// label. Violations are configuration errors, not recoverable conditions.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.labels.is_empty(), "dataset has no labels");
        for series in &self.series {
            ensure!(
                series.values.len() == self.labels.len(),
                "series '{}' has {} values but there are {} labels",
                series.name,
                series.values.len(),
                self.labels.len()
            );
        }
        Ok(())
    }

    /// Reduce to the named labels and series, in the order given.
    pub fn subset(&self, labels: &[&str], series: &[&str]) -> Result<Self> {
        self.validate()?;

        let label_indices = labels
            .iter()
            .map(|want| {
                self.labels
                    .iter()
                    .position(|l| l.as_str() == *want)
                    .ok_or_else(|| anyhow!("no label named '{}' in dataset", want))
            })
            .collect::<Result<Vec<_>>>()?;

        let series = series
            .iter()
            .map(|want| {
                let full = self
                    .series
                    .iter()
                    .find(|s| s.name == *want)
                    .ok_or_else(|| anyhow!("no series named '{}' in dataset", want))?;
                Ok(Series {
                    name: full.name.clone(),
                    values: label_indices.iter().map(|&i| full.values[i]).collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            series,
        })
    }
}

/// The three measurement tables, grouped by key type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkData {
    pub string_keys: BenchmarkDataset,
    pub u64_keys: BenchmarkDataset,
    pub u32_keys: BenchmarkDataset,
}

impl BenchmarkData {
    /// Built-in tables, transcribed from the published benchmark runs
    /// (averaged across table sizes).
    pub fn builtin() -> Self {
        Self {
            string_keys: mixed_table(&[
                (SUBJECT, &[43.0, 39.0, 34.0, 113.0, 40.0, 33.0]),
                ("Abseil", &[55.0, 75.0, 62.0, 123.0, 70.0, 63.0]),
                ("Boost", &[50.0, 71.0, 58.0, 93.0, 65.0, 60.0]),
                ("Ankerl", &[60.0, 85.0, 73.0, 93.0, 83.0, 72.0]),
                ("std.HashMap", &[50.0, 39.0, 30.0, 91.0, 41.0, 29.0]),
            ]),
            u64_keys: mixed_table(&[
                (SUBJECT, &[17.0, 12.0, 7.0, 35.0, 14.0, 9.0]),
                ("Abseil", &[25.0, 13.0, 5.0, 30.0, 12.0, 12.0]),
                ("Boost", &[20.0, 10.0, 6.0, 29.0, 12.0, 9.0]),
                ("Ankerl", &[23.0, 17.0, 12.0, 29.0, 18.0, 16.0]),
                ("std.HashMap", &[29.0, 15.0, 10.0, 28.0, 16.0, 11.0]),
            ]),
            u32_keys: mixed_table(&[
                (SUBJECT, &[16.0, 10.0, 6.0, 35.0, 14.0, 8.0]),
                ("Abseil", &[24.0, 12.0, 5.0, 27.0, 13.0, 11.0]),
                ("Boost", &[21.0, 9.0, 5.0, 29.0, 13.0, 8.0]),
                ("Ankerl", &[23.0, 16.0, 12.0, 28.0, 18.0, 16.0]),
                ("std.HashMap", &[28.0, 15.0, 10.0, 27.0, 17.0, 10.0]),
            ]),
        }
    }

    /// Load a results file with the same shape as the built-in tables.
    /// The chart builders don't care where the numbers came from.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read benchmark data from {}", path.display()))?;
        let data: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse benchmark data in {}", path.display()))?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<()> {
        self.string_keys.validate()?;
        self.u64_keys.validate()?;
        self.u32_keys.validate()?;
        Ok(())
    }

    /// Two-series summary across implementations: mean ns/op per
    /// implementation over the string table and over the pooled integer
    /// tables, rounded to whole nanoseconds.
    pub fn summary(&self) -> Result<BenchmarkDataset> {
        self.validate()?;

        let implementations: Vec<String> = self
            .string_keys
            .series
            .iter()
            .map(|s| s.name.clone())
            .collect();

        let string_avg: Vec<f64> = self
            .string_keys
            .series
            .iter()
            .map(|s| mean(&s.values).round())
            .collect();

        let integer_avg: Vec<f64> = implementations
            .iter()
            .map(|name| {
                let mut pooled = Vec::new();
                for table in [&self.u64_keys, &self.u32_keys] {
                    let series = table
                        .series
                        .iter()
                        .find(|s| &s.name == name)
                        .ok_or_else(|| {
                            anyhow!("implementation '{}' missing from an integer-key table", name)
                        })?;
                    pooled.extend_from_slice(&series.values);
                }
                Ok(mean(&pooled).round())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BenchmarkDataset {
            labels: implementations,
            series: vec![
                Series {
                    name: "String Keys".to_string(),
                    values: string_avg,
                },
                Series {
                    name: "Integer Keys".to_string(),
                    values: integer_avg,
                },
            ],
        })
    }
}

fn mixed_table(series: &[(&str, &[f64])]) -> BenchmarkDataset {
    BenchmarkDataset {
        labels: WORKLOADS.iter().map(|w| w.to_string()).collect(),
        series: series
            .iter()
            .map(|(name, values)| Series {
                name: name.to_string(),
                values: values.to_vec(),
            })
            .collect(),
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
