use crate::chart::{self, ChartSpec};
use crate::dataset::BenchmarkDataset;
use crate::theme::Theme;
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Render one chart to `<output_dir>/<spec.filename>` as a PNG.
///
/// Creates the output directory (and any missing ancestors) on demand and
/// overwrites an existing file of the same name without asking. Backend
/// resources are released as soon as the file is written.
pub fn write_chart(
    output_dir: &Path,
    dataset: &BenchmarkDataset,
    spec: &ChartSpec,
    theme: &Theme,
) -> Result<PathBuf> {
    // Validate geometry before the backend exists; a configuration error must
    // not leave a half-written file behind.
    let palette = spec.palette.as_deref().unwrap_or(&theme.palette);
    chart::layout_bars(dataset, palette, spec.highlight.as_ref())?;

    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            output_dir.display()
        )
    })?;

    let path = output_dir.join(&spec.filename);
    {
        let root = BitMapBackend::new(&path, spec.size).into_drawing_area();
        root.fill(&theme.background)?;
        chart::render(&root, dataset, spec, theme)
            .with_context(|| format!("Failed to render {}", spec.filename))?;
        root.present()
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    println!("Generated: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Series;
    use tempfile::TempDir;

    fn small_dataset() -> BenchmarkDataset {
        BenchmarkDataset {
            labels: vec!["Churn".into(), "Mixed".into()],
            series: vec![
                Series {
                    name: "A".into(),
                    values: vec![10.0, 20.0],
                },
                Series {
                    name: "B".into(),
                    values: vec![15.0, 25.0],
                },
            ],
        }
    }

    fn small_spec(filename: &str) -> ChartSpec {
        ChartSpec {
            title: "Test Chart".into(),
            filename: filename.into(),
            x_desc: "Workload".into(),
            y_desc: "ns/op".into(),
            size: (400, 300),
            palette: None,
            highlight: None,
            annotation: None,
        }
    }

    #[test]
    fn test_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("docs").join("images");

        let path = write_chart(
            &nested,
            &small_dataset(),
            &small_spec("chart.png"),
            &Theme::github_dark(),
        )
        .unwrap();

        assert!(nested.is_dir());
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_overwrites_existing_file() {
        let tmp = TempDir::new().unwrap();
        let theme = Theme::github_dark();

        let first = write_chart(tmp.path(), &small_dataset(), &small_spec("chart.png"), &theme)
            .unwrap();
        let second = write_chart(tmp.path(), &small_dataset(), &small_spec("chart.png"), &theme)
            .unwrap();

        assert_eq!(first, second);
        assert!(second.exists());
    }

    #[test]
    fn test_invalid_dataset_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("charts");
        let mut dataset = small_dataset();
        dataset.series[0].values.pop();

        let result = write_chart(&out, &dataset, &small_spec("chart.png"), &Theme::github_dark());

        assert!(result.is_err());
        assert!(!out.join("chart.png").exists());
        assert!(!out.exists());
    }
}
