use crate::dataset::BenchmarkDataset;
use crate::theme::Theme;
use anyhow::{ensure, Result};
use plotters::coord::Shift;
use plotters::element::Polygon;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

// Font sizes
// NOTE: These are intentionally large because the PNGs are usually viewed
// scaled down in READMEs and social cards.
const TITLE_FONT_SIZE: u32 = 42;
const AXIS_LABEL_FONT_SIZE: u32 = 26;
const TICK_LABEL_FONT_SIZE: u32 = 22;
const LEGEND_FONT_SIZE: u32 = 22;
const ANNOTATION_FONT_SIZE: u32 = 26;

// Layout tuning
const DEFAULT_MARGIN: u32 = 20;
const DEFAULT_MARGIN_BOTTOM: u32 = 40;
const DEFAULT_X_LABEL_AREA_SIZE: u32 = 60;

/// Fraction of each x slot occupied by a bar group; the rest is the gap
/// between neighboring groups.
const GROUP_WIDTH: f64 = 0.8;
/// Small inset so adjacent bars within a group don't visually fuse.
const BAR_INSET: f64 = 0.02;
/// Arrow head size as a fraction of the axis span.
const ARROW_HEAD: f64 = 0.025;

/// Which bars receive the highlight edge.
#[derive(Debug, Clone)]
pub enum HighlightTarget {
    /// Every bar of the named series (the full comparison charts).
    Series(String),
    /// The named label's bar in every series (the summary chart).
    Label(String),
}

/// Cosmetic emphasis for the subject implementation: a distinct border drawn
/// around its bars. Bar heights are never altered.
#[derive(Debug, Clone)]
pub struct Highlight {
    pub target: HighlightTarget,
    pub edge: RGBColor,
    pub stroke: u32,
}

impl Highlight {
    fn selects(&self, dataset: &BenchmarkDataset, label_idx: usize, series_idx: usize) -> bool {
        match &self.target {
            HighlightTarget::Series(name) => dataset.series[series_idx].name == *name,
            HighlightTarget::Label(name) => dataset.labels[label_idx] == *name,
        }
    }
}

/// Free-text callout pointing at a data coordinate. The text is caller-supplied
/// decoration; nothing checks the claim against the data.
#[derive(Debug, Clone)]
pub struct Annotation {
    pub text: String,
    /// Arrow tip, in (x slot, value) data coordinates.
    pub at: (f64, f64),
    /// Text anchor (and arrow tail), in the same coordinates.
    pub text_at: (f64, f64),
}

/// Parameters for one rendered figure.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub filename: String,
    pub x_desc: String,
    pub y_desc: String,
    /// Canvas size in pixels.
    pub size: (u32, u32),
    /// Per-chart series colors; falls back to the theme palette.
    pub palette: Option<Vec<RGBColor>>,
    pub highlight: Option<Highlight>,
    pub annotation: Option<Annotation>,
}

/// One positioned bar, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub x0: f64,
    pub x1: f64,
    pub height: f64,
    pub color: RGBColor,
    pub edge: Option<(RGBColor, u32)>,
    pub label_idx: usize,
    pub series_idx: usize,
}

/// Compute bar geometry for a grouped bar chart: one group per label, one bar
/// per series within each group, groups centered on integer x slots.
///
/// Bars come back in (label, series) order, so a chart with L labels and S
/// series yields exactly L*S bars with heights equal to the input values.
pub fn layout_bars(
    dataset: &BenchmarkDataset,
    palette: &[RGBColor],
    highlight: Option<&Highlight>,
) -> Result<Vec<Bar>> {
    dataset.validate()?;
    ensure!(
        palette.len() >= dataset.series.len(),
        "palette has {} colors but there are {} series",
        palette.len(),
        dataset.series.len()
    );

    let n_series = dataset.series.len() as f64;
    let bar_width = GROUP_WIDTH / n_series;

    let mut bars = Vec::with_capacity(dataset.labels.len() * dataset.series.len());
    for label_idx in 0..dataset.labels.len() {
        for (series_idx, series) in dataset.series.iter().enumerate() {
            let offset = (series_idx as f64 - (n_series - 1.0) / 2.0) * bar_width;
            let x_center = label_idx as f64 + offset;
            let edge = highlight.and_then(|h| {
                h.selects(dataset, label_idx, series_idx)
                    .then_some((h.edge, h.stroke))
            });

            bars.push(Bar {
                x0: x_center - bar_width / 2.0 + BAR_INSET,
                x1: x_center + bar_width / 2.0 - BAR_INSET,
                height: series.values[label_idx],
                color: palette[series_idx],
                edge,
                label_idx,
                series_idx,
            });
        }
    }

    Ok(bars)
}

/// Draw one grouped bar chart onto the given drawing area.
///
/// The caller fills the area with the theme matting first; this draws the
/// panel, mesh, bars, legend, and any annotation on top of it.
pub fn render<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    dataset: &BenchmarkDataset,
    spec: &ChartSpec,
    theme: &Theme,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let palette = spec.palette.as_deref().unwrap_or(&theme.palette);
    let bars = layout_bars(dataset, palette, spec.highlight.as_ref())?;

    let n_labels = dataset.labels.len();
    let max_value = bars.iter().map(|b| b.height).fold(0.0_f64, f64::max);
    let y_max = (max_value * 1.2).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(
            &spec.title,
            ("sans-serif", TITLE_FONT_SIZE)
                .into_font()
                .color(&theme.accent),
        )
        .margin(DEFAULT_MARGIN)
        .margin_bottom(DEFAULT_MARGIN_BOTTOM)
        .x_label_area_size(DEFAULT_X_LABEL_AREA_SIZE)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5..(n_labels as f64 - 0.5), 0.0..y_max)?;

    chart.plotting_area().fill(&theme.panel)?;

    let labels = &dataset.labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n_labels)
        .x_label_formatter(&|x| {
            let idx = x.round() as usize;
            if idx < n_labels && (x - idx as f64).abs() < 0.3 {
                labels.get(idx).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_label_formatter(&|y| format!("{:.0}", y))
        .bold_line_style(theme.grid.mix(0.6))
        .light_line_style(theme.grid.mix(0.15))
        .axis_style(theme.grid)
        .y_desc(spec.y_desc.as_str())
        .x_desc(spec.x_desc.as_str())
        .label_style(
            ("sans-serif", TICK_LABEL_FONT_SIZE)
                .into_font()
                .color(&theme.foreground),
        )
        .axis_desc_style(
            ("sans-serif", AXIS_LABEL_FONT_SIZE)
                .into_font()
                .color(&theme.foreground),
        )
        .draw()?;

    for bar in &bars {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(bar.x0, 0.0), (bar.x1, bar.height)],
            bar.color.mix(0.9).filled(),
        )))?;

        if let Some((edge, stroke)) = bar.edge {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(bar.x0, 0.0), (bar.x1, bar.height)],
                edge.stroke_width(stroke),
            )))?;
        }
    }

    // Legend: one order-stable entry per series
    for (idx, series) in dataset.series.iter().enumerate() {
        let color = palette[idx];
        chart
            .draw_series(std::iter::once(Circle::new(
                (n_labels as f64 - 1.0, y_max),
                0,
                color.filled(),
            )))?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 20, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(theme.panel.mix(0.9))
        .border_style(theme.grid)
        .label_font(
            ("sans-serif", LEGEND_FONT_SIZE)
                .into_font()
                .color(&theme.foreground),
        )
        .draw()?;

    if let Some(ann) = &spec.annotation {
        let (tip, anchor) = (ann.at, ann.text_at);

        // Direction in axis-normalized space, so the head looks the same
        // regardless of the two axes' scales.
        let x_span = n_labels as f64;
        let y_span = y_max;
        let dx = (tip.0 - anchor.0) / x_span;
        let dy = (tip.1 - anchor.1) / y_span;
        let norm = (dx * dx + dy * dy).sqrt().max(f64::EPSILON);
        let (ux, uy) = (dx / norm, dy / norm);

        let base = (
            tip.0 - ux * ARROW_HEAD * x_span,
            tip.1 - uy * ARROW_HEAD * y_span,
        );
        let left = (
            base.0 - uy * ARROW_HEAD * 0.5 * x_span,
            base.1 + ux * ARROW_HEAD * 0.5 * y_span,
        );
        let right = (
            base.0 + uy * ARROW_HEAD * 0.5 * x_span,
            base.1 - ux * ARROW_HEAD * 0.5 * y_span,
        );

        chart.draw_series(std::iter::once(PathElement::new(
            vec![anchor, base],
            theme.accent.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(Polygon::new(
            vec![tip, left, right],
            theme.accent.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            ann.text.clone(),
            anchor,
            ("sans-serif", ANNOTATION_FONT_SIZE)
                .into_font()
                .color(&theme.accent)
                .pos(Pos::new(HPos::Left, VPos::Bottom)),
        )))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Series;
    use proptest::collection::vec as prop_vec;
    use proptest::prelude::*;

    const TEST_PALETTE: &[RGBColor] = &[
        RGBColor(10, 20, 30),
        RGBColor(40, 50, 60),
        RGBColor(70, 80, 90),
        RGBColor(100, 110, 120),
        RGBColor(130, 140, 150),
        RGBColor(160, 170, 180),
    ];

    fn two_by_two() -> BenchmarkDataset {
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

    fn series_highlight(name: &str) -> Highlight {
        Highlight {
            target: HighlightTarget::Series(name.into()),
            edge: RGBColor(255, 255, 255),
            stroke: 2,
        }
    }

    #[test]
    fn test_bar_count_and_heights() {
        let bars = layout_bars(&two_by_two(), TEST_PALETTE, None).unwrap();

        assert_eq!(bars.len(), 4);
        let heights: Vec<f64> = bars.iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![10.0, 15.0, 20.0, 25.0]);
    }

    #[test]
    fn test_bar_indices_follow_declaration_order() {
        let bars = layout_bars(&two_by_two(), TEST_PALETTE, None).unwrap();
        let indices: Vec<(usize, usize)> =
            bars.iter().map(|b| (b.label_idx, b.series_idx)).collect();
        assert_eq!(indices, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_series_colors_match_palette() {
        let bars = layout_bars(&two_by_two(), TEST_PALETTE, None).unwrap();
        assert_eq!(bars[0].color, TEST_PALETTE[0]);
        assert_eq!(bars[1].color, TEST_PALETTE[1]);
        assert_eq!(bars[2].color, TEST_PALETTE[0]);
    }

    #[test]
    fn test_groups_centered_on_slots() {
        let bars = layout_bars(&two_by_two(), TEST_PALETTE, None).unwrap();

        let churn: Vec<&Bar> = bars.iter().filter(|b| b.label_idx == 0).collect();
        assert!(churn[0].x1 <= churn[1].x0);
        let mid = (churn[0].x0 + churn[1].x1) / 2.0;
        assert!((mid - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_series_highlight_marks_subject_only() {
        let bars = layout_bars(&two_by_two(), TEST_PALETTE, Some(&series_highlight("A"))).unwrap();

        for bar in &bars {
            if bar.series_idx == 0 {
                assert_eq!(bar.edge, Some((RGBColor(255, 255, 255), 2)));
            } else {
                assert_eq!(bar.edge, None);
            }
        }
    }

    #[test]
    fn test_label_highlight_marks_subject_column_only() {
        let highlight = Highlight {
            target: HighlightTarget::Label("Mixed".into()),
            edge: RGBColor(255, 255, 255),
            stroke: 2,
        };
        let bars = layout_bars(&two_by_two(), TEST_PALETTE, Some(&highlight)).unwrap();

        for bar in &bars {
            assert_eq!(bar.edge.is_some(), bar.label_idx == 1);
        }
    }

    #[test]
    fn test_no_highlight_means_no_edges() {
        let bars = layout_bars(&two_by_two(), TEST_PALETTE, None).unwrap();
        assert!(bars.iter().all(|b| b.edge.is_none()));
    }

    #[test]
    fn test_value_length_mismatch_is_fatal() {
        let mut dataset = two_by_two();
        dataset.series[1].values.pop();

        assert!(layout_bars(&dataset, TEST_PALETTE, None).is_err());
    }

    #[test]
    fn test_short_palette_is_fatal() {
        assert!(layout_bars(&two_by_two(), &TEST_PALETTE[..1], None).is_err());
    }

    #[test]
    fn test_render_smoke() {
        let theme = Theme::github_dark();
        let dataset = two_by_two();
        let spec = ChartSpec {
            title: "Smoke".into(),
            filename: "smoke.png".into(),
            x_desc: "Workload".into(),
            y_desc: "ns/op".into(),
            size: (400, 300),
            palette: None,
            highlight: Some(series_highlight("A")),
            annotation: Some(Annotation {
                text: "faster".into(),
                at: (0.0, 10.0),
                text_at: (0.5, 20.0),
            }),
        };

        let mut buf = vec![0u8; 400 * 300 * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (400, 300)).into_drawing_area();
            root.fill(&theme.background).unwrap();
            render(&root, &dataset, &spec, &theme).unwrap();
            root.present().unwrap();
        }

        // Bars use palette colors, so something other than the matting must
        // have been drawn.
        let matting = [theme.background.0, theme.background.1, theme.background.2];
        assert!(buf.chunks(3).any(|px| px != matting));
    }

    proptest! {
        #[test]
        fn prop_bars_stay_within_their_slot(n_labels in 1..8usize, n_series in 1..6usize) {
            let dataset = BenchmarkDataset {
                labels: (0..n_labels).map(|i| format!("w{}", i)).collect(),
                series: (0..n_series)
                    .map(|s| Series {
                        name: format!("impl{}", s),
                        values: (0..n_labels).map(|i| (s * n_labels + i) as f64).collect(),
                    })
                    .collect(),
            };
            let palette = vec![RGBColor(0, 0, 0); n_series];

            let bars = layout_bars(&dataset, &palette, None).unwrap();

            prop_assert_eq!(bars.len(), n_labels * n_series);
            for bar in &bars {
                let slot = bar.label_idx as f64;
                prop_assert!(bar.x0 < bar.x1);
                prop_assert!(bar.x0 >= slot - 0.5);
                prop_assert!(bar.x1 <= slot + 0.5);
            }

            // Within a group, consecutive bars must not overlap
            for group in bars.chunks(n_series) {
                for pair in group.windows(2) {
                    prop_assert!(pair[0].x1 <= pair[1].x0);
                }
            }
        }

        #[test]
        fn prop_heights_equal_values_exactly(values in prop_vec(0.0..1e6f64, 1..30)) {
            let dataset = BenchmarkDataset {
                labels: (0..values.len()).map(|i| format!("w{}", i)).collect(),
                series: vec![Series { name: "only".into(), values: values.clone() }],
            };

            let bars = layout_bars(&dataset, &[RGBColor(0, 0, 0)], None).unwrap();

            let heights: Vec<f64> = bars.iter().map(|b| b.height).collect();
            prop_assert_eq!(heights, values);
        }
    }
}
