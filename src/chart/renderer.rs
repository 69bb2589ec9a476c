//! SVG drawing for aggregate tables.

use super::ChartKind;
use crate::error::OutputError;
use crate::models::AggregateTable;
use crate::output::write_atomic;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::{Path, PathBuf};
use tracing::debug;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const PALETTE: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(23, 190, 207),
];

const PLACEHOLDER: &str = "No data available";

/// Longest axis label before it is shortened.
const LABEL_WIDTH: usize = 24;

/// Outcome of one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub file_name: String,
    pub path: PathBuf,
    pub title: String,
    /// True when the table was empty and only the placeholder was drawn.
    pub placeholder: bool,
}

/// Draws tables into SVG files under one directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            output_dir: output_dir.into(),
            size,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `table` as `kind` into `<output_dir>/<file_name>`.
    ///
    /// An empty table (or a pie with nothing to divide) yields a placeholder
    /// image. Nothing is written if drawing fails.
    pub fn render(
        &self,
        file_name: &str,
        kind: ChartKind,
        table: &AggregateTable,
    ) -> Result<RenderedChart, OutputError> {
        let path = self.output_dir.join(file_name);
        let placeholder = table.is_empty() || (kind == ChartKind::Pie && table.total() == 0);

        let svg = self
            .draw(kind, table, placeholder)
            .map_err(|e| OutputError::Render {
                path: path.clone(),
                message: format!("{:#}", e),
            })?;
        write_atomic(&path, svg.as_bytes())?;
        debug!("Wrote {} ({} bytes)", path.display(), svg.len());

        Ok(RenderedChart {
            file_name: file_name.to_string(),
            path,
            title: table.title.clone(),
            placeholder,
        })
    }

    fn draw(&self, kind: ChartKind, table: &AggregateTable, placeholder: bool) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            root.fill(&WHITE)?;
            if placeholder {
                draw_placeholder(&root, &table.title)?;
            } else {
                match kind {
                    ChartKind::Bar => draw_bar(&root, table)?,
                    ChartKind::RankedBar => draw_ranked_bar(&root, table)?,
                    ChartKind::Pie => draw_pie(&root, table)?,
                }
            }
            root.present()?;
        }
        Ok(svg)
    }
}

fn font(size: f64) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", size).into_font())
}

fn short_label(key: &str) -> String {
    if key.chars().count() <= LABEL_WIDTH {
        key.to_string()
    } else {
        let cut: String = key.chars().take(LABEL_WIDTH - 3).collect();
        format!("{}...", cut)
    }
}

fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// Upper bound of the value axis with some headroom.
fn axis_max(table: &AggregateTable) -> f64 {
    (table.max_value() as f64 * 1.1).max(1.0)
}

fn draw_placeholder(root: &Area<'_>, title: &str) -> Result<()> {
    let (w, h) = root.dim_in_pixel();
    root.draw(&Text::new(title.to_string(), (20, 20), font(22.0)))?;
    root.draw(&Text::new(
        PLACEHOLDER,
        (w as i32 / 2 - 110, h as i32 / 2),
        font(28.0),
    ))?;
    Ok(())
}

fn draw_bar(root: &Area<'_>, table: &AggregateTable) -> Result<()> {
    let n = table.len() as i32;
    let labels: Vec<String> = table.rows.iter().map(|r| short_label(&r.key)).collect();

    let mut chart = ChartBuilder::on(root)
        .caption(&table.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(140)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..axis_max(table))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_label_style(
            ("sans-serif", 12.0)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(table.key_label.as_str())
        .y_desc(table.value_label.as_str())
        .draw()?;

    chart.draw_series(table.rows.iter().enumerate().map(|(i, row)| {
        let i = i as i32;
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), row.value as f64),
            ],
            PALETTE[0].filled(),
        );
        bar.set_margin(0, 0, 4, 4);
        bar
    }))?;

    Ok(())
}

/// Horizontal bars, first row at the top.
fn draw_ranked_bar(root: &Area<'_>, table: &AggregateTable) -> Result<()> {
    let n = table.len() as i32;
    let labels: Vec<String> = table
        .rows
        .iter()
        .rev()
        .map(|r| short_label(&r.key))
        .collect();

    let mut chart = ChartBuilder::on(root)
        .caption(&table.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(220)
        .build_cartesian_2d(0f64..axis_max(table), (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(labels.len())
        .y_label_formatter(&|v| segment_label(&labels, v))
        .x_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(table.value_label.as_str())
        .draw()?;

    chart.draw_series(table.rows.iter().enumerate().map(|(rank, row)| {
        let pos = n - 1 - rank as i32;
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(pos)),
                (row.value as f64, SegmentValue::Exact(pos + 1)),
            ],
            PALETTE[rank % PALETTE.len()].filled(),
        );
        bar.set_margin(3, 3, 0, 0);
        bar
    }))?;

    Ok(())
}

fn draw_pie(root: &Area<'_>, table: &AggregateTable) -> Result<()> {
    let area = root.titled(&table.title, ("sans-serif", 24))?;
    let (w, h) = area.dim_in_pixel();
    let (cx, cy) = (w as f64 * 0.35, h as f64 / 2.0);
    let radius = f64::from(w.min(h)) * 0.4;
    let legend_x = (w as f64 * 0.7) as i32;
    let total = table.total() as f64;

    let mut start = -FRAC_PI_2;
    for (i, row) in table.rows.iter().enumerate() {
        let share = row.value as f64 / total;
        let sweep = share * TAU;
        let color = PALETTE[i % PALETTE.len()];

        let steps = ((share * 120.0).ceil() as usize).max(2);
        let mut wedge = Vec::with_capacity(steps + 2);
        wedge.push((cx as i32, cy as i32));
        for s in 0..=steps {
            let angle = start + sweep * s as f64 / steps as f64;
            wedge.push((
                (cx + radius * angle.cos()) as i32,
                (cy + radius * angle.sin()) as i32,
            ));
        }
        area.draw(&Polygon::new(wedge, color.filled()))?;

        let y = 40 + i as i32 * 26;
        area.draw(&Rectangle::new(
            [(legend_x, y), (legend_x + 16, y + 16)],
            color.filled(),
        ))?;
        area.draw(&Text::new(
            format!("{} ({:.1}%)", short_label(&row.key), share * 100.0),
            (legend_x + 24, y),
            font(14.0),
        ))?;

        start += sweep;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table(rows: &[(&str, u64)]) -> AggregateTable {
        AggregateTable::new("Matches Won by Each Team", "Team", "Wins")
            .with_rows(rows.iter().map(|(k, v)| (k.to_string(), *v)))
    }

    fn sample() -> AggregateTable {
        table(&[
            ("Mumbai Indians", 92),
            ("Chennai Super Kings", 79),
            ("Kolkata Knight Riders", 77),
        ])
    }

    #[test]
    fn test_render_each_kind() {
        let dir = TempDir::new().unwrap();
        let renderer = ChartRenderer::new(dir.path(), (800, 600));

        for (name, kind) in [
            ("bar.svg", ChartKind::Bar),
            ("ranked.svg", ChartKind::RankedBar),
            ("pie.svg", ChartKind::Pie),
        ] {
            let chart = renderer.render(name, kind, &sample()).unwrap();
            assert!(!chart.placeholder);
            let svg = std::fs::read_to_string(&chart.path).unwrap();
            assert!(svg.contains("<svg"));
            assert!(svg.contains("Matches Won by Each Team"));
        }
    }

    #[test]
    fn test_empty_table_renders_placeholder() {
        let dir = TempDir::new().unwrap();
        let renderer = ChartRenderer::new(dir.path(), (640, 480));

        let chart = renderer
            .render("top_six_hitters.svg", ChartKind::RankedBar, &table(&[]))
            .unwrap();

        assert!(chart.placeholder);
        let svg = std::fs::read_to_string(dir.path().join("top_six_hitters.svg")).unwrap();
        assert!(svg.contains(PLACEHOLDER));
    }

    #[test]
    fn test_all_zero_pie_renders_placeholder() {
        let dir = TempDir::new().unwrap();
        let renderer = ChartRenderer::new(dir.path(), (640, 480));

        let chart = renderer
            .render("pie.svg", ChartKind::Pie, &table(&[("bat", 0), ("field", 0)]))
            .unwrap();
        assert!(chart.placeholder);
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("not-created");
        let renderer = ChartRenderer::new(&missing, (640, 480));

        let err = renderer
            .render("bar.svg", ChartKind::Bar, &sample())
            .unwrap_err();

        assert!(matches!(err, OutputError::Io { .. }));
        assert!(!missing.join("bar.svg").exists());
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label("Eden Gardens"), "Eden Gardens");
        let long = short_label("Rajiv Gandhi International Stadium, Uppal");
        assert_eq!(long.chars().count(), LABEL_WIDTH);
        assert!(long.ends_with("..."));
    }
}
