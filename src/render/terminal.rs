use super::{format_count, DashboardRenderer, MetricValue};
use crate::aggregate::{GroupCount, YearKindPivot};
use crate::cli_style::{box_chars, colors, paint, paint_bold, TableBuilder};
use anyhow::Result;
use std::io::Write;
use unicode_width::UnicodeWidthStr;

const DEFAULT_BAR_WIDTH: usize = 40;

/// Draws the dashboard as styled text.
pub struct TerminalRenderer<W: Write> {
    out: W,
    color: bool,
    bar_width: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, title: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", paint_bold(title, colors::CYAN, self.color))?;
        let underline = box_chars::SINGLE_HORIZONTAL.repeat(title.width());
        writeln!(self.out, "{}", paint(&underline, colors::CYAN, self.color))?;
        Ok(())
    }
}

impl<W: Write> DashboardRenderer for TerminalRenderer<W> {
    fn metric(&mut self, label: &str, value: MetricValue) -> Result<()> {
        writeln!(
            self.out,
            "  {} {} {}",
            paint(box_chars::BULLET, colors::PURPLE, self.color),
            paint(&format!("{}:", label), colors::DIM, self.color),
            paint_bold(&value.display(), colors::WHITE, self.color)
        )?;
        Ok(())
    }

    fn line_chart(&mut self, title: &str, series: &YearKindPivot) -> Result<()> {
        self.heading(title)?;
        let mut headers = vec!["Year".to_string()];
        headers.extend(series.kinds.iter().cloned());
        let mut table = TableBuilder::new(&headers);
        for row in &series.rows {
            let mut cells = vec![row.year.to_string()];
            cells.extend(
                row.counts
                    .iter()
                    .map(|c| c.map(format_count).unwrap_or_default()),
            );
            table.add_row(cells);
        }
        table.write_to(&mut self.out, self.color)?;
        Ok(())
    }

    fn bar_chart(&mut self, title: &str, series: &[GroupCount]) -> Result<()> {
        self.heading(title)?;
        if series.is_empty() {
            writeln!(
                self.out,
                "  {} {}",
                paint(box_chars::BULLET_EMPTY, colors::DIM, self.color),
                paint("no data", colors::DIM, self.color)
            )?;
            return Ok(());
        }

        let label_width = series.iter().map(|g| g.key.width()).max().unwrap_or(0);
        let max_count = series.iter().map(|g| g.count).max().unwrap_or(0).max(1);
        for group in series {
            let length = (group.count * self.bar_width).div_ceil(max_count);
            let padding = label_width.saturating_sub(group.key.width());
            writeln!(
                self.out,
                "  {}{} {} {}",
                group.key,
                " ".repeat(padding),
                paint(&box_chars::BAR.repeat(length), colors::GREEN, self.color),
                format_count(group.count)
            )?;
        }
        Ok(())
    }

    fn table(&mut self, title: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        self.heading(title)?;
        let mut table = TableBuilder::new(headers);
        for row in rows {
            table.add_row(row);
        }
        table.write_to(&mut self.out, self.color)?;
        Ok(())
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        writeln!(
            self.out,
            " {} {}",
            paint("⚠", colors::ORANGE, self.color),
            paint(message, colors::ORANGE, self.color)
        )?;
        Ok(())
    }
}
