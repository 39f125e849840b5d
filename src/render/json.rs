use super::{DashboardRenderer, MetricValue};
use crate::aggregate::{GroupCount, YearKindPivot};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// One rendered element, in rendering order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Section {
    Metric {
        label: String,
        value: MetricValue,
        display: String,
    },
    LineChart {
        title: String,
        series: YearKindPivot,
    },
    BarChart {
        title: String,
        series: Vec<GroupCount>,
    },
    Table {
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Notice {
        message: String,
    },
}

/// Collects sections and serializes them as a JSON array.
#[derive(Debug, Default)]
pub struct JsonRenderer {
    sections: Vec<Section>,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, &self.sections)?;
        writeln!(out)?;
        Ok(())
    }
}

impl DashboardRenderer for JsonRenderer {
    fn metric(&mut self, label: &str, value: MetricValue) -> Result<()> {
        self.sections.push(Section::Metric {
            label: label.to_string(),
            value,
            display: value.display(),
        });
        Ok(())
    }

    fn line_chart(&mut self, title: &str, series: &YearKindPivot) -> Result<()> {
        self.sections.push(Section::LineChart {
            title: title.to_string(),
            series: series.clone(),
        });
        Ok(())
    }

    fn bar_chart(&mut self, title: &str, series: &[GroupCount]) -> Result<()> {
        self.sections.push(Section::BarChart {
            title: title.to_string(),
            series: series.to_vec(),
        });
        Ok(())
    }

    fn table(&mut self, title: &str, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        self.sections.push(Section::Table {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        });
        Ok(())
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        self.sections.push(Section::Notice {
            message: message.to_string(),
        });
        Ok(())
    }
}
