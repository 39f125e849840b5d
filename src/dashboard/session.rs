use super::{run, CatalogSnapshot, DashboardOutcome, PipelineSettings};
use crate::query::{CountrySelectionDefault, Dimension, FilterSelection};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Unknown {dimension} value: {value}")]
    UnknownValue { dimension: Dimension, value: String },
}

/// One interaction with the selection widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    /// Adds values to the dimension's selection.
    Select(Dimension, Vec<String>),
    Deselect(Dimension, Vec<String>),
    /// Empties the selection, leaving the dimension unconstrained.
    Clear(Dimension),
    /// Selects every option of the dimension.
    SelectAll(Dimension),
    /// Sets the dimension's selection to exactly these values.
    Replace(Dimension, Vec<String>),
    /// Back to the initial widget state.
    Reset,
}

/// A single user's snapshot and current selection.
pub struct DashboardSession {
    snapshot: CatalogSnapshot,
    settings: PipelineSettings,
    country_default: CountrySelectionDefault,
    selection: FilterSelection,
}

impl DashboardSession {
    pub fn new(
        snapshot: CatalogSnapshot,
        settings: PipelineSettings,
        country_default: CountrySelectionDefault,
    ) -> Self {
        let selection = FilterSelection::initial(snapshot.options(), country_default);
        Self {
            snapshot,
            settings,
            country_default,
            selection,
        }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Applies `change`. Values must be among the snapshot's options; on
    /// error the selection is left untouched.
    pub fn apply(&mut self, change: SelectionChange) -> Result<(), SelectionError> {
        let options = self.snapshot.options();
        match change {
            SelectionChange::Select(dimension, values) => match dimension {
                Dimension::Kind => {
                    let values = known_values(dimension, values, &options.kinds)?;
                    self.selection.kinds.extend(values);
                }
                Dimension::Year => {
                    let years = parse_years(values, &options.years)?;
                    self.selection.years.extend(years);
                }
                Dimension::Country => {
                    let values = known_values(dimension, values, &options.countries)?;
                    self.selection.countries.extend(values);
                }
            },
            SelectionChange::Deselect(dimension, values) => match dimension {
                Dimension::Kind => {
                    for value in values {
                        self.selection.kinds.remove(&value);
                    }
                }
                Dimension::Year => {
                    for year in parse_years(values, &options.years)? {
                        self.selection.years.remove(&year);
                    }
                }
                Dimension::Country => {
                    for value in values {
                        self.selection.countries.remove(&value);
                    }
                }
            },
            SelectionChange::Clear(dimension) => match dimension {
                Dimension::Kind => self.selection.kinds.clear(),
                Dimension::Year => self.selection.years.clear(),
                Dimension::Country => self.selection.countries.clear(),
            },
            SelectionChange::SelectAll(dimension) => match dimension {
                Dimension::Kind => self.selection.kinds = options.kinds.iter().cloned().collect(),
                Dimension::Year => self.selection.years = options.years.iter().copied().collect(),
                Dimension::Country => {
                    self.selection.countries = options.countries.iter().cloned().collect()
                }
            },
            SelectionChange::Replace(dimension, values) => match dimension {
                Dimension::Kind => {
                    let values = known_values(dimension, values, &options.kinds)?;
                    self.selection.kinds = values.into_iter().collect();
                }
                Dimension::Year => {
                    let years = parse_years(values, &options.years)?;
                    self.selection.years = years.into_iter().collect();
                }
                Dimension::Country => {
                    let values = known_values(dimension, values, &options.countries)?;
                    self.selection.countries = values.into_iter().collect();
                }
            },
            SelectionChange::Reset => {
                self.selection = FilterSelection::initial(options, self.country_default);
            }
        }
        Ok(())
    }

    /// Applies `changes` in order. If one fails, the selection is restored to
    /// what it was before the first change.
    pub fn apply_all<I>(&mut self, changes: I) -> Result<(), SelectionError>
    where
        I: IntoIterator<Item = SelectionChange>,
    {
        let before = self.selection.clone();
        for change in changes {
            if let Err(err) = self.apply(change) {
                self.selection = before;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Reruns the whole pipeline for the current selection.
    pub fn refresh(&self) -> DashboardOutcome {
        run(&self.snapshot, &self.selection, &self.settings)
    }
}

/// A one-shot selection given as value lists, e.g. from command-line flags.
/// Dimensions left empty keep their initial selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub kinds: Vec<String>,
    pub years: Vec<String>,
    pub countries: Vec<String>,
    /// Selects every country; takes precedence over `countries`.
    pub all_countries: bool,
}

impl SelectionRequest {
    pub fn changes(&self) -> Vec<SelectionChange> {
        let mut changes: Vec<SelectionChange> = [
            (Dimension::Kind, &self.kinds),
            (Dimension::Year, &self.years),
            (Dimension::Country, &self.countries),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(dimension, values)| SelectionChange::Replace(dimension, values.clone()))
        .collect();
        if self.all_countries {
            changes.push(SelectionChange::SelectAll(Dimension::Country));
        }
        changes
    }
}

fn known_values(
    dimension: Dimension,
    values: Vec<String>,
    options: &[String],
) -> Result<Vec<String>, SelectionError> {
    match values.iter().find(|v| !options.contains(v)) {
        Some(unknown) => Err(SelectionError::UnknownValue {
            dimension,
            value: unknown.clone(),
        }),
        None => Ok(values),
    }
}

fn parse_years(values: Vec<String>, options: &[i32]) -> Result<Vec<i32>, SelectionError> {
    values
        .into_iter()
        .map(|value| {
            let year = value
                .trim()
                .parse::<i32>()
                .map_err(|_| SelectionError::InvalidYear(value.clone()))?;
            if options.contains(&year) {
                Ok(year)
            } else {
                Err(SelectionError::UnknownValue {
                    dimension: Dimension::Year,
                    value,
                })
            }
        })
        .collect()
}
