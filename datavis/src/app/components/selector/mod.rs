mod logic;
mod ui;

use std::collections::HashSet;

pub use ui::SelectorInput;

/// Fields with more distinct values than this cannot be used as a filter.
pub const MAX_FILTER_SIZE: usize = 20;

/// Emitted by a `FieldSelector` whenever a checkbox changes state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChanged {
    pub field: String,
    pub checked: bool,
}

/// Receives the selection changes of the fields it governs.
pub trait SelectionObserver {
    fn governs(&self, field: &str) -> bool;
    fn selection_changed(
        &mut self,
        change: &SelectionChanged,
        table: &csv_table::Table,
        exclusive: bool,
    );
}

/// A checkable list of field names. An exclusive selector allows at most one
/// checked field at a time.
#[derive(Debug)]
pub struct FieldSelector {
    label: String,
    fields: Vec<Field>,
    exclusive: bool,
    filter_panel: Option<FilterPanel>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Field {
    name: String,
    checked: bool,
}

/// Checkboxes for the distinct values of the currently checked filter field.
#[derive(Debug, Default)]
pub struct FilterPanel {
    governed: HashSet<String>,
    state: FilterState,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FilterState {
    #[default]
    Empty,
    Unavailable {
        field: String,
    },
    Values {
        field: String,
        values: Vec<FilterValue>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterValue {
    pub value: String,
    pub checked: bool,
}

impl FieldSelector {
    pub fn new(label: &str, field_names: &[String], exclusive: bool) -> Self {
        Self {
            label: label.to_string(),
            fields: field_names
                .iter()
                .map(|name| Field {
                    name: name.clone(),
                    checked: false,
                })
                .collect(),
            exclusive,
            filter_panel: None,
        }
    }

    /// Register a filter panel that follows the selection of all fields of
    /// this selector.
    pub fn with_filter_panel(mut self) -> Self {
        let names: Vec<String> = self.fields.iter().map(|f| f.name.clone()).collect();
        self.filter_panel = Some(FilterPanel::subscribed_to(&names));
        self
    }

    pub fn filter_panel(&self) -> Option<&FilterPanel> {
        self.filter_panel.as_ref()
    }

    pub fn filter_panel_mut(&mut self) -> Option<&mut FilterPanel> {
        self.filter_panel.as_mut()
    }
}

impl FilterPanel {
    pub fn subscribed_to(fields: &[String]) -> Self {
        Self {
            governed: fields.iter().cloned().collect(),
            state: FilterState::Empty,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }
}
