mod logic;
mod ui;

use csv_table::Table;

use super::FieldSelector;

/// One loaded CSV file with its field selection.
#[derive(Debug)]
pub struct DatasetTab {
    pub name: String,
    pub table: Table,
    pub panel: DatasetPanel,
}

/// All loaded datasets in load order. Tabs are never removed.
#[derive(Debug, Default)]
pub struct DatasetTabs {
    tabs: Vec<DatasetTab>,
    active_tab: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRole {
    X,
    Y,
    Filter,
}

impl FieldRole {
    pub fn label(&self) -> &'static str {
        match self {
            FieldRole::X => "X-axis-SELECT_ONE",
            FieldRole::Y => "Y-axis-SELECT_MULTIPLE",
            FieldRole::Filter => "(Data Filter)-SELECT_ONE",
        }
    }
}

/// The three field selectors of a dataset tab.
#[derive(Debug)]
pub struct DatasetPanel {
    x: FieldSelector,
    y: FieldSelector,
    filter: FieldSelector,
}

impl DatasetPanel {
    pub fn new(field_names: &[String]) -> Self {
        Self {
            x: FieldSelector::new(FieldRole::X.label(), field_names, true),
            y: FieldSelector::new(FieldRole::Y.label(), field_names, false),
            filter: FieldSelector::new(FieldRole::Filter.label(), field_names, true)
                .with_filter_panel(),
        }
    }

    pub fn selector(&self, role: FieldRole) -> &FieldSelector {
        match role {
            FieldRole::X => &self.x,
            FieldRole::Y => &self.y,
            FieldRole::Filter => &self.filter,
        }
    }

    pub fn selector_mut(&mut self, role: FieldRole) -> &mut FieldSelector {
        match role {
            FieldRole::X => &mut self.x,
            FieldRole::Y => &mut self.y,
            FieldRole::Filter => &mut self.filter,
        }
    }

    pub fn checked(&self, role: FieldRole) -> Vec<String> {
        self.selector(role).checked()
    }
}
