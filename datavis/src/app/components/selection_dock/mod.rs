mod ui;

use crate::plotting::{FilterSelection, PlotError, TabSelection};

use super::DatasetTabs;

/// Side panel hosting the dataset tabs and the plot button.
#[derive(Debug, Default)]
pub struct SelectionDock {
    pub tabs: DatasetTabs,
}

impl SelectionDock {
    /// Collect the current selection of every tab, in tab order. Filter
    /// values are only resolved for tabs that will be plotted.
    pub fn plot_requests(&self) -> Result<Vec<TabSelection<'_>>, PlotError> {
        let mut requests = Vec::with_capacity(self.tabs.len());
        for tab in self.tabs.iter() {
            let name = tab.name.as_str();
            let x = self.tabs.checked_x(name).unwrap_or_default();
            let filter_field = self
                .tabs
                .checked_filter_fields(name)
                .and_then(|fields| fields.into_iter().next());
            let filter = match filter_field {
                Some(field) if !x.is_empty() => {
                    let values = self
                        .tabs
                        .checked_filter_values(name, &field)
                        .transpose()?
                        .unwrap_or_default();
                    Some(FilterSelection { field, values })
                }
                _ => None,
            };
            requests.push(TabSelection {
                name: name.to_string(),
                table: &tab.table,
                x,
                y: self.tabs.checked_y(name).unwrap_or_default(),
                filter,
            });
        }
        Ok(requests)
    }
}
