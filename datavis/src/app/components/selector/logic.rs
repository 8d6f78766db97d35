use csv_table::{Table, TableError};

use super::{
    FieldSelector, FilterPanel, FilterState, FilterValue, SelectionChanged, SelectionObserver,
    MAX_FILTER_SIZE,
};

/// A field can filter the plot if only one filter field may be checked at a
/// time and it has few enough distinct values.
pub fn filter_available(exclusive: bool, distinct_count: usize) -> bool {
    exclusive && distinct_count <= MAX_FILTER_SIZE
}

impl FieldSelector {
    /// Check or uncheck `field`. In an exclusive selector, checking a field
    /// unchecks the previously checked one first. Returns the emitted
    /// changes in order.
    pub fn set_checked(
        &mut self,
        field: &str,
        checked: bool,
        table: &Table,
    ) -> Vec<SelectionChanged> {
        let Some(idx) = self.fields.iter().position(|f| f.name == field) else {
            log::warn!("'{}' has no field named '{field}'", self.label);
            return Vec::new();
        };
        if self.fields[idx].checked == checked {
            return Vec::new();
        }

        let mut changes = Vec::new();
        if checked && self.exclusive {
            for other in self.fields.iter_mut().filter(|f| f.checked) {
                other.checked = false;
                changes.push(SelectionChanged {
                    field: other.name.clone(),
                    checked: false,
                });
            }
        }
        self.fields[idx].checked = checked;
        changes.push(SelectionChanged {
            field: field.to_string(),
            checked,
        });

        for change in changes.iter() {
            log::debug!(
                "{}: '{}' {}",
                self.label,
                change.field,
                if change.checked { "checked" } else { "unchecked" }
            );
            self.notify(change, table);
        }
        changes
    }

    /// Names of all checked fields, in column order.
    pub fn checked(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.checked)
            .map(|f| f.name.clone())
            .collect()
    }

    /// Values of `field` that should be plotted: the checked ones, or all
    /// distinct values if the field cannot be used as a filter.
    pub fn checked_filter_values(
        &self,
        field: &str,
        table: &Table,
    ) -> Result<Vec<String>, TableError> {
        match self.filter_panel() {
            Some(panel) => panel.checked_values(field, table, self.exclusive),
            None => all_values(table, field),
        }
    }

    fn notify(&mut self, change: &SelectionChanged, table: &Table) {
        let exclusive = self.exclusive;
        if let Some(panel) = self
            .filter_panel
            .as_mut()
            .filter(|panel| panel.governs(&change.field))
        {
            panel.selection_changed(change, table, exclusive);
        }
    }
}

impl FilterPanel {
    pub fn set_value_checked(&mut self, value: &str, checked: bool) {
        if let FilterState::Values { values, .. } = &mut self.state {
            if let Some(v) = values.iter_mut().find(|v| v.value == value) {
                v.checked = checked;
            }
        }
    }

    pub fn checked_values(
        &self,
        field: &str,
        table: &Table,
        exclusive: bool,
    ) -> Result<Vec<String>, TableError> {
        let column = table.column(field)?;
        if !filter_available(exclusive, column.distinct_count()) {
            return all_values(table, field);
        }
        match &self.state {
            FilterState::Values { field: shown, values } if shown == field => Ok(values
                .iter()
                .filter(|v| v.checked)
                .map(|v| v.value.clone())
                .collect()),
            _ => Ok(Vec::new()),
        }
    }
}

impl SelectionObserver for FilterPanel {
    fn governs(&self, field: &str) -> bool {
        self.governed.contains(field)
    }

    fn selection_changed(&mut self, change: &SelectionChanged, table: &Table, exclusive: bool) {
        let column = match table.column(&change.field) {
            Ok(column) => column,
            Err(err) => {
                log::error!("unable to update filter values: {err}");
                self.state = FilterState::Empty;
                return;
            }
        };

        if !filter_available(exclusive, column.distinct_count()) {
            log::warn!(
                "field '{}' has {} distinct values, filtering not available",
                change.field,
                column.distinct_count()
            );
            self.state = FilterState::Unavailable {
                field: change.field.clone(),
            };
            return;
        }

        self.state = if change.checked {
            FilterState::Values {
                field: change.field.clone(),
                values: column
                    .distinct()
                    .into_iter()
                    .map(|value| FilterValue {
                        value: value.to_string(),
                        checked: true,
                    })
                    .collect(),
            }
        } else {
            FilterState::Empty
        };
    }
}

fn all_values(table: &Table, field: &str) -> Result<Vec<String>, TableError> {
    Ok(table
        .column(field)?
        .distinct()
        .into_iter()
        .map(str::to_string)
        .collect())
}
