use std::path::Path;

use app_core::{event::EventState, string_error::ErrorStringExt};
use csv_table::{Table, TableError};

use super::{DatasetPanel, DatasetTab, DatasetTabs, FieldRole};
use crate::app::components::{SelectionChanged, SelectorInput};

impl DatasetTabs {
    /// `requested` if no tab has that name yet, otherwise `requested`
    /// followed by the smallest free index, starting at 0.
    pub fn unique_name(&self, requested: &str) -> String {
        if !self.contains(requested) {
            return requested.to_string();
        }
        (0..)
            .map(|i| format!("{requested}{i}"))
            .find(|name| !self.contains(name))
            .unwrap_or_else(|| requested.to_string())
    }

    /// Register a new tab for `table` and make it the active one. Returns
    /// the name the tab was registered under.
    pub fn add_dataset(&mut self, table: Table, requested: &str) -> String {
        let name = self.unique_name(requested);
        log::debug!(
            "registering dataset '{name}' with {} fields and {} rows",
            table.num_columns(),
            table.num_rows()
        );
        let panel = DatasetPanel::new(&table.field_names());
        self.tabs.push(DatasetTab {
            name: name.clone(),
            table,
            panel,
        });
        self.active_tab = self.tabs.len() - 1;
        name
    }

    /// Load the file at `path` into a new tab. Only CSV files are supported,
    /// any other extension is reported as a warning and no tab is created.
    pub fn load_file(&mut self, path: &Path) -> Result<EventState, String> {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            log::warn!("file format not supported yet: '{}'", path.display());
            return Ok(EventState::warning(format!(
                "file format not supported yet: {}",
                path.display()
            )));
        }

        let table = Table::from_path(path)
            .err_to_string(&format!("could not load '{}'", path.display()))?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("dataset");
        let name = self.add_dataset(table, stem);
        Ok(EventState::success(format!(
            "loaded '{}' as '{name}'",
            path.display()
        )))
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        self.tabs.iter().map(|tab| tab.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatasetTab> {
        self.tabs.iter()
    }

    pub fn tab(&self, name: &str) -> Option<&DatasetTab> {
        self.tabs.iter().find(|tab| tab.name == name)
    }

    pub fn checked_x(&self, tab: &str) -> Option<Vec<String>> {
        self.tab(tab).map(|t| t.panel.checked(FieldRole::X))
    }

    pub fn checked_y(&self, tab: &str) -> Option<Vec<String>> {
        self.tab(tab).map(|t| t.panel.checked(FieldRole::Y))
    }

    pub fn checked_filter_fields(&self, tab: &str) -> Option<Vec<String>> {
        self.tab(tab).map(|t| t.panel.checked(FieldRole::Filter))
    }

    pub fn checked_filter_values(
        &self,
        tab: &str,
        field: &str,
    ) -> Option<Result<Vec<String>, TableError>> {
        self.tab(tab).map(|t| {
            t.panel
                .selector(FieldRole::Filter)
                .checked_filter_values(field, &t.table)
        })
    }

    /// Check or uncheck a field of a tab, as if the user clicked it.
    pub fn set_checked(
        &mut self,
        tab: &str,
        role: FieldRole,
        field: &str,
        checked: bool,
    ) -> Option<Vec<SelectionChanged>> {
        let DatasetTab { table, panel, .. } = self.tabs.iter_mut().find(|t| t.name == tab)?;
        Some(panel.selector_mut(role).set_checked(field, checked, table))
    }

    pub fn set_filter_value_checked(&mut self, tab: &str, value: &str, checked: bool) {
        if let Some(panel) = self
            .tabs
            .iter_mut()
            .find(|t| t.name == tab)
            .and_then(|t| t.panel.selector_mut(FieldRole::Filter).filter_panel_mut())
        {
            panel.set_value_checked(value, checked);
        }
    }

    /// Apply a checkbox click from the selectors of `tab`.
    pub fn apply_input(&mut self, tab: &str, role: FieldRole, input: SelectorInput) {
        match input {
            SelectorInput::Field { name, checked } => {
                self.set_checked(tab, role, &name, checked);
            }
            SelectorInput::FilterValue { value, checked } => {
                self.set_filter_value_checked(tab, &value, checked);
            }
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.tabs.iter().any(|tab| tab.name == name)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use app_core::event::ActionOutcome;

    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn table() -> Table {
        Table::parse("X,Y,Z\n1,10,a\n2,20,a\n3,30,b\n").unwrap()
    }

    #[test]
    fn test_unique_names() {
        init();
        let mut tabs = DatasetTabs::default();
        assert_eq!(tabs.add_dataset(table(), "A"), "A");
        assert_eq!(tabs.add_dataset(table(), "A"), "A0");
        assert_eq!(tabs.add_dataset(table(), "A"), "A1");
        assert_eq!(tabs.add_dataset(table(), "B"), "B");
        assert_eq!(tabs.names(), vec!["A", "A0", "A1", "B"]);
        assert_eq!(tabs.unique_name("A"), "A2");
    }

    #[test]
    fn test_accessors() {
        init();
        let mut tabs = DatasetTabs::default();
        tabs.add_dataset(table(), "A");
        tabs.set_checked("A", FieldRole::X, "X", true);
        tabs.set_checked("A", FieldRole::Y, "Y", true);
        tabs.set_checked("A", FieldRole::Y, "X", true);
        tabs.set_checked("A", FieldRole::Filter, "Z", true);

        assert_eq!(tabs.checked_x("A").unwrap(), vec!["X"]);
        assert_eq!(tabs.checked_y("A").unwrap(), vec!["X", "Y"]);
        assert_eq!(tabs.checked_filter_fields("A").unwrap(), vec!["Z"]);
        assert_eq!(
            tabs.checked_filter_values("A", "Z").unwrap().unwrap(),
            vec!["a", "b"]
        );

        tabs.set_filter_value_checked("A", "a", false);
        assert_eq!(
            tabs.checked_filter_values("A", "Z").unwrap().unwrap(),
            vec!["b"]
        );

        assert!(tabs.checked_x("nope").is_none());
        assert!(tabs.set_checked("nope", FieldRole::X, "X", true).is_none());
    }

    #[test]
    fn test_clicks_are_applied_like_programmatic_changes() {
        init();
        let mut tabs = DatasetTabs::default();
        tabs.add_dataset(table(), "A");
        let click = |name: &str, checked| SelectorInput::Field {
            name: name.to_string(),
            checked,
        };

        tabs.apply_input("A", FieldRole::X, click("X", true));
        tabs.apply_input("A", FieldRole::X, click("Y", true));
        assert_eq!(tabs.checked_x("A").unwrap(), vec!["Y"]);

        tabs.apply_input("A", FieldRole::Filter, click("Z", true));
        tabs.apply_input(
            "A",
            FieldRole::Filter,
            SelectorInput::FilterValue {
                value: "b".to_string(),
                checked: false,
            },
        );
        assert_eq!(
            tabs.checked_filter_values("A", "Z").unwrap().unwrap(),
            vec!["a"]
        );

        // unknown tabs are ignored
        tabs.apply_input("nope", FieldRole::Y, click("Y", true));
        assert!(tabs.checked_y("A").unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_format_creates_no_tab() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "X,Y\n1,2\n").unwrap();

        let mut tabs = DatasetTabs::default();
        let state = tabs.load_file(&path).unwrap();
        assert!(matches!(
            state,
            EventState::Finished(ActionOutcome::Warning(_))
        ));
        assert!(tabs.is_empty());
    }

    #[test]
    fn test_load_csv_uses_file_stem() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.CSV");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# exported by logger").unwrap();
        writeln!(file, "time;value").unwrap();
        writeln!(file, "12:00:00;1.5").unwrap();
        drop(file);

        let mut tabs = DatasetTabs::default();
        tabs.load_file(&path).unwrap();
        tabs.load_file(&path).unwrap();
        assert_eq!(tabs.names(), vec!["run", "run0"]);
        assert_eq!(tabs.tab("run").unwrap().table.field_names(), vec!["time", "value"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        init();
        let dir = tempfile::tempdir().unwrap();
        let mut tabs = DatasetTabs::default();
        assert!(tabs.load_file(&dir.path().join("missing.csv")).is_err());
        assert!(tabs.is_empty());
    }
}
