mod dataset_tabs;
mod plotter;
mod selection_dock;
mod selector;

pub use dataset_tabs::DatasetTabs;
#[cfg(test)]
pub use dataset_tabs::FieldRole;
pub use plotter::{save_svg, Plotter};
pub use selection_dock::SelectionDock;
pub use selector::{FieldSelector, SelectionChanged, SelectorInput};
