use std::fmt::Display;

/// Turns any displayable error into a `String` error with some context, which
/// is the error type used at the boundary between user actions and the UI.
pub trait ErrorStringExt<T> {
    fn err_to_string(self, context: &str) -> Result<T, String>;
}

impl<T, E: Display> ErrorStringExt<T> for Result<T, E> {
    fn err_to_string(self, context: &str) -> Result<T, String> {
        self.map_err(|err| format!("{context}: {err}"))
    }
}
