#![warn(clippy::all, rust_2018_idioms)]

pub mod event;
pub mod string_error;
