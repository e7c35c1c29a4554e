#![forbid(unsafe_code)]

//! Markup projection for the TechElevate portal.
//!
//! Thin by design: pure functions from document slices to HTML fragment
//! strings. No DOM, no event wiring; the embedding page owns both.

pub mod dashboard;
pub mod escape;
pub mod fragments;
pub mod time_fmt;

pub use dashboard::dashboard;
pub use escape::escape;
pub use fragments::{
    activities_list, materials_list, progress_list, student_questions_list,
    teacher_questions_list,
};
pub use time_fmt::format_date;
