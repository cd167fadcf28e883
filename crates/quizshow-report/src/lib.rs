//! quizshow-report — Results page generation.

pub mod html;

pub use html::{generate_html, write_html_report};
