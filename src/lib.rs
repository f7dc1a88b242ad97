use std::collections::{HashMap, HashSet};
use std::error::Error as StdError;
use std::fmt;

mod actions;
mod dom;
mod html;
mod page;
mod selector;
mod widgets;
mod wiring;

#[cfg(test)]
mod tests;

pub(crate) use actions::{Action, ActionStore};
pub(crate) use dom::{Dom, NodeId};
pub(crate) use widgets::WidgetRegistry;
pub(crate) use wiring::PageWiring;

pub use actions::{DialogId, SubmitEndpoint};
pub use page::{FormSubmission, Page, PopupOutcome, PopupPolicy, PopupRequest};
pub use widgets::WidgetKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    SelectorNotFound(String),
    UnsupportedSelector(String),
    Widget(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::Widget(msg) => write!(f, "widget attach error: {msg}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}
