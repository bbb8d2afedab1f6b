//! Request path matching
//!
//! Every dynamic endpoint is addressed as `/<action>[/<remainder>]`, where the
//! remainder may only contain ASCII letters, digits and slashes. The remainder
//! is handed to the handler as the page title; an empty remainder is allowed.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VALID_PATH: Regex = Regex::new(
        r"^/(edit|save|view|delete|create|upload|RMSD|review|signin|signup|register|movie)(?:/([a-zA-Z0-9/]*))?$"
    )
    .expect("route pattern is valid");
}

/// Action named by the first path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
    Delete,
    Create,
    Upload,
    Rmsd,
    Review,
    Movie,
    Signup,
    Signin,
    Register,
}

impl Action {
    fn from_segment(segment: &str) -> Option<Self> {
        Some(match segment {
            "view" => Action::View,
            "edit" => Action::Edit,
            "save" => Action::Save,
            "delete" => Action::Delete,
            "create" => Action::Create,
            "upload" => Action::Upload,
            "RMSD" => Action::Rmsd,
            "review" => Action::Review,
            "movie" => Action::Movie,
            "signup" => Action::Signup,
            "signin" => Action::Signin,
            "register" => Action::Register,
            _ => return None,
        })
    }
}

/// A matched request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub action: Action,
    /// Path remainder after the action, possibly empty
    pub title: String,
}

/// Match a request path, or `None` if it names no known action
pub fn match_route(path: &str) -> Option<Route> {
    let caps = VALID_PATH.captures(path)?;
    let action = Action::from_segment(caps.get(1)?.as_str())?;
    let title = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    Some(Route {
        action,
        title: title.to_string(),
    })
}
