//! Screen routes and the navigation / confirmation seams

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

/// Screens of the application. Only an item id travels between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    List,
    /// `/create`
    Create,
    /// `/item/:id`
    Detail(i64),
    /// `/update/:id`
    Update(i64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Invalid or missing ID")]
    InvalidId,

    #[error("Unknown route: {0}")]
    Unknown(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Create => "/create".to_string(),
            Route::Detail(id) => format!("/item/{}", id),
            Route::Update(id) => format!("/update/{}", id),
        }
    }

    /// Parse a path such as `/update/12`.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();

        match segments.as_slice() {
            [] | [""] => Ok(Route::List),
            ["create"] => Ok(Route::Create),
            ["item"] | ["update"] => Err(RouteError::InvalidId),
            ["item", id] => parse_id(id).map(Route::Detail),
            ["update", id] => parse_id(id).map(Route::Update),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, RouteError> {
    raw.parse::<i64>().map_err(|_| RouteError::InvalidId)
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

/// Moves the user between screens
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);

    /// Return to the previous screen.
    fn back(&self);
}

/// Asks the user to approve a destructive action
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// In-memory navigation history
#[derive(Debug)]
pub struct History {
    stack: Mutex<Vec<Route>>,
}

impl Default for History {
    fn default() -> Self {
        Self::starting_at(Route::List)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(route: Route) -> Self {
        Self {
            stack: Mutex::new(vec![route]),
        }
    }

    /// The screen currently shown.
    pub fn current(&self) -> Route {
        self.stack
            .lock()
            .ok()
            .and_then(|stack| stack.last().copied())
            .unwrap_or(Route::List)
    }

    /// Every route visited, oldest first.
    pub fn visited(&self) -> Vec<Route> {
        self.stack
            .lock()
            .map(|stack| stack.clone())
            .unwrap_or_default()
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        if let Ok(mut stack) = self.stack.lock() {
            stack.push(route);
        }
    }

    fn back(&self) {
        if let Ok(mut stack) = self.stack.lock() {
            if stack.len() > 1 {
                stack.pop();
            }
        }
    }
}
