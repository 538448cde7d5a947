// src/state/route.rs
//! Address-bar paths, what they show, and what they fetch.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    History,
    Analysis,
    NotFound,
}

/// What caused a path to be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// First frame, or a reload of the current entry.
    Initial,
    /// Back/forward through the history stack.
    HistoryPop,
    /// A navigation link or the address bar.
    Navigate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    TimeSeries,
    Sessions,
    Analysis(Option<i64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Keep,
    Clear,
    Pin(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub route: Route,
    pub session: SessionChange,
    pub fetches: Vec<Fetch>,
}

/// Canonical form: leading slash, no query or fragment, no trailing slash.
pub fn normalize(path: &str) -> String {
    let path = path.trim();
    let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

pub fn resolve(path: &str, trigger: Trigger) -> Navigation {
    let path = normalize(path);
    let segments: Vec<&str> = path.split('/').skip(1).collect();

    let (route, session, fetches) = match segments.as_slice() {
        [""] => {
            let fetches = match trigger {
                Trigger::Initial => vec![Fetch::TimeSeries, Fetch::Sessions],
                Trigger::HistoryPop | Trigger::Navigate => vec![Fetch::TimeSeries],
            };
            (Route::Home, SessionChange::Clear, fetches)
        }
        ["history"] => (Route::History, SessionChange::Clear, vec![Fetch::Sessions]),
        ["analysis"] => (Route::Analysis, SessionChange::Clear, vec![Fetch::Analysis(None)]),
        ["analysis", id] => match id.parse::<i64>() {
            Ok(id) => (Route::Analysis, SessionChange::Pin(id), vec![Fetch::Analysis(Some(id))]),
            Err(_) => (Route::Analysis, SessionChange::Clear, vec![Fetch::Analysis(None)]),
        },
        _ => (Route::NotFound, SessionChange::Keep, Vec::new()),
    };

    Navigation { path, route, session, fetches }
}

pub fn analysis_path(session_id: i64) -> String {
    format!("/analysis/{}", session_id)
}

/// Back/forward stack of visited paths.
#[derive(Debug, Clone)]
pub struct NavHistory {
    entries: Vec<String>,
    index: usize,
}

impl NavHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![normalize(initial)],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Add an entry after the current one, dropping any forward entries.
    /// Pushing the current path again is a no-op.
    pub fn push(&mut self, path: &str) {
        let path = normalize(path);
        if path == self.current() {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        self.index = self.entries.len() - 1;
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<String> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        Some(self.current().to_string())
    }

    pub fn forward(&mut self) -> Option<String> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        Some(self.current().to_string())
    }
}
