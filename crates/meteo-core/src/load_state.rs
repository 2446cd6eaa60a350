//! Load state machine for views that fetch remote data (search, forecast).
//!
//! A view starts `Idle`, goes `Loading` when a request is issued and ends in
//! `Loaded` or `Failed` when the result arrives. Used by the UI models.

/// Lifecycle of one remote fetch as seen by a view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    /// True if a new request can be started.
    pub fn can_start(&self) -> bool {
        !self.is_loading()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// State after issuing a request. Previous data is dropped, not merged.
    pub fn on_start(self) -> Self {
        LoadState::Loading
    }

    /// State after the request completes. Clears the loading indicator either way.
    pub fn on_done<E: std::fmt::Display>(self, result: Result<T, E>) -> Self {
        match result {
            Ok(data) => LoadState::Loaded(data),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}
