//! # Fetch State
//!
//! Lifecycle of one kind of provider request:
//!
//! ```text
//! Idle ──begin()──► Loading ──complete(Ok)──► Success
//!                      │
//!                      └────complete(Err)───► Failed ──begin()──► Loading
//! ```
//!
//! Every `begin()` hands out a fresh [`RequestId`]. A completion carrying any
//! other id is stale and is dropped, so a slow answer for an old request can
//! never overwrite the state of a newer one.

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
    pending: Option<RequestId>,
    next_id: RequestId,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchState<T> {
    pub fn new() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
            pending: None,
            next_id: 1,
        }
    }

    /// Enters Loading, keeping any previous data around until the answer
    /// arrives.
    pub fn begin(&mut self) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending = Some(id);
        self.loading = true;
        self.error = None;
        id
    }

    /// Enters Loading and drops previous data immediately.
    pub fn restart(&mut self) -> RequestId {
        self.data = None;
        self.begin()
    }

    /// The id of the request currently in flight, if any.
    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    /// Applies a completion. Returns `false` (and changes nothing) when `id`
    /// is not the request in flight.
    pub fn complete(&mut self, id: RequestId, result: Result<T, String>) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(message) => {
                self.data = None;
                self.error = Some(message);
            }
        }
        true
    }

    pub fn status(&self) -> FetchStatus {
        if self.loading {
            FetchStatus::Loading
        } else if self.error.is_some() {
            FetchStatus::Failed
        } else if self.data.is_some() {
            FetchStatus::Success
        } else {
            FetchStatus::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_idle() {
        let state: FetchState<String> = FetchState::new();
        assert_eq!(state.status(), FetchStatus::Idle);
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn test_success_path() {
        let mut state = FetchState::new();
        let id = state.begin();
        assert_eq!(state.status(), FetchStatus::Loading);
        assert!(state.complete(id, Ok("texto")));
        assert_eq!(state.status(), FetchStatus::Success);
        assert_eq!(state.data, Some("texto"));
    }

    #[test]
    fn test_failure_then_retry_clears_error() {
        let mut state: FetchState<&str> = FetchState::new();
        let id = state.begin();
        state.complete(id, Err("falhou".to_string()));
        assert_eq!(state.status(), FetchStatus::Failed);

        let retry = state.begin();
        assert_eq!(state.status(), FetchStatus::Loading);
        assert_eq!(state.error, None);
        state.complete(retry, Ok("ok"));
        assert_eq!(state.status(), FetchStatus::Success);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut state = FetchState::new();
        let old = state.begin();
        let new = state.begin();
        assert_ne!(old, new);
        assert!(!state.complete(old, Ok(1)));
        assert!(state.loading);
        assert_eq!(state.data, None);
        assert!(state.complete(new, Ok(2)));
        assert_eq!(state.data, Some(2));
        // Late duplicate of a finished request is ignored too
        assert!(!state.complete(new, Ok(3)));
        assert_eq!(state.data, Some(2));
    }

    #[test]
    fn test_begin_keeps_data_restart_drops_it() {
        let mut state = FetchState::new();
        let id = state.begin();
        state.complete(id, Ok(vec![1]));
        state.begin();
        assert_eq!(state.data, Some(vec![1]));
        state.restart();
        assert_eq!(state.data, None);
    }
}
