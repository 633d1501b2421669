//! Process-wide bookkeeping of injected vendor scripts.
//!
//! Several facade instances may want the same vendor script at the same
//! time; the registry guarantees a single injection per url. The loaded and
//! failed notifications are broadcast by the JavaScript side to every live
//! facade, which all report back here.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use crate::Logger;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScriptState {
    Loading,
    Loaded,
}

static REGISTRY: LazyLock<Mutex<HashMap<String, ScriptState>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// What the caller asking for a script should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScriptRequest {
    /// The script has executed; proceed immediately.
    AlreadyLoaded,
    /// Nobody asked for this url before; the caller must start the fetch.
    FetchNeeded,
    /// Another caller already started the fetch; wait for the loaded
    /// notification.
    Pending,
}

pub(crate) struct ScriptRegistry;

impl ScriptRegistry {
    /// Register interest in `url`, marking it in-flight if it was unknown.
    pub(crate) fn request(url: &str) -> ScriptRequest {
        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        match registry.get(url) {
            Some(ScriptState::Loaded) => {
                Logger::lazy_debug(&|| format!("{}: script is already loaded", url));
                ScriptRequest::AlreadyLoaded
            }
            Some(ScriptState::Loading) => {
                Logger::lazy_debug(&|| format!("{}: script fetch already in flight", url));
                ScriptRequest::Pending
            }
            None => {
                registry.insert(url.to_string(), ScriptState::Loading);
                ScriptRequest::FetchNeeded
            }
        }
    }

    /// Record that `url` has executed.
    pub(crate) fn mark_loaded(url: &str) {
        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        registry.insert(url.to_string(), ScriptState::Loaded);
    }

    /// Record that fetching `url` failed. Failures are not cached; the next
    /// request for the same url starts a fresh fetch.
    pub(crate) fn mark_failed(url: &str) {
        let mut registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        registry.remove(url);
    }

    /// Whether `url` has executed.
    pub(crate) fn is_loaded(url: &str) -> bool {
        let registry = REGISTRY.lock().unwrap_or_else(PoisonError::into_inner);
        registry.get(url) == Some(&ScriptState::Loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own urls, the registry is process-global.

    #[test]
    fn first_request_starts_the_fetch() {
        assert_eq!(
            ScriptRegistry::request("https://one.test/api.js"),
            ScriptRequest::FetchNeeded
        );
        assert_eq!(
            ScriptRegistry::request("https://one.test/api.js"),
            ScriptRequest::Pending
        );
    }

    #[test]
    fn loaded_scripts_answer_immediately() {
        ScriptRegistry::request("https://two.test/api.js");
        ScriptRegistry::mark_loaded("https://two.test/api.js");
        assert_eq!(
            ScriptRegistry::request("https://two.test/api.js"),
            ScriptRequest::AlreadyLoaded
        );
        assert!(ScriptRegistry::is_loaded("https://two.test/api.js"));
    }

    #[test]
    fn failures_allow_a_retry() {
        assert_eq!(
            ScriptRegistry::request("https://three.test/api.js"),
            ScriptRequest::FetchNeeded
        );
        ScriptRegistry::mark_failed("https://three.test/api.js");
        assert_eq!(
            ScriptRegistry::request("https://three.test/api.js"),
            ScriptRequest::FetchNeeded
        );
    }
}
