//! Cancellation scopes
//!
//! A `Scope` is a cancellation-bearing lifetime handle for the background
//! tasks of one selection level. Scopes nest: the tab scope is a child of the
//! pod scope, which is a child of the namespace scope. Cancelling a scope
//! cancels every descendant token, and tasks observe it cooperatively at
//! their next suspension point; nothing is force-killed.

use tokio_util::sync::CancellationToken;

pub(crate) struct Scope {
    token: CancellationToken,
}

impl Scope {
    pub(crate) fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Child scope, cancelled transitively with its parent
    pub(crate) fn child(&self) -> Scope {
        Scope {
            token: self.token.child_token(),
        }
    }

    /// Token handed to tasks spawned under this scope
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

// Replacing a scope in an Option slot drops the old one, which is exactly the
// replace-on-create rule: the previous task tree is cancelled first.
impl Drop for Scope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
