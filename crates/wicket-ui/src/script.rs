//! Script execution boundary for markup results.
//!
//! Inline scripts embedded in a rendered fragment are handed to the host's
//! `ScriptHost` together with a handle scoped to that fragment only -- the
//! script can read and mutate its own rendered subtree but has no path to
//! the host page. External-source scripts are forwarded to the host's
//! loader untouched.

use wicket_types::error::Result;

use crate::markup::{Fragment, NodeId};

/// Mutable view over one isolated fragment, rooted at the scope boundary.
pub struct ScopeHandle<'a> {
    fragment: &'a mut Fragment,
    root: NodeId,
}

impl<'a> ScopeHandle<'a> {
    pub fn new(fragment: &'a mut Fragment, root: NodeId) -> Self {
        Self { fragment, root }
    }

    /// The scope's root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read-only view of the fragment.
    pub fn fragment(&self) -> &Fragment {
        self.fragment
    }

    /// Replace the text of every element in scope with the given class.
    pub fn set_text_by_class(&mut self, class: &str, text: &str) -> usize {
        let targets = self.fragment.elements_by_class(self.root, class);
        for &id in &targets {
            self.fragment.set_text(id, text);
        }
        targets.len()
    }
}

/// Host-supplied script execution.
pub trait ScriptHost {
    /// Run one inline script against its fragment scope.
    fn run_inline(&mut self, source: &str, scope: ScopeHandle<'_>) -> Result<()>;

    /// Request loading of an external script by its `src` value.
    fn load_external(&mut self, src: &str) -> Result<()>;
}

/// Default host: inline scripts are ignored, external loads are logged.
pub struct NullScriptHost;

impl ScriptHost for NullScriptHost {
    fn run_inline(&mut self, _source: &str, _scope: ScopeHandle<'_>) -> Result<()> {
        Ok(())
    }

    fn load_external(&mut self, src: &str) -> Result<()> {
        log::debug!("external script ignored by null host: {src}");
        Ok(())
    }
}
