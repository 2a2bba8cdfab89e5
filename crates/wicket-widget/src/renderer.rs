//! Content-type-dispatched projection of history entries.
//!
//! One `CalledCommand` becomes one `RenderedEntry`: the tokens joined by
//! single spaces as the visible command line, and a body derived from the
//! result's content kind. Markup bodies are parsed into a self-contained
//! fragment (the isolated rendering scope) and their `<script>` elements
//! are re-executed explicitly: inline sources run through the `ScriptHost`
//! with a handle bound to the fragment root, external sources are handed
//! to the host's loader.

use wicket_terminal::{CalledCommand, Payload};
use wicket_ui::markup::parse_fragment;
use wicket_ui::script::{NullScriptHost, ScopeHandle, ScriptHost};
use wicket_ui::surface::{RenderedBody, RenderedEntry};

/// Projects history entries into rendered transcript entries.
pub struct Renderer {
    script_host: Box<dyn ScriptHost>,
}

impl Renderer {
    /// Renderer with the default (no-op) script host.
    pub fn new() -> Self {
        Self {
            script_host: Box::new(NullScriptHost),
        }
    }

    /// Renderer with a host-supplied script executor.
    pub fn with_script_host(script_host: Box<dyn ScriptHost>) -> Self {
        Self { script_host }
    }

    /// Render one entry. Script-host failures are logged and do not abort
    /// the projection; the fragment still renders.
    pub fn render(&mut self, entry: &CalledCommand) -> RenderedEntry {
        let body = match entry.result.as_ref().and_then(|r| r.payload.as_ref()) {
            None => RenderedBody::Empty,
            Some(Payload::Text(text)) => RenderedBody::Text(text.clone()),
            Some(Payload::Json(value)) => RenderedBody::Text(value.to_string()),
            Some(Payload::Blob(bytes)) => RenderedBody::Text(format!("[{} bytes]", bytes.len())),
            Some(Payload::Markup(source)) => self.render_markup(source),
        };
        RenderedEntry {
            command_line: entry.line(),
            body,
        }
    }

    fn render_markup(&mut self, source: &str) -> RenderedBody {
        let mut fragment = parse_fragment(source);
        let root = fragment.root;
        for script_id in fragment.scripts() {
            if let Some(src) = fragment.attribute(script_id, "src") {
                let src = src.to_string();
                if let Err(e) = self.script_host.load_external(&src) {
                    log::warn!("external script load failed ({src}): {e}");
                }
                continue;
            }
            let inline = fragment.text_content(script_id);
            if inline.is_empty() {
                continue;
            }
            let scope = ScopeHandle::new(&mut fragment, root);
            if let Err(e) = self.script_host.run_inline(&inline, scope) {
                log::warn!("inline script failed: {e}");
            }
        }
        RenderedBody::Scope(fragment)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
