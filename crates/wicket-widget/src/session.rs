//! The terminal widget facade.
//!
//! `TerminalWidget` ties the pieces together: the command registry, the
//! history store, the input session, the renderer, and the host-supplied
//! display surface. The host feeds it `InputEvent`s and calls `poll()` once
//! per frame to advance deferred executions; everything else happens inside.
//!
//! Lifecycle: configure a surface, `attach()` to mount it, then pump events
//! until `handle_input` or `poll` returns `WidgetAction::Exit`.

use std::cell::RefCell;
use std::rc::Rc;

use wicket_terminal::{
    CalledCommand, CommandRegistry, CommandResult, Dispatch, HistoryStore, PendingDispatch,
    register_builtins,
};
use wicket_types::config::WidgetConfig;
use wicket_types::error::{Result, WicketError};
use wicket_types::input::InputEvent;
use wicket_ui::script::ScriptHost;
use wicket_ui::session::{InputCell, InputSession, SessionAction};
use wicket_ui::surface::{RenderedBody, RenderedEntry, Surface};

use crate::meta::{SessionControl, register_meta_commands};
use crate::renderer::Renderer;

/// What the host should do after pumping the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    /// Keep the session running.
    Continue,
    /// The session ended (exit command); the surface is already unmounted.
    Exit,
}

/// An embeddable command-line interpreter bound to one display surface.
pub struct TerminalWidget<S: Surface> {
    config: WidgetConfig,
    registry: CommandRegistry,
    history: Rc<RefCell<HistoryStore>>,
    input: InputSession,
    renderer: Renderer,
    control: SessionControl,
    surface: Option<S>,
    attached: bool,
    /// In-flight deferred executions, submission-ordered. Results are
    /// appended to the transcript in completion order, not this order.
    pending: Vec<(Vec<String>, PendingDispatch)>,
}

impl<S: Surface> TerminalWidget<S> {
    /// Build a widget with the built-in and session-bound commands
    /// registered. No surface is configured yet.
    pub fn new(config: WidgetConfig) -> Self {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry);
        let control = SessionControl::new();
        let history = Rc::new(RefCell::new(HistoryStore::with_max(config.max_history)));
        register_meta_commands(&mut registry, &control, &history);
        Self {
            config,
            registry,
            history,
            input: InputSession::new(),
            renderer: Renderer::new(),
            control,
            surface: None,
            attached: false,
            pending: Vec::new(),
        }
    }

    /// Replace the script host used for markup results.
    pub fn set_script_host(&mut self, host: Box<dyn ScriptHost>) {
        self.renderer = Renderer::with_script_host(host);
    }

    /// Mutable access to the registry, for host-defined commands.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    /// Supply the display surface. Must happen before `attach`.
    pub fn set_surface(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    /// The configured surface, if any.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of retained history entries.
    pub fn history_len(&self) -> usize {
        self.history.borrow().len()
    }

    /// Whether any deferred executions are still in flight.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Mount the surface and start the session.
    ///
    /// Attaching without a configured surface is a hard error: there is
    /// nothing to degrade to.
    pub fn attach(&mut self) -> Result<()> {
        let Some(surface) = self.surface.as_mut() else {
            return Err(WicketError::Session(
                "attach without a configured surface".into(),
            ));
        };
        surface.mount()?;
        self.attached = true;
        if !self.config.welcome.is_empty() {
            surface.push_entry(&RenderedEntry {
                command_line: String::new(),
                body: RenderedBody::Text(self.config.welcome.clone()),
            });
        }
        self.input.reset_history_cursor(self.history.borrow().len());
        self.redraw_input();
        log::info!("terminal attached");
        Ok(())
    }

    /// Unmount the surface and stop the session. In-flight executions are
    /// discarded; history survives for the next attach.
    pub fn detach(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.unmount();
        }
        self.pending.clear();
        self.attached = false;
        log::info!("terminal detached");
    }

    /// Feed one input event through the session.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<WidgetAction> {
        if !self.attached {
            return Err(WicketError::Session("input on a detached terminal".into()));
        }
        let action = {
            let history = self.history.borrow();
            self.input.handle_event(event, &history)
        };
        match action {
            SessionAction::None => Ok(WidgetAction::Continue),
            SessionAction::Redraw => {
                self.redraw_input();
                Ok(WidgetAction::Continue)
            },
            SessionAction::Submit(tokens) => {
                self.redraw_input();
                self.submit(tokens)
            },
        }
    }

    /// Advance in-flight executions. Completed results are recorded and
    /// rendered in the order they complete.
    pub fn poll(&mut self) -> Result<WidgetAction> {
        if self.pending.is_empty() {
            return Ok(WidgetAction::Continue);
        }
        let mut still_pending = Vec::new();
        let mut completed = Vec::new();
        for (tokens, mut dispatch) in self.pending.drain(..) {
            match dispatch.poll() {
                Some(result) => completed.push((tokens, result)),
                None => still_pending.push((tokens, dispatch)),
            }
        }
        self.pending = still_pending;

        let mut action = WidgetAction::Continue;
        for (tokens, result) in completed {
            if self.finish(tokens, result)? == WidgetAction::Exit {
                action = WidgetAction::Exit;
            }
        }
        Ok(action)
    }

    fn submit(&mut self, tokens: Vec<String>) -> Result<WidgetAction> {
        log::debug!("submit: {tokens:?}");
        match self.registry.dispatch(&tokens) {
            Dispatch::Done(result) => self.finish(tokens, result),
            Dispatch::Pending(dispatch) => {
                self.pending.push((tokens, dispatch));
                Ok(WidgetAction::Continue)
            },
        }
    }

    /// Record and render one completed command, then apply any session
    /// effect its dispatch requested.
    fn finish(&mut self, tokens: Vec<String>, result: CommandResult) -> Result<WidgetAction> {
        let entry = CalledCommand::new(tokens, Some(result));
        let recorded = self.history.borrow_mut().record(entry.clone());
        if recorded && let Some(surface) = self.surface.as_mut() {
            let rendered = self.renderer.render(&entry);
            surface.push_entry(&rendered);
        }
        self.input.reset_history_cursor(self.history.borrow().len());
        self.apply_control()
    }

    fn apply_control(&mut self) -> Result<WidgetAction> {
        if self.control.take_clear() {
            self.history.borrow_mut().clear();
            if let Some(surface) = self.surface.as_mut() {
                surface.clear_entries();
            }
            self.input.reset_history_cursor(0);
            log::debug!("history and transcript cleared");
        }
        if self.control.take_exit() {
            self.detach();
            return Ok(WidgetAction::Exit);
        }
        Ok(WidgetAction::Continue)
    }

    /// Re-render the input line: inactive prompt cells followed by the
    /// session's display cells.
    fn redraw_input(&mut self) {
        let mut cells: Vec<InputCell> = self
            .config
            .prompt
            .chars()
            .map(|ch| InputCell { ch, active: false })
            .collect();
        cells.extend(self.input.display_cells());
        if let Some(surface) = self.surface.as_mut() {
            surface.set_input_line(&cells);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicket_terminal::{Command, Completion, PendingExecution};
    use wicket_ui::surface::MemorySurface;

    fn widget() -> TerminalWidget<MemorySurface> {
        let mut w = TerminalWidget::new(WidgetConfig::default());
        w.set_surface(MemorySurface::new());
        w.attach().unwrap();
        w
    }

    fn type_and_submit(w: &mut TerminalWidget<MemorySurface>, line: &str) -> WidgetAction {
        for ch in line.chars() {
            w.handle_input(&InputEvent::TextInput(ch)).unwrap();
        }
        w.handle_input(&InputEvent::Submit).unwrap()
    }

    fn entries(w: &TerminalWidget<MemorySurface>) -> &[RenderedEntry] {
        &w.surface().unwrap().entries
    }

    fn input_line(w: &TerminalWidget<MemorySurface>) -> String {
        w.surface()
            .unwrap()
            .input_line
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    /// Completes with `text` after `polls` calls to `poll()`.
    struct TickCmd {
        name: &'static str,
        polls: usize,
        text: &'static str,
    }

    impl Command for TickCmd {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "Completes after a fixed number of polls"
        }
        fn usage(&self) -> &str {
            self.name
        }
        fn execute(&self, _args: &[&str]) -> Result<Completion> {
            let needed = self.polls;
            let text = self.text;
            let mut seen = 0;
            Ok(Completion::Pending(PendingExecution::new(move || {
                seen += 1;
                if seen < needed {
                    None
                } else {
                    Some(Ok(CommandResult::text(text)))
                }
            })))
        }
    }

    #[test]
    fn attach_without_surface_errors() {
        let mut w: TerminalWidget<MemorySurface> = TerminalWidget::new(WidgetConfig::default());
        let err = w.attach().unwrap_err();
        assert!(matches!(err, WicketError::Session(_)));
        assert!(!w.is_attached());
    }

    #[test]
    fn attach_mounts_and_pushes_welcome() {
        let w = widget();
        assert!(w.is_attached());
        assert!(w.surface().unwrap().mounted);
        let e = &entries(&w)[0];
        assert_eq!(e.command_line, "");
        assert_eq!(
            e.body,
            RenderedBody::Text(WidgetConfig::default().welcome)
        );
    }

    #[test]
    fn prompt_prefixes_input_line() {
        let w = widget();
        assert!(input_line(&w).starts_with("> "));
    }

    #[test]
    fn echo_round_trip() {
        let mut w = widget();
        assert_eq!(type_and_submit(&mut w, "echo hi there"), WidgetAction::Continue);
        let e = entries(&w).last().unwrap();
        assert_eq!(e.command_line, "echo hi there");
        assert_eq!(e.body, RenderedBody::Text("hi there".to_string()));
        assert_eq!(w.history_len(), 1);
        // The input line clears on submit.
        assert_eq!(input_line(&w), "> ".to_string() + " ");
    }

    #[test]
    fn unknown_command_is_recorded_and_rendered() {
        let mut w = widget();
        type_and_submit(&mut w, "bogus");
        let e = entries(&w).last().unwrap();
        assert_eq!(e.command_line, "bogus");
        assert_eq!(
            e.body,
            RenderedBody::Text("command not found: bogus".to_string())
        );
        assert_eq!(w.history_len(), 1);
    }

    #[test]
    fn blank_submission_leaves_no_trace() {
        let mut w = widget();
        let before = entries(&w).len();
        assert_eq!(type_and_submit(&mut w, ""), WidgetAction::Continue);
        assert_eq!(entries(&w).len(), before);
        assert_eq!(w.history_len(), 0);
    }

    #[test]
    fn clear_empties_history_and_transcript() {
        let mut w = widget();
        type_and_submit(&mut w, "echo a");
        type_and_submit(&mut w, "echo b");
        assert_eq!(w.history_len(), 2);
        assert_eq!(type_and_submit(&mut w, "clear"), WidgetAction::Continue);
        assert_eq!(w.history_len(), 0);
        assert!(entries(&w).is_empty());
        // Cursor is back at the live position over an empty store.
        w.handle_input(&InputEvent::HistoryPrev).unwrap();
        assert!(input_line(&w).trim_start_matches("> ").trim().is_empty());
    }

    #[test]
    fn exit_detaches_and_reports_exit() {
        let mut w = widget();
        assert_eq!(type_and_submit(&mut w, "exit"), WidgetAction::Exit);
        assert!(!w.is_attached());
        assert!(!w.surface().unwrap().mounted);
        let err = w.handle_input(&InputEvent::TextInput('x')).unwrap_err();
        assert!(matches!(err, WicketError::Session(_)));
    }

    #[test]
    fn history_survives_detach_and_reattach() {
        let mut w = widget();
        type_and_submit(&mut w, "echo a");
        w.detach();
        w.attach().unwrap();
        assert_eq!(w.history_len(), 1);
        w.handle_input(&InputEvent::HistoryPrev).unwrap();
        assert!(input_line(&w).contains("echo a"));
    }

    #[test]
    fn pending_command_completes_on_poll() {
        let mut w = widget();
        w.registry_mut().register(Box::new(TickCmd {
            name: "tick",
            polls: 2,
            text: "done",
        }));
        type_and_submit(&mut w, "tick");
        let before = entries(&w).len();
        assert_eq!(w.history_len(), 0);
        assert_eq!(w.poll().unwrap(), WidgetAction::Continue);
        assert_eq!(entries(&w).len(), before);
        w.poll().unwrap();
        let e = entries(&w).last().unwrap();
        assert_eq!(e.command_line, "tick");
        assert_eq!(e.body, RenderedBody::Text("done".to_string()));
        assert_eq!(w.history_len(), 1);
    }

    #[test]
    fn transcript_appends_in_completion_order() {
        let mut w = widget();
        w.registry_mut().register(Box::new(TickCmd {
            name: "slow",
            polls: 2,
            text: "slow done",
        }));
        w.registry_mut().register(Box::new(TickCmd {
            name: "fast",
            polls: 1,
            text: "fast done",
        }));
        type_and_submit(&mut w, "slow");
        type_and_submit(&mut w, "fast");
        w.poll().unwrap();
        w.poll().unwrap();
        let lines: Vec<&str> = entries(&w)
            .iter()
            .skip(1) // welcome
            .map(|e| e.command_line.as_str())
            .collect();
        assert_eq!(lines, vec!["fast", "slow"]);
        assert_eq!(w.history.borrow().line_at(0), "fast");
        assert_eq!(w.history.borrow().line_at(1), "slow");
    }

    #[test]
    fn history_navigation_replays_previous_lines() {
        let mut w = widget();
        type_and_submit(&mut w, "echo a");
        type_and_submit(&mut w, "echo b");
        w.handle_input(&InputEvent::HistoryPrev).unwrap();
        assert!(input_line(&w).contains("echo b"));
        w.handle_input(&InputEvent::HistoryPrev).unwrap();
        assert!(input_line(&w).contains("echo a"));
        w.handle_input(&InputEvent::HistoryNext).unwrap();
        w.handle_input(&InputEvent::HistoryNext).unwrap();
        assert!(!input_line(&w).contains("echo"));
    }

    #[test]
    fn markup_result_renders_into_scope() {
        let mut w = widget();
        type_and_submit(&mut w, "time");
        w.poll().unwrap();
        let e = entries(&w).last().unwrap();
        assert_eq!(e.command_line, "time");
        match &e.body {
            RenderedBody::Scope(fragment) => {
                let text = fragment.text_content(fragment.root);
                assert!(text.contains(':'), "expected hh:mm:ss, got {text:?}");
            },
            other => panic!("expected scope body, got {other:?}"),
        }
    }

    #[test]
    fn max_history_config_caps_store() {
        let mut w = TerminalWidget::new(WidgetConfig {
            max_history: 2,
            ..WidgetConfig::default()
        });
        w.set_surface(MemorySurface::new());
        w.attach().unwrap();
        for line in ["echo a", "echo b", "echo c"] {
            type_and_submit(&mut w, line);
        }
        assert_eq!(w.history_len(), 2);
        assert_eq!(w.history.borrow().line_at(0), "echo b");
    }

    #[test]
    fn pending_discarded_on_detach() {
        let mut w = widget();
        w.registry_mut().register(Box::new(TickCmd {
            name: "tick",
            polls: 1,
            text: "done",
        }));
        type_and_submit(&mut w, "tick");
        w.detach();
        w.attach().unwrap();
        w.poll().unwrap();
        assert_eq!(w.history_len(), 0);
    }
}
