//! Line-mode demo host.
//!
//! Drives the terminal widget from stdin: each line becomes a stream of
//! `TextInput` events followed by `Submit`, and deferred executions are
//! polled to completion before the next prompt. An optional first argument
//! names a TOML configuration file.

use std::io::{self, BufRead, Write};

use wicket_types::config::WidgetConfig;
use wicket_types::error::Result;
use wicket_types::input::InputEvent;
use wicket_ui::session::InputCell;
use wicket_ui::surface::{RenderedBody, RenderedEntry, Surface};
use wicket_widget::{TerminalWidget, WidgetAction};

/// Surface that appends transcript bodies to stdout.
struct StdoutSurface;

impl Surface for StdoutSurface {
    fn mount(&mut self) -> Result<()> {
        Ok(())
    }

    fn unmount(&mut self) {}

    // The prompt and echo are handled by the line loop; nothing to redraw.
    fn set_input_line(&mut self, _cells: &[InputCell]) {}

    fn push_entry(&mut self, entry: &RenderedEntry) {
        match &entry.body {
            RenderedBody::Empty => {},
            RenderedBody::Text(text) => {
                if !text.is_empty() {
                    println!("{text}");
                }
            },
            RenderedBody::Scope(fragment) => {
                let text = fragment.text_content(fragment.root);
                if !text.is_empty() {
                    println!("{text}");
                }
            },
        }
    }

    fn clear_entries(&mut self) {
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => WidgetConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => WidgetConfig::default(),
    };
    let prompt = config.prompt.clone();

    let mut widget = TerminalWidget::new(config);
    widget.set_surface(StdoutSurface);
    widget.attach()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{prompt}");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        for ch in line?.chars() {
            widget.handle_input(&InputEvent::TextInput(ch))?;
        }
        if widget.handle_input(&InputEvent::Submit)? == WidgetAction::Exit {
            return Ok(());
        }
        while widget.has_pending() {
            if widget.poll()? == WidgetAction::Exit {
                return Ok(());
            }
        }
    }

    widget.detach();
    Ok(())
}
