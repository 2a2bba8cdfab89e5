//! Built-in leaf commands.
//!
//! These are ordinary plugins consumed through the `Command` contract; the
//! session-bound meta-commands (clear, exit) live with the widget façade
//! because they need a session handle.

use std::time::{SystemTime, UNIX_EPOCH};

use wicket_types::error::Result;

use crate::contract::{Command, CommandResult, Completion, PendingExecution};

/// Register all built-in leaf commands into a registry.
pub fn register_builtins(reg: &mut crate::registry::CommandRegistry) {
    reg.register(Box::new(EchoCmd));
    reg.register(Box::new(TimeCmd));
    reg.register(Box::new(NoneCmd));
    reg.register(Box::new(JsonCmd));
    // The empty-name and null aliases both resolve to the no-op command.
    reg.register_alias("null", "none");
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn description(&self) -> &str {
        "Print arguments"
    }
    fn usage(&self) -> &str {
        "echo [text...]"
    }
    fn execute(&self, args: &[&str]) -> Result<Completion> {
        Ok(Completion::Ready(CommandResult::text(args.join(" "))))
    }
}

// ---------------------------------------------------------------------------
// time
// ---------------------------------------------------------------------------

/// Renders the current UTC wall-clock time as a markup fragment with an
/// inline script, exercising the isolated-scope rendering path. The result
/// is delivered as a deferred completion.
struct TimeCmd;
impl Command for TimeCmd {
    fn name(&self) -> &str {
        "time"
    }
    fn description(&self) -> &str {
        "Show the current time"
    }
    fn usage(&self) -> &str {
        "time"
    }
    fn execute(&self, _args: &[&str]) -> Result<Completion> {
        Ok(Completion::Pending(PendingExecution::new(|| {
            let stamp = current_time_utc();
            Some(Ok(CommandResult::markup(format!(
                "<div class=\"clock\"><span class=\"time\">{stamp}</span></div>\
                 <script>clock.refresh()</script>"
            ))))
        })))
    }
}

/// Current UTC time of day as `hh:mm:ss`.
fn current_time_utc() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_time_of_day(secs)
}

fn format_time_of_day(epoch_secs: u64) -> String {
    let day_secs = epoch_secs % 86_400;
    let h = day_secs / 3_600;
    let m = (day_secs % 3_600) / 60;
    let s = day_secs % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

// ---------------------------------------------------------------------------
// none
// ---------------------------------------------------------------------------

/// Intentionally produces no visible output. The `null` alias maps here.
struct NoneCmd;
impl Command for NoneCmd {
    fn name(&self) -> &str {
        "none"
    }
    fn description(&self) -> &str {
        "Do nothing"
    }
    fn usage(&self) -> &str {
        "none"
    }
    fn execute(&self, _args: &[&str]) -> Result<Completion> {
        Ok(Completion::Ready(CommandResult::none()))
    }
}

// ---------------------------------------------------------------------------
// json
// ---------------------------------------------------------------------------

/// Echoes its arguments back as a structured-json payload.
struct JsonCmd;
impl Command for JsonCmd {
    fn name(&self) -> &str {
        "json"
    }
    fn description(&self) -> &str {
        "Echo arguments as structured JSON"
    }
    fn usage(&self) -> &str {
        "json [text...]"
    }
    fn execute(&self, args: &[&str]) -> Result<Completion> {
        let value = serde_json::json!({
            "args": args,
            "count": args.len(),
        });
        Ok(Completion::Ready(CommandResult::json(value)))
    }
}
