//! Display surface abstraction.
//!
//! The host supplies the mount point; the widget drives it through this
//! trait. `MemorySurface` is the in-memory implementation used by tests.

use wicket_types::error::Result;

use crate::markup::Fragment;
use crate::session::InputCell;

/// One transcript entry, fully rendered and ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEntry {
    /// The visible command line (tokens joined by single spaces).
    pub command_line: String,
    /// The rendered result body.
    pub body: RenderedBody,
}

/// The projected result body of a transcript entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBody {
    /// No visible output.
    Empty,
    /// Literal text.
    Text(String),
    /// A markup fragment inside an isolated rendering scope. The fragment
    /// is self-contained; its styles and scripts cannot reach outside it.
    Scope(Fragment),
}

/// A host display surface the widget renders into.
pub trait Surface {
    /// Prepare the mount point. Called once at attach.
    fn mount(&mut self) -> Result<()>;

    /// Tear down all mounted nodes. Called at detach.
    fn unmount(&mut self);

    /// Replace the rendered input line.
    fn set_input_line(&mut self, cells: &[InputCell]);

    /// Append one transcript entry. Entries are never re-rendered or
    /// mutated after insertion.
    fn push_entry(&mut self, entry: &RenderedEntry);

    /// Remove all transcript entries.
    fn clear_entries(&mut self);
}

/// In-memory surface for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemorySurface {
    pub mounted: bool,
    pub input_line: Vec<InputCell>,
    pub entries: Vec<RenderedEntry>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for MemorySurface {
    fn mount(&mut self) -> Result<()> {
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self) {
        self.mounted = false;
        self.input_line.clear();
        self.entries.clear();
    }

    fn set_input_line(&mut self, cells: &[InputCell]) {
        self.input_line = cells.to_vec();
    }

    fn push_entry(&mut self, entry: &RenderedEntry) {
        self.entries.push(entry.clone());
    }

    fn clear_entries(&mut self) {
        self.entries.clear();
    }
}
