//! Terminal UI: progress bars and dialogs.

pub mod console;

pub use self::console::{ConsoleNotifier, ConsoleSurface};
