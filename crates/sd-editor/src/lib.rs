pub mod background;
pub mod history;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use background::{BackgroundLoader, BackgroundOutcome, BackgroundRequest};
pub use history::History;
pub use input::InputEvent;
pub use session::Session;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{DragState, ToolMachine, ToolState};
