pub mod file_watcher;
pub mod render_queue;
pub mod session;

pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use render_queue::{RenderOutcome, RenderQueue, RenderRequest};
pub use session::EditSession;
