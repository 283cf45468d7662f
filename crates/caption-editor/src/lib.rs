pub mod clock;
pub mod draft;
pub mod editor;
pub mod fonts;
pub mod history;
pub mod input;
pub mod shortcuts;
pub mod storage;
pub mod tools;

pub use clock::{Clock, ManualClock, SystemClock};
pub use draft::TextEditDraft;
pub use editor::{DELETE_PROMPT, DecodedImage, Editor, ExportedImage, PNG_MIME};
pub use fonts::{FontCatalog, FontLoader, FontLoads, FontStatus, SystemFonts};
pub use history::{HistoryEngine, HistoryState};
pub use input::{InputEvent, Modifiers};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
