mod report;
mod status;
mod summary;
mod terminal;

pub use report::{strip_ansi, write_json_report, JsonReport, JsonTask};
pub use status::{
    format_status, icon, paint, RecordingRenderer, Renderer, StatusReporter, TerminalRenderer,
};
pub use summary::{write_error_banner, write_final_report, write_ok_banner, Verdict};
pub use terminal::{clear_screen, CursorGuard};
