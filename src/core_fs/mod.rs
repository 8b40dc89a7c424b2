// Path sandboxing and directory listing output
pub mod list_formatter;
pub mod path;

pub use list_formatter::ListFormatter;
pub use path::{build_path, clean_path};
