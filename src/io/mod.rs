pub mod fs;

pub use fs::{is_markdown, read_to_string, resolve_files, vault_path, write_atomic, FileTimes};
