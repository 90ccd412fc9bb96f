// Directory listing text, one line per `FileItem`.

pub mod unix;

pub use unix::UnixListFormatter;

use crate::core_storage::FileItem;

pub trait ListFormatter: Send + Sync + std::fmt::Debug {
    fn format(&self, item: &FileItem) -> String;
}
