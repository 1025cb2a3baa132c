mod converter;
pub mod export;
mod markdown;
pub mod notebook;
pub mod pipeline;
mod resources;
mod writer;

pub use converter::Converter;
pub use notebook::{Cell, Notebook, Output};
pub use resources::Resources;
pub use writer::FilesWriter;
