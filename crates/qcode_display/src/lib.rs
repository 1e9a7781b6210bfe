mod markdown;
mod model_list;
mod title;

pub use markdown::MarkdownFormat;
pub use model_list::ModelListFormat;
pub use title::{Category, TitleFormat};
