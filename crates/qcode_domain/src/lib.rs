mod catalog;
mod clock;
mod completion;
mod credential;
mod environment;
mod model;
mod prompt;
mod services;
mod temperature;

pub use catalog::*;
pub use clock::*;
pub use completion::*;
pub use credential::*;
pub use environment::*;
pub use model::*;
pub use prompt::*;
pub use services::*;
pub use temperature::*;
