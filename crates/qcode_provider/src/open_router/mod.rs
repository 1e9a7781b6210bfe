mod model;
mod provider;
mod request;
mod response;

pub use model::*;
pub use provider::*;
pub use request::*;
