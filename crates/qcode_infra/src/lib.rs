mod credential;
mod env;

pub use credential::*;
pub use env::*;
