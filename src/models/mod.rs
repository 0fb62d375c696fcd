mod credential;
mod product;
mod sale;

pub use credential::*;
pub use product::*;
pub use sale::*;
