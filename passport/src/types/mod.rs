mod profile;
mod score;

pub use profile::*;
pub use score::*;
