pub mod ensemble;
pub mod location;
pub mod profiles;
pub mod series;
pub mod sky;

pub use ensemble::*;
pub use location::*;
pub use profiles::*;
pub use series::*;
pub use sky::*;
