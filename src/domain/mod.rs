pub mod constraint;
pub mod period;
pub mod term;

pub use constraint::*;
pub use period::*;
pub use term::*;
