pub mod enums;
pub mod filters;

pub use enums::Gender;
pub use filters::HearingTestFilter;
pub use hearing_test::*;
