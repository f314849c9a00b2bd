pub mod compose;
pub mod preview;
