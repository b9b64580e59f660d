pub mod keyterm;
pub mod phase;
pub mod registration;
pub mod story;
