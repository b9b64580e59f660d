pub mod encoding;
pub mod keyterm_index;
pub mod storage;
pub mod workspace;
