pub mod entry;
pub mod preset;
