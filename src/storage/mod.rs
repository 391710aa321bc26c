mod file;
mod memory;
mod storage;

#[allow(unused_imports)]
pub use {file::*, memory::*, storage::*};
