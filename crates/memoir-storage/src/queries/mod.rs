pub mod fts;
pub mod memory_crud;
pub mod meta;
pub mod vector;
