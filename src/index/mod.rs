pub mod index;
pub mod index_reader;
pub mod inverted;
pub mod posting;
pub mod store;
