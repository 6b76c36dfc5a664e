mod store;


pub use store::{AlertStore, DEFAULT_CAPACITY};
