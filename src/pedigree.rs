pub mod inbreeding;
pub mod record;
pub mod store;
pub mod tree;
