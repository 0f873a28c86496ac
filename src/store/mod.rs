pub mod identity;
pub mod schema;
