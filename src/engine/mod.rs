pub mod badges;
pub mod deck;
pub mod scoring;
pub mod selection;
pub mod validate;
