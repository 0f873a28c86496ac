pub mod question;
pub mod quiz;
pub mod result;
pub mod state;
pub mod timer;
