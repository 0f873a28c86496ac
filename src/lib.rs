// Library target holds the quiz core so integration tests and benchmarks can
// drive it headless. The terminal front-end (app, event, ui) lives in the
// binary and only talks to the core through `session::quiz::Quiz` intents.

pub mod client;
pub mod config;
pub mod engine;
pub mod generator;
pub mod session;
pub mod store;
