// Library surface for the binary and for headless/integration tests.
pub mod action;
pub mod app;
pub mod config;
pub mod corpus;
pub mod evaluator;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod ui;
