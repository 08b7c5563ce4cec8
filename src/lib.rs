pub mod action;
pub mod config;
pub mod costs;
pub mod curve;
pub mod decider;
pub mod engine;
pub mod error;
pub mod observer;
pub mod protocol;
pub mod replay;
pub mod strategies;
pub mod turn;
pub mod util;
