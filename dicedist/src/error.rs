use std::num::ParseIntError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {dice} dice with {sides} sides (need at least 1 die with 2 sides, and an exact distribution that fits f64)")]
    InvalidConfiguration { dice: u32, sides: u32 },
    #[error("Cannot {command} while {state}")]
    InvalidTransition {
        command: &'static str,
        state: &'static str,
    },
    #[error("No dice configured")]
    NotConfigured,
    #[error("Unable to parse dice: {0}")]
    BadNotation(String),
    #[error("Bad integer: {0}; {1}")]
    BadInteger(String, ParseIntError),
}
