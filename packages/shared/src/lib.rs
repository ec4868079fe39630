//! Utilities shared by the Stockhammer relay server and terminal client.

pub mod logger;
pub mod time;
