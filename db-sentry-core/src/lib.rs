#![cfg_attr(not(feature = "std"), no_std)]

pub mod audio;
pub mod config;
pub mod errors;
pub mod logging;
#[cfg(any(feature = "std", feature = "embassy"))]
pub mod report_timer;
pub mod session;
pub mod windows;
