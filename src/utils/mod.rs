//! # Utility Modules
//!
//! Supporting utilities used throughout the client.
//!
//! ## Components
//! - **Time**: Protocol timestamp conversion (100-nanosecond-tick epoch)

pub mod time;
