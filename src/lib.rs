//! airsurvey library components
//!
//! The interactive binary is a thin shell over these modules; they are
//! exposed for testing and integration purposes.

pub mod cancel;
pub mod capture;
pub mod command;
pub mod config;
pub mod display;
pub mod interface;
pub mod menu;
pub mod scraper;
pub mod session;
pub mod status;
