//! Mass downloads manga chapters from manganelo while drawing a progress
//! line with an ETA on stderr.

pub mod error;
pub mod eta;
pub mod logging;
pub mod manga;
pub mod naming;
pub mod scrape;
pub mod site;
