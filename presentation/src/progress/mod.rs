//! Progress reporting for headless commands

pub mod reporter;
