#![warn(clippy::unwrap_used)]

pub mod registry;
pub mod rest;
pub mod server;
pub mod swagger;

pub use registry::Registry;
pub use server::ApiServer;
pub use swagger::ApiDoc;
