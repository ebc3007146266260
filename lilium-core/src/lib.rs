pub mod cli;
pub mod conf;
pub mod ctx;
pub mod logging;
pub mod proxy;
pub mod render;
pub mod rewrite;
pub mod server;
