mod request_ctx;
mod request_id;
#[cfg(test)]
mod tests;

pub use request_ctx::*;
pub use request_id::*;
