mod landing;
mod respond;

pub(crate) use landing::{LandingAsset, LandingHandler};
pub(crate) use respond::{send_redirect, send_text};
