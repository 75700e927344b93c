//! Cover art download and crop
//!
//! The catalog serves covers from a static-asset host; the URL is derived
//! from the detail link's identifier segment. The full cover is written as
//! fanart and a fixed region is cropped out as the poster. Fixed-coordinate
//! cropping assumes the host's uniform cover resolution.

use std::fs;
use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::ScrapeError;
use crate::services::catalog::CatalogClient;

pub const FANART_FILENAME: &str = "fanart.jpg";
pub const POSTER_FILENAME: &str = "poster.jpg";

/// Poster crop region within the full cover, in pixels.
const CROP_LEFT: u32 = 420;
const CROP_TOP: u32 = 0;
const CROP_RIGHT: u32 = 800;
const CROP_BOTTOM: u32 = 538;

/// Download the cover for `link` into `dir/fanart.jpg` and derive
/// `dir/poster.jpg` from it.
pub async fn fetch_and_crop(
    client: &CatalogClient,
    link: &str,
    dir: &Path,
) -> Result<(), ScrapeError> {
    let url = cover_url(client.image_base_url(), link).ok_or_else(|| {
        ScrapeError::Parse(format!("detail link {link} has no identifier segment"))
    })?;
    debug!(url = %url, "Downloading cover");

    let bytes = client.get_bytes(&url).await?;
    fs::write(dir.join(FANART_FILENAME), &bytes)?;

    let cover = image::load_from_memory(&bytes)?;
    let poster = crop_poster(&cover);
    poster.save(dir.join(POSTER_FILENAME))?;

    debug!(dir = %dir.display(), "Wrote fanart and poster");
    Ok(())
}

/// Derive the static-host cover URL from a detail link such as `/v/8aW5z4`:
/// the identifier's first two characters, lowercased, select the
/// subdirectory; the identifier itself keeps its case in the filename.
fn cover_url(image_base_url: &str, link: &str) -> Option<String> {
    let id = link.split('/').nth(2).filter(|s| !s.is_empty())?;
    let sub: String = id.to_lowercase().chars().take(2).collect();
    Some(format!("{image_base_url}/covers/{sub}/{id}.jpg"))
}

/// Crop the fixed poster region out of the full cover.
fn crop_poster(cover: &DynamicImage) -> DynamicImage {
    cover.crop_imm(
        CROP_LEFT,
        CROP_TOP,
        CROP_RIGHT - CROP_LEFT,
        CROP_BOTTOM - CROP_TOP,
    )
}
