//! Image resolution.
//!
//! Resolution always reads the engine's current image list. Tags can move between requests, so
//! results are never cached.

use getset::Getters;

use crate::{
    engine::{ContainerEngine, ImageSummary},
    ContainerzError, ContainerzResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An image matched by [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ResolvedImage {
    /// Engine identifier of the image.
    id: String,

    /// The `image:tag` reference that matched.
    reference: String,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Resolves `image:tag` against the images currently known to `engine`.
///
/// ## Errors
///
/// - [`ContainerzError::ImageNotFound`] if no image carries the exact reference
/// - [`ContainerzError::Engine`] if the image list cannot be read
pub async fn resolve<E>(engine: &E, image: &str, tag: &str) -> ContainerzResult<ResolvedImage>
where
    E: ContainerEngine + ?Sized,
{
    let images = engine
        .list_images()
        .await
        .map_err(|e| ContainerzError::engine(super::manager::LIST_IMAGES, e))?;

    find_image(&images, image, tag)
}

/// Finds the image whose repository tags contain exactly `image:tag`.
pub fn find_image(images: &[ImageSummary], image: &str, tag: &str) -> ContainerzResult<ResolvedImage> {
    let reference = format!("{}:{}", image, tag);

    images
        .iter()
        .find(|summary| summary.has_repo_tag(&reference))
        .map(|summary| {
            tracing::debug!("resolved {} to image {}", reference, summary.id);
            ResolvedImage {
                id: summary.id.clone(),
                reference: reference.clone(),
            }
        })
        .ok_or_else(|| ContainerzError::ImageNotFound {
            image: image.to_string(),
            tag: tag.to_string(),
        })
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
