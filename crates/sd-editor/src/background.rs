//! Background compositor with newest-request-wins loading.
//!
//! Image loads are asynchronous and cannot be cancelled. Each call to
//! `request` issues a fresh token; a completion is composited only if
//! its token is still the newest one. Anything older is discarded, so
//! two racing loads can never leave the older image on screen.

use sd_core::{BackgroundImage, Result};
use sd_render::{Placement, Surface};

/// Token identifying one background load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackgroundRequest(u64);

impl BackgroundRequest {
    pub fn id(self) -> u64 {
        self.0
    }

    /// Rebuild a token handed across an FFI boundary.
    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundOutcome {
    /// The image replaced the buffer.
    Applied(Placement),
    /// A newer request superseded this one; nothing changed.
    Stale,
}

#[derive(Default)]
pub struct BackgroundLoader {
    generation: u64,
    pending: Option<BackgroundRequest>,
    /// Last image that made it onto the surface.
    current: Option<BackgroundImage>,
}

impl BackgroundLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load. Any earlier pending request becomes stale.
    pub fn request(&mut self) -> BackgroundRequest {
        self.generation += 1;
        let req = BackgroundRequest(self.generation);
        if let Some(old) = self.pending.replace(req) {
            log::debug!("background request {} superseded by {}", old.0, req.0);
        }
        req
    }

    pub fn pending(&self) -> Option<BackgroundRequest> {
        self.pending
    }

    /// Deliver the result of `req`.
    ///
    /// A failure of the newest request is returned as an error and leaves
    /// the surface untouched. Stale results are dropped either way.
    pub fn complete(
        &mut self,
        req: BackgroundRequest,
        result: Result<BackgroundImage>,
        surface: &mut Surface,
    ) -> Result<BackgroundOutcome> {
        if self.pending != Some(req) {
            log::warn!("discarding stale background load {}", req.0);
            return Ok(BackgroundOutcome::Stale);
        }
        self.pending = None;

        let image = result?;
        let placement = surface.composite_image(&image)?;
        self.current = Some(image);
        Ok(BackgroundOutcome::Applied(placement))
    }

    /// Composite a region cropped out of the buffer itself.
    ///
    /// Supersedes any pending load like `request` does, but `current` keeps
    /// the last host-delivered image so `recomposite` still restores it.
    pub fn composite_crop(
        &mut self,
        region: &BackgroundImage,
        surface: &mut Surface,
    ) -> Result<Placement> {
        let placement = surface.composite_image(region)?;
        self.generation += 1;
        if let Some(old) = self.pending.take() {
            log::debug!("background request {} superseded by crop", old.0);
        }
        Ok(placement)
    }

    pub fn current(&self) -> Option<&BackgroundImage> {
        self.current.as_ref()
    }

    /// Draw the last applied image again, e.g. after the canvas is cleared.
    pub fn recomposite(&self, surface: &mut Surface) -> Option<Result<Placement>> {
        self.current
            .as_ref()
            .map(|image| surface.composite_image(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sd_core::SketchError;
    use sd_core::model::Color;

    fn red() -> BackgroundImage {
        BackgroundImage::solid(4, 4, [255, 0, 0, 255]).unwrap()
    }

    fn blue() -> BackgroundImage {
        BackgroundImage::solid(4, 4, [0, 0, 255, 255]).unwrap()
    }

    #[test]
    fn newest_request_wins() {
        let mut surface = Surface::new(4, 4).unwrap();
        let mut loader = BackgroundLoader::new();

        let first = loader.request();
        let second = loader.request();

        // Second resolves first, then the stale first one arrives.
        let outcome = loader.complete(second, Ok(blue()), &mut surface).unwrap();
        assert!(matches!(outcome, BackgroundOutcome::Applied(_)));
        let outcome = loader.complete(first, Ok(red()), &mut surface).unwrap();
        assert_eq!(outcome, BackgroundOutcome::Stale);

        let px = surface.pixel(2, 2).unwrap();
        assert!(px.b > 250 && px.r < 5, "{px:?}");
        assert_eq!(loader.current(), Some(&blue()));
    }

    #[test]
    fn stale_completion_before_newest_is_dropped() {
        let mut surface = Surface::new(4, 4).unwrap();
        let mut loader = BackgroundLoader::new();

        let first = loader.request();
        let second = loader.request();
        assert_eq!(
            loader.complete(first, Ok(red()), &mut surface).unwrap(),
            BackgroundOutcome::Stale
        );
        assert_eq!(surface.pixel(2, 2), Some(Color::TRANSPARENT));
        assert_eq!(loader.pending(), Some(second));
    }

    #[test]
    fn failure_leaves_buffer_unchanged() {
        let mut surface = Surface::new(4, 4).unwrap();
        let mut loader = BackgroundLoader::new();
        let req = loader.request();
        loader.complete(req, Ok(red()), &mut surface).unwrap();
        let before = surface.snapshot();

        let req = loader.request();
        let err = loader
            .complete(
                req,
                Err(SketchError::ResourceUnavailable("404".into())),
                &mut surface,
            )
            .unwrap_err();
        assert!(matches!(err, SketchError::ResourceUnavailable(_)));
        assert_eq!(surface.snapshot(), before);
        assert_eq!(loader.current(), Some(&red()));
        assert_eq!(loader.pending(), None);
    }

    #[test]
    fn stale_failure_is_not_reported() {
        let mut surface = Surface::new(4, 4).unwrap();
        let mut loader = BackgroundLoader::new();
        let old = loader.request();
        let _new = loader.request();
        let outcome = loader
            .complete(old, Err(SketchError::ResourceUnavailable("timeout".into())), &mut surface)
            .unwrap();
        assert_eq!(outcome, BackgroundOutcome::Stale);
    }

    #[test]
    fn crop_keeps_host_image_for_recomposite() {
        let mut surface = Surface::new(4, 4).unwrap();
        let mut loader = BackgroundLoader::new();
        let req = loader.request();
        loader.complete(req, Ok(blue()), &mut surface).unwrap();

        loader.composite_crop(&red(), &mut surface).unwrap();
        let px = surface.pixel(2, 2).unwrap();
        assert!(px.r > 250 && px.b < 5, "{px:?}");
        assert_eq!(loader.current(), Some(&blue()));

        loader.recomposite(&mut surface).unwrap().unwrap();
        let px = surface.pixel(2, 2).unwrap();
        assert!(px.b > 250 && px.r < 5, "{px:?}");
    }

    #[test]
    fn crop_supersedes_pending_load() {
        let mut surface = Surface::new(4, 4).unwrap();
        let mut loader = BackgroundLoader::new();
        let req = loader.request();
        loader.composite_crop(&red(), &mut surface).unwrap();
        assert_eq!(loader.pending(), None);

        let outcome = loader.complete(req, Ok(blue()), &mut surface).unwrap();
        assert_eq!(outcome, BackgroundOutcome::Stale);
        assert_eq!(loader.current(), None);
        let px = surface.pixel(2, 2).unwrap();
        assert!(px.r > 250 && px.b < 5, "{px:?}");
    }

    #[test]
    fn recomposite_without_image_is_none() {
        let mut surface = Surface::new(4, 4).unwrap();
        assert!(BackgroundLoader::new().recomposite(&mut surface).is_none());
    }
}
