use std::fs::File;
use std::path::Path;

use log::{debug, info};

use super::{Canvas, create_surface};
use crate::draw::{FrameReport, render_pending};
use crate::error::SceneError;

impl Canvas {
    /// Requests a frame. A request already in flight absorbs this one.
    pub fn draw(&mut self) {
        if self.destroyed || self.pending_frame.is_some() {
            return;
        }
        let now = self.clock.now();
        self.pending_frame = Some(self.scheduler.request_frame(now));
    }

    /// Whether a frame request is in flight.
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Runs the pending frame if the scheduler says it is due.
    ///
    /// Host loops call this on every wakeup.
    pub fn poll(&mut self) -> Result<Option<FrameReport>, SceneError> {
        let Some(handle) = self.pending_frame else {
            return Ok(None);
        };
        if !self.scheduler.is_due(handle, self.clock.now()) {
            return Ok(None);
        }
        self.run_frame().map(Some)
    }

    /// Runs one frame now: advances animations, then repaints what changed.
    ///
    /// Another frame is requested while animations remain.
    pub fn run_frame(&mut self) -> Result<FrameReport, SceneError> {
        if self.destroyed {
            return Ok(FrameReport::skipped());
        }
        let now = self.clock.now();
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.frame_ran(handle, now);
        }

        let animating = self.timeline.tick(&mut self.scene, now);
        self.prune_dead_nodes();
        let view = self.view();
        let report = render_pending(
            &self.context,
            &mut self.scene,
            &view,
            self.background.as_ref(),
            self.local_refresh,
        )?;
        if let Some(callback) = self.frame_callback.as_mut() {
            callback(&report);
        }

        if animating || (self.auto_draw && self.scene.needs_refresh()) {
            self.draw();
        }
        Ok(report)
    }

    /// Registers a callback run after every frame.
    pub fn on_frame_drawn<F: FnMut(&FrameReport) + 'static>(&mut self, callback: F) {
        self.frame_callback = Some(Box::new(callback));
    }

    /// Resizes the surface. The next frame repaints everything.
    ///
    /// # Errors
    /// Returns [`SceneError::Surface`] if Cairo cannot allocate the surface.
    pub fn change_size(&mut self, width: u32, height: u32) -> Result<(), SceneError> {
        let width = width.max(1);
        let height = height.max(1);
        let (surface, context) = create_surface(width, height, self.pixel_ratio)?;
        self.surface = surface;
        self.context = context;
        self.width = width;
        self.height = height;
        debug!("canvas resized to {width}x{height}");
        self.scene.mark_full();
        self.after_mutation();
        Ok(())
    }

    /// Tears the canvas down: cancels the pending frame, stops the timeline,
    /// drops pending refreshes, listeners, metadata, and every node below
    /// the root. Later calls are no-ops.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.timeline.clear();
        self.emitter.clear();
        self.meta.clear();
        self.controller.reset();
        let root = self.root();
        self.scene.destroy(root);
        self.scene.clear_refresh();
        self.frame_callback = None;
        self.destroyed = true;
        debug!("canvas destroyed");
    }

    /// Copy of the current pixels.
    pub fn snapshot(&self) -> Result<cairo::ImageSurface, SceneError> {
        self.surface.flush();
        let copy = cairo::ImageSurface::create(
            cairo::Format::ARgb32,
            self.surface.width(),
            self.surface.height(),
        )?;
        {
            let ctx = cairo::Context::new(&copy)?;
            ctx.set_source_surface(&self.surface, 0.0, 0.0)?;
            ctx.set_operator(cairo::Operator::Source);
            ctx.paint()?;
        }
        copy.flush();
        Ok(copy)
    }

    /// Writes the surface to a PNG file.
    ///
    /// # Errors
    /// Returns [`SceneError::Export`] if the file cannot be created or encoded.
    pub fn write_png(&self, path: &Path) -> Result<(), SceneError> {
        self.surface.flush();
        let mut file = File::create(path)
            .map_err(|e| SceneError::Export(format!("{}: {e}", path.display())))?;
        self.surface
            .write_to_png(&mut file)
            .map_err(|e| SceneError::Export(format!("{}: {e}", path.display())))?;
        info!("wrote {}", path.display());
        Ok(())
    }
}
