use crate::viewer::core::Canvas;
use std::error::Error;

/// Where the viewer's canvases, status line and notices end up.
pub trait CanvasDisplay: Send + Sync {
    /// Replace every canvas currently shown. `pass` changes whenever the
    /// canvas set was rebuilt, so displays may drop anything cached for an
    /// older pass.
    fn show_canvases(
        &mut self,
        pass: u64,
        canvases: &[Canvas],
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show_status(&mut self, status: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// A blocking notice the user has to dismiss. `None` hides it.
    fn show_notice(&mut self, notice: Option<&str>) -> Result<(), Box<dyn Error + Send + Sync>>;
}
