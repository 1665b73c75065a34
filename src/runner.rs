//! Frame loop for hosts that present software-rendered frames.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use crate::error::PlotError;
use crate::interaction::{CursorIcon, InputEvent};
use crate::plot::Plotter;
use crate::raster::Canvas;

/// A window, or anything else that shows frames and produces input.
pub trait FrameHost {
    /// Called once before the first frame with the initial window size.
    fn open(&mut self, _title: &str, _width: i32, _height: i32) -> Result<(), PlotError> {
        Ok(())
    }

    /// Input received since the previous call.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Show a finished frame.
    fn present(&mut self, frame: &Canvas) -> Result<(), PlotError>;

    /// Change the pointer shape.
    fn set_cursor(&mut self, _cursor: CursorIcon) {}

    /// Wait out the rest of a frame period.
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Drive `plotter` on `host` until a quit event.
pub(crate) fn run_loop<H: FrameHost + ?Sized>(
    plotter: &mut Plotter,
    host: &mut H,
) -> Result<(), PlotError> {
    plotter.prepare()?;
    let (width, height) = plotter.window_size();
    host.open(plotter.title(), width, height)?;
    log::info!("plot window {:?} opened at {width}x{height}", plotter.title());

    let period = plotter.config().frame_period;
    let mut frames: u64 = 0;
    loop {
        let started = Instant::now();
        for event in host.poll_events() {
            if let ControlFlow::Break(()) = plotter.handle_event(event) {
                log::debug!("plot loop quit after {frames} frames");
                return Ok(());
            }
        }
        let frame = plotter.render_frame()?;
        host.present(&frame)?;
        host.set_cursor(plotter.cursor());
        frames += 1;

        let elapsed = started.elapsed();
        if elapsed < period {
            host.sleep(period - elapsed);
        } else {
            log::trace!("frame {frames} took {elapsed:?}");
        }
    }
}
