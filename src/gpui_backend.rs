//! GPUI window for interactive plots.
//!
//! Frames are rendered in software by the [`Plotter`] and shown as an image;
//! GPUI mouse, wheel and key events are translated into [`InputEvent`]s.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    App, Application, Bounds, CursorStyle, FocusHandle, ImageSource, KeyDownEvent, MouseButton,
    MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point, RenderImage, ScrollWheelEvent,
    TitlebarOptions, Window, WindowBounds, WindowOptions, div, img, px, size,
};

use crate::geom::ScreenPoint;
use crate::interaction::{CursorIcon, InputEvent, Key};
use crate::plot::Plotter;

const SCROLL_LINE_HEIGHT: f32 = 16.0;

/// A GPUI view showing a [`Plotter`].
pub struct GpuiPlotView {
    plotter: Arc<RwLock<Plotter>>,
    focus: FocusHandle,
    last_cursor: Option<ScreenPoint>,
    size: Option<(i32, i32)>,
    frame: Option<Arc<RenderImage>>,
}

impl GpuiPlotView {
    /// Create a view over a shared plotter.
    pub fn new(plotter: Arc<RwLock<Plotter>>, cx: &mut App) -> Self {
        Self {
            plotter,
            focus: cx.focus_handle(),
            last_cursor: None,
            size: None,
            frame: None,
        }
    }

    fn dispatch(&mut self, event: InputEvent, cx: &mut Context<Self>) {
        let flow = match self.plotter.write() {
            Ok(mut plotter) => plotter.handle_event(event),
            Err(_) => {
                log::error!("plotter lock poisoned, dropping {event:?}");
                return;
            }
        };
        if flow.is_break() {
            cx.quit();
        } else {
            cx.notify();
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        self.last_cursor = Some(pos);
        self.dispatch(InputEvent::MouseDown { x: pos.x, y: pos.y }, cx);
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        self.dispatch(InputEvent::MouseUp { x: pos.x, y: pos.y }, cx);
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        let last = self.last_cursor.replace(pos).unwrap_or(pos);
        self.dispatch(
            InputEvent::MouseMove {
                x: pos.x,
                y: pos.y,
                dx: pos.x - last.x,
                dy: pos.y - last.y,
            },
            cx,
        );
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        let delta = ev.delta.pixel_delta(px(SCROLL_LINE_HEIGHT));
        let notches = f32::from(delta.y) / SCROLL_LINE_HEIGHT;
        if notches.abs() < 0.01 {
            return;
        }
        self.dispatch(
            InputEvent::Wheel {
                delta: f64::from(notches),
                x: pos.x,
                y: pos.y,
            },
            cx,
        );
    }

    fn on_key_down(&mut self, ev: &KeyDownEvent, cx: &mut Context<Self>) {
        let key = match ev.keystroke.key.as_str() {
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "escape" => Key::Escape,
            _ => return,
        };
        self.dispatch(InputEvent::Key(key), cx);
    }

    /// Render a frame into a GPUI image, resizing the plotter first if the
    /// window changed.
    fn render_frame(&mut self, window: &mut Window) -> Option<(Arc<RenderImage>, CursorIcon)> {
        let viewport = window.viewport_size();
        let current = (
            f32::from(viewport.width) as i32,
            f32::from(viewport.height) as i32,
        );
        let Ok(mut plotter) = self.plotter.write() else {
            log::error!("plotter lock poisoned, skipping frame");
            return None;
        };
        if self.size != Some(current) {
            if self.size.is_some() {
                let _ = plotter.handle_event(InputEvent::Resize {
                    width: current.0,
                    height: current.1,
                });
            }
            self.size = Some(current);
        }
        let canvas = match plotter.render_frame() {
            Ok(canvas) => canvas,
            Err(err) => {
                log::error!("failed to render plot: {err}");
                return None;
            }
        };
        let (width, height) = canvas.size();
        let buffer = image::RgbaImage::from_raw(
            u32::try_from(width).ok()?,
            u32::try_from(height).ok()?,
            canvas.to_bgra(),
        )?;
        let frame = Arc::new(RenderImage::new(vec![image::Frame::new(buffer)]));
        if let Some(previous) = self.frame.replace(Arc::clone(&frame)) {
            if let Err(err) = window.drop_image(previous) {
                log::warn!("failed to release previous frame: {err}");
            }
        }
        Some((frame, plotter.cursor()))
    }
}

impl Render for GpuiPlotView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let rendered = self.render_frame(window);
        let cursor = match rendered.as_ref().map(|(_, cursor)| *cursor) {
            Some(CursorIcon::Grab) => CursorStyle::ClosedHand,
            _ => CursorStyle::Arrow,
        };

        let mut root = div()
            .size_full()
            .track_focus(&self.focus)
            .cursor(cursor)
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, _, cx| {
                this.on_scroll(ev, cx);
            }))
            .on_key_down(cx.listener(|this, ev, _, cx| {
                this.on_key_down(ev, cx);
            }));
        if let Some((frame, _)) = rendered {
            root = root.child(img(ImageSource::Render(frame)).size_full());
        }
        root
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x) as i32, f32::from(point.y) as i32)
}

/// Show `plotter` in a window until it is closed.
///
/// The plotter is moved into the window for its lifetime and handed back
/// afterwards.
pub(crate) fn open_window(plotter: &mut Plotter) -> bool {
    if let Err(err) = plotter.prepare() {
        log::error!("cannot open plot {:?}: {err}", plotter.title());
        return false;
    }
    let (width, height) = plotter.window_size();
    let title = plotter.title().to_string();
    let shared = Arc::new(RwLock::new(std::mem::replace(
        plotter,
        Plotter::new("", "", ""),
    )));
    let failed = Arc::new(AtomicBool::new(false));

    let view_plotter = Arc::clone(&shared);
    let window_failed = Arc::clone(&failed);
    Application::new().run(move |cx: &mut App| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(width as f32), px(height as f32)),
                cx,
            ))),
            titlebar: Some(TitlebarOptions {
                title: Some(title.clone().into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let opened = cx.open_window(options, |window, cx| {
            let view = GpuiPlotView::new(view_plotter, cx);
            window.focus(&view.focus);
            cx.new(|_| view)
        });
        match opened {
            Ok(_) => {
                log::info!("plot window {title:?} opened at {width}x{height}");
                cx.on_window_closed(|cx| cx.quit()).detach();
                cx.activate(true);
            }
            Err(err) => {
                log::error!("failed to open plot window {title:?}: {err}");
                window_failed.store(true, Ordering::Relaxed);
                cx.quit();
            }
        }
    });

    match Arc::try_unwrap(shared) {
        Ok(lock) => {
            *plotter = lock.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        Err(_) => log::warn!("plot window still holds the plotter after closing"),
    }
    !failed.load(Ordering::Relaxed)
}
