//! Viewport fit and camera math.
//!
//! Every function here is pure: it reads bounds and the current view state and
//! computes a fresh camera (zoom + scroll), never adjusting incrementally.

use egui::{Pos2, Rect, Vec2};

use crate::element::{self, SceneElement};
use crate::view_state::{LayoutDirection, ViewState};

/// Zoom increment used by the zoom actions and fit quantization
pub const ZOOM_STEP: f32 = 0.1;
pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 30.0;

/// Coverage factor used by the fill-viewport fit when the caller supplies none
pub const DEFAULT_VIEWPORT_ZOOM_FACTOR: f32 = 0.7;

/// A computed camera: the zoom level and scroll offset to apply together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub zoom: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
}

impl Camera {
    /// Copy of `view` with this camera applied
    pub fn applied_to(&self, view: &ViewState) -> ViewState {
        ViewState {
            zoom: self.zoom,
            scroll_x: self.scroll_x,
            scroll_y: self.scroll_y,
            ..view.clone()
        }
    }
}

/// A fixed point of a zoom change, in window coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnchor {
    pub viewport_x: f32,
    pub viewport_y: f32,
}

impl ZoomAnchor {
    /// The center of the viewport described by `view`
    pub fn viewport_center(view: &ViewState) -> Self {
        Self {
            viewport_x: view.width / 2.0 + view.offset_left,
            viewport_y: view.height / 2.0 + view.offset_top,
        }
    }
}

/// Clamp a zoom value into the supported range
pub fn normalized_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Camera for changing zoom to `next_zoom` while keeping `anchor` fixed on
/// screen. The anchor is first rebased against the scroll at 1:1 zoom, then
/// offset back for the target zoom.
pub fn state_for_zoom(anchor: ZoomAnchor, next_zoom: f32, view: &ViewState) -> Camera {
    let app_layer_x = anchor.viewport_x - view.offset_left;
    let app_layer_y = anchor.viewport_y - view.offset_top;
    let current_zoom = view.zoom;

    let base_scroll_x = view.scroll_x + (app_layer_x - app_layer_x / current_zoom);
    let base_scroll_y = view.scroll_y + (app_layer_y - app_layer_y / current_zoom);

    let zoom_offset_x = -(app_layer_x - app_layer_x / next_zoom);
    let zoom_offset_y = -(app_layer_y - app_layer_y / next_zoom);

    Camera {
        zoom: next_zoom,
        scroll_x: base_scroll_x + zoom_offset_x,
        scroll_y: base_scroll_y + zoom_offset_y,
    }
}

/// Scroll that places `scene_point` at the center of a viewport of the given
/// size at the given zoom
pub fn center_scroll_on(scene_point: Pos2, viewport: Vec2, zoom: f32) -> (f32, f32) {
    (
        viewport.x / 2.0 / zoom - scene_point.x,
        viewport.y / 2.0 / zoom - scene_point.y,
    )
}

/// Fit-within-100% zoom for `bounds` on a viewport: the smaller of the two
/// axis ratios, quantized down to the nearest `ZOOM_STEP` and clamped to
/// `[MIN_ZOOM, 1.0]`
fn zoom_value_to_fit_bounds(bounds: Rect, viewport: Vec2) -> f32 {
    let zoom_for_width = viewport.x / bounds.width();
    let zoom_for_height = viewport.y / bounds.height();
    let smallest = zoom_for_width.min(zoom_for_height);
    let adjusted_to_steps = (smallest / ZOOM_STEP).floor() * ZOOM_STEP;
    adjusted_to_steps.max(MIN_ZOOM).min(1.0)
}

/// Compute a camera that frames `bounds` in the viewport described by `view`.
///
/// With `fit_to_viewport = false` the zoom never exceeds 100%; with
/// `fit_to_viewport = true` the content covers `viewport_zoom_factor` of the
/// viewport (factor clamped to `[0.1, 1.0]`) and the zoom is clamped to
/// `[MIN_ZOOM, MAX_ZOOM]`. An open sidebar shrinks the usable viewport width
/// (grows it when the layout direction anchors the sidebar on the trailing
/// edge) before scroll centering.
///
/// Zero-extent bounds fit to zoom 1.0 centered on the point.
pub fn zoom_to_fit_bounds(
    bounds: Rect,
    view: &ViewState,
    fit_to_viewport: bool,
    viewport_zoom_factor: f32,
) -> Camera {
    let center = bounds.center();
    let viewport = Vec2::new(view.width, view.height);

    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        let (scroll_x, scroll_y) = center_scroll_on(center, viewport, 1.0);
        return Camera {
            zoom: 1.0,
            scroll_x,
            scroll_y,
        };
    }

    if fit_to_viewport {
        let factor = viewport_zoom_factor.clamp(0.1, 1.0);
        let zoom = normalized_zoom(
            (view.width / bounds.width()).min(view.height / bounds.height()) * factor,
        );

        let usable_width = match view.open_sidebar {
            Some(sidebar) => match view.layout_direction {
                LayoutDirection::LeftToRight => view.width - sidebar.width_px,
                LayoutDirection::RightToLeft => view.width + sidebar.width_px,
            },
            None => view.width,
        };

        Camera {
            zoom,
            scroll_x: (usable_width / 2.0) * (1.0 / zoom) - center.x,
            scroll_y: (view.height / 2.0) * (1.0 / zoom) - center.y,
        }
    } else {
        let zoom = zoom_value_to_fit_bounds(bounds, viewport);
        let (scroll_x, scroll_y) = center_scroll_on(center, viewport, zoom);
        Camera {
            zoom,
            scroll_x,
            scroll_y,
        }
    }
}

/// Frame the non-deleted subset of `targets`. An empty target set behaves as
/// a zero-extent bound at the origin.
pub fn zoom_to_fit(
    targets: &[SceneElement],
    view: &ViewState,
    fit_to_viewport: bool,
    viewport_zoom_factor: f32,
) -> Camera {
    let bounds = element::common_bounds(element::non_deleted(targets))
        .unwrap_or(Rect::from_min_max(Pos2::ZERO, Pos2::ZERO));
    zoom_to_fit_bounds(bounds, view, fit_to_viewport, viewport_zoom_factor)
}
