//! Handler für die Kartenfläche (Pan, Zoom, Einpassen).

use glam::Vec2;

use crate::app::AppState;
use crate::core::{MapSurface, NetworkModel};

/// Legt die Kartenfläche an. Ein zweiter Aufruf passt nur die Größe an.
pub fn init_map_surface(state: &mut AppState, size: Vec2) {
    if let Some(surface) = state.map_surface.as_mut() {
        surface.resize(size);
        return;
    }
    let surface =
        MapSurface::with_zoom_limits(size, state.options.map_zoom_min, state.options.map_zoom_max);
    state.map_surface = Some(surface);
    log::info!("Kartenfläche angelegt ({} × {} px)", size.x, size.y);

    if state.view.pending_fit {
        fit_to_model(state);
    }
}

/// Passt die Kartenfläche an eine neue Viewport-Größe an.
pub fn resize(state: &mut AppState, size: Vec2) {
    if let Some(surface) = state.map_surface.as_mut() {
        surface.resize(size);
    }
}

/// Verschiebt die Karte um ein Pixel-Delta.
pub fn pan(state: &mut AppState, delta: Vec2) {
    if let Some(surface) = state.map_surface.as_mut() {
        surface.pan(delta);
    }
}

/// Zoomt um `factor`, optional um einen Bildschirmpunkt.
pub fn zoom(state: &mut AppState, factor: f64, anchor: Option<Vec2>) {
    if let Some(surface) = state.map_surface.as_mut() {
        let anchor = anchor.unwrap_or(surface.viewport_size * 0.5);
        surface.zoom_towards(factor, anchor);
    }
}

/// Passt die Ansicht auf die Ausdehnung des Netzes an.
pub fn fit_to_model(state: &mut AppState) {
    let Some(bounds) = state.model().map(|m| m.bounds()) else {
        return;
    };
    match state.map_surface.as_mut() {
        Some(surface) => {
            surface.fit_bounds(&bounds, state.options.fit_padding_px);
            state.view.pending_fit = false;
        }
        None => state.view.pending_fit = true,
    }
}

/// Schaltet das Info-Fenster um.
pub fn toggle_about(state: &mut AppState) {
    state.view.show_about = !state.view.show_about;
}
