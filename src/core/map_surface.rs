//! Kartenfläche: Mittelpunkt, Zoom und Viewport der einzigen Kartenansicht.
//!
//! Projektion ist equirektangular mit Breitengrad-Korrektur am Mittelpunkt;
//! für Stadtteil-große Gebiete reicht das.

use glam::{DVec2, Vec2};

use super::geo::GeoBounds;

/// Meter pro Grad Breitengrad (Näherung).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Live-Kartenfläche. Existiert erst, wenn die Kartenansicht bereit ist.
#[derive(Debug, Clone)]
pub struct MapSurface {
    /// Mittelpunkt der Ansicht (lon/lat)
    pub center: DVec2,
    /// Pixel pro Grad Längengrad
    pub zoom: f64,
    /// Größe der Ansicht in Pixeln
    pub viewport_size: Vec2,
    zoom_min: f64,
    zoom_max: f64,
}

impl MapSurface {
    /// Minimaler Zoom (Pixel pro Grad).
    pub const ZOOM_MIN: f64 = 10.0;
    /// Maximaler Zoom (Pixel pro Grad).
    pub const ZOOM_MAX: f64 = 5.0e7;

    /// Erstellt eine Kartenfläche mit Standard-Zoomgrenzen.
    pub fn new(viewport_size: Vec2) -> Self {
        Self::with_zoom_limits(viewport_size, Self::ZOOM_MIN, Self::ZOOM_MAX)
    }

    /// Erstellt eine Kartenfläche mit konfigurierten Zoomgrenzen.
    pub fn with_zoom_limits(viewport_size: Vec2, zoom_min: f64, zoom_max: f64) -> Self {
        let zoom_min = zoom_min.max(f64::MIN_POSITIVE);
        Self {
            center: DVec2::ZERO,
            zoom: zoom_min,
            viewport_size,
            zoom_min,
            zoom_max: zoom_max.max(zoom_min),
        }
    }

    /// Passt die Viewport-Größe an (gleiche Fläche, neue Größe).
    pub fn resize(&mut self, viewport_size: Vec2) {
        self.viewport_size = viewport_size;
    }

    fn lat_factor(&self) -> f64 {
        self.center.y.to_radians().cos().max(0.01)
    }

    fn half_viewport(&self) -> DVec2 {
        self.viewport_size.as_dvec2() * 0.5
    }

    /// Zentriert die Ansicht auf die Box, sodass sie mit Rand vollständig sichtbar ist.
    pub fn fit_bounds(&mut self, bounds: &GeoBounds, padding_px: f32) {
        self.center = bounds.center();
        let available = (self.viewport_size - Vec2::splat(2.0 * padding_px))
            .max(Vec2::ONE)
            .as_dvec2();
        let size = bounds.size();
        let lat_factor = self.lat_factor();

        let zoom_x = if size.x > 0.0 {
            available.x / size.x
        } else {
            f64::INFINITY
        };
        let zoom_y = if size.y > 0.0 {
            available.y * lat_factor / size.y
        } else {
            f64::INFINITY
        };
        let zoom = zoom_x.min(zoom_y);
        self.zoom = if zoom.is_finite() {
            zoom.clamp(self.zoom_min, self.zoom_max)
        } else {
            self.zoom_max
        };
    }

    /// Geo-Position → Bildschirm-Position (relativ zur linken oberen Ecke).
    pub fn geo_to_screen(&self, pos: DVec2) -> Vec2 {
        let d = pos - self.center;
        let px = DVec2::new(d.x * self.zoom, -d.y * self.zoom / self.lat_factor());
        (self.half_viewport() + px).as_vec2()
    }

    /// Bildschirm-Position → Geo-Position.
    pub fn screen_to_geo(&self, screen: Vec2) -> DVec2 {
        let px = screen.as_dvec2() - self.half_viewport();
        self.center + DVec2::new(px.x / self.zoom, -px.y * self.lat_factor() / self.zoom)
    }

    /// Verschiebt die Karte um ein Pixel-Delta (Karte folgt dem Zeiger).
    pub fn pan(&mut self, delta_px: Vec2) {
        let d = delta_px.as_dvec2();
        self.center -= DVec2::new(d.x / self.zoom, -d.y * self.lat_factor() / self.zoom);
    }

    /// Zoomt um `factor`; die Geo-Position unter `anchor` bleibt stehen.
    pub fn zoom_towards(&mut self, factor: f64, anchor: Vec2) {
        let before = self.screen_to_geo(anchor);
        self.zoom = (self.zoom * factor).clamp(self.zoom_min, self.zoom_max);
        let after = self.screen_to_geo(anchor);
        self.center += before - after;
    }

    /// Meter pro Bildschirm-Pixel am Mittelpunkt.
    pub fn meters_per_pixel(&self) -> f64 {
        METERS_PER_DEGREE * self.lat_factor() / self.zoom
    }

    /// Sichtbarer Ausschnitt.
    pub fn visible_bounds(&self) -> GeoBounds {
        GeoBounds::new(
            self.screen_to_geo(Vec2::ZERO),
            self.screen_to_geo(self.viewport_size),
        )
    }
}
