//! Zentrale Konfiguration für den LTN-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Kartenfläche ────────────────────────────────────────────────────

/// Minimaler Zoom (Pixel pro Grad Längengrad).
pub const MAP_ZOOM_MIN: f64 = 10.0;
/// Maximaler Zoom (Pixel pro Grad Längengrad).
pub const MAP_ZOOM_MAX: f64 = 5.0e7;
/// Zoom-Schritt bei Menü-Buttons.
pub const MAP_ZOOM_STEP: f64 = 1.2;
/// Zoom-Schritt bei Mausrad-Scroll.
pub const MAP_SCROLL_ZOOM_STEP: f64 = 1.1;
/// Rand in Pixeln beim Einpassen auf die Netz-Ausdehnung.
pub const FIT_PADDING_PX: f32 = 24.0;

// ── Routen ──────────────────────────────────────────────────────────

/// Maximale Distanz (Meter), innerhalb der ein Wegpunkt auf eine Kreuzung einrastet.
pub const SNAP_MAX_DISTANCE_M: f64 = 50.0;
/// Pick-Radius für Wegpunkte in Screen-Pixeln.
pub const WAYPOINT_HIT_RADIUS_PX: f32 = 10.0;
/// Maximale Anzahl Undo-Schritte pro Route.
pub const HISTORY_DEPTH: usize = 100;

// ── Darstellung ─────────────────────────────────────────────────────

/// Farbe der Straßen im Netz-Modus (RGBA).
pub const ROAD_COLOR: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
/// Farbe von Nachbarschafts-Grenzen (RGBA).
pub const BOUNDARY_COLOR: [f32; 4] = [0.1, 0.3, 0.9, 1.0];
/// Farbe von Straßen innerhalb einer Nachbarschaft (RGBA).
pub const INTERIOR_ROAD_COLOR: [f32; 4] = [0.2, 0.7, 0.3, 1.0];
/// Farbe der eingerasteten Route (RGBA).
pub const ROUTE_COLOR: [f32; 4] = [0.9, 0.4, 0.0, 1.0];
/// Farbe fehlgeschlagener Segmente (RGBA).
pub const FAILED_SEGMENT_COLOR: [f32; 4] = [0.9, 0.0, 0.0, 1.0];
/// Farbe der Wegpunkte (RGBA).
pub const WAYPOINT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
/// Farbe hervorgehobener Elemente (RGBA).
pub const HIGHLIGHT_COLOR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
/// Farbe modaler Filter und der Filter-Linie (RGBA).
pub const FILTER_COLOR: [f32; 4] = [0.85, 0.1, 0.1, 1.0];
/// Farbe der Route ohne Filter im Routenvergleich (RGBA).
pub const ROUTE_BEFORE_COLOR: [f32; 4] = [0.3, 0.3, 0.3, 0.8];
/// Abdunklung außerhalb des Untersuchungsgebiets (RGBA).
pub const MASK_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.35];
/// Linienbreite der Straßen in Pixeln.
pub const ROAD_WIDTH_PX: f32 = 1.5;
/// Linienbreite der Route und Grenzen in Pixeln.
pub const ROUTE_WIDTH_PX: f32 = 4.0;
/// Radius der Wegpunkt-Marker in Pixeln.
pub const WAYPOINT_RADIUS_PX: f32 = 5.0;

// ── Dienste ─────────────────────────────────────────────────────────

/// Standard-Overpass-Endpunkt (nur für den angezeigten Abfrage-Link).
pub const OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `ltn_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    // ── Kartenfläche ────────────────────────────────────────────
    /// Minimaler Zoom
    pub map_zoom_min: f64,
    /// Maximaler Zoom
    pub map_zoom_max: f64,
    /// Zoom-Schritt bei Menü-Buttons
    pub map_zoom_step: f64,
    /// Zoom-Schritt bei Mausrad-Scroll
    pub map_scroll_zoom_step: f64,
    /// Rand beim Einpassen
    pub fit_padding_px: f32,

    // ── Routen ──────────────────────────────────────────────────
    /// Maximale Snap-Distanz in Metern
    pub snap_max_distance_m: f64,
    /// Pick-Radius für Wegpunkte
    pub waypoint_hit_radius_px: f32,
    /// Undo-Tiefe pro Route
    pub history_depth: usize,

    // ── Darstellung ─────────────────────────────────────────────
    /// Straßen
    pub road_color: [f32; 4],
    /// Grenzen
    pub boundary_color: [f32; 4],
    /// Straßen innerhalb der Nachbarschaft
    pub interior_road_color: [f32; 4],
    /// Route
    pub route_color: [f32; 4],
    /// Fehlgeschlagene Segmente
    pub failed_segment_color: [f32; 4],
    /// Wegpunkte
    pub waypoint_color: [f32; 4],
    /// Hervorhebung (ausgewählte Straße)
    pub highlight_color: [f32; 4],
    /// Modale Filter
    pub filter_color: [f32; 4],
    /// Routenvergleich: Route ohne Filter
    pub route_before_color: [f32; 4],
    /// Maske außerhalb des Untersuchungsgebiets
    pub mask_color: [f32; 4],
    /// Linienbreite Straßen
    pub road_width_px: f32,
    /// Linienbreite Route/Grenzen
    pub route_width_px: f32,
    /// Radius Wegpunkt-Marker
    pub waypoint_radius_px: f32,

    // ── Speicher & Dienste ──────────────────────────────────────
    /// Verzeichnis für gespeicherte Projekte (`None` = nur im Speicher)
    pub store_dir: Option<std::path::PathBuf>,
    /// Overpass-Endpunkt
    pub overpass_endpoint: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            map_zoom_min: MAP_ZOOM_MIN,
            map_zoom_max: MAP_ZOOM_MAX,
            map_zoom_step: MAP_ZOOM_STEP,
            map_scroll_zoom_step: MAP_SCROLL_ZOOM_STEP,
            fit_padding_px: FIT_PADDING_PX,

            snap_max_distance_m: SNAP_MAX_DISTANCE_M,
            waypoint_hit_radius_px: WAYPOINT_HIT_RADIUS_PX,
            history_depth: HISTORY_DEPTH,

            road_color: ROAD_COLOR,
            boundary_color: BOUNDARY_COLOR,
            interior_road_color: INTERIOR_ROAD_COLOR,
            route_color: ROUTE_COLOR,
            failed_segment_color: FAILED_SEGMENT_COLOR,
            waypoint_color: WAYPOINT_COLOR,
            highlight_color: HIGHLIGHT_COLOR,
            filter_color: FILTER_COLOR,
            route_before_color: ROUTE_BEFORE_COLOR,
            mask_color: MASK_COLOR,
            road_width_px: ROAD_WIDTH_PX,
            route_width_px: ROUTE_WIDTH_PX,
            waypoint_radius_px: WAYPOINT_RADIUS_PX,

            store_dir: None,
            overpass_endpoint: OVERPASS_ENDPOINT.to_string(),
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("ltn_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("ltn_editor.toml")
    }

    /// Wandelt eine RGBA-Farbe in eine egui-Farbe.
    pub fn color32(rgba: [f32; 4]) -> egui::Color32 {
        egui::Rgba::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3]).into()
    }
}
