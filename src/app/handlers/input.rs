//! Handler für Eingabefelder der Seitenleiste und die Overpass-Abfrage.

use crate::app::regions::TextField;
use crate::app::AppState;
use crate::core::overpass::{overpass_query, polygon_from_geojson};
use crate::error::EditorResult;

/// Übernimmt den Inhalt eines Eingabefelds.
pub fn set_text_field(state: &mut AppState, field: TextField, value: String) {
    match field {
        TextField::ProjectName => state.ui.project_name = value,
        TextField::BoundaryName => state.ui.boundary_name = value,
        TextField::OverpassPolygon => {
            state.ui.overpass_polygon_text = value;
            state.ui.overpass_query = None;
        }
    }
}

/// Baut die Overpass-Abfrage aus dem eingefügten GeoJSON-Polygon.
pub fn build_overpass_query(state: &mut AppState) -> EditorResult<()> {
    let polygon = polygon_from_geojson(&state.ui.overpass_polygon_text)?;
    let query = overpass_query(&polygon);
    log::debug!("Overpass-Abfrage: {}", query);
    state.ui.overpass_query = Some(query);
    state.ui.set_status("Overpass-Abfrage erstellt");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EditorError, ImportError};

    #[test]
    fn invalid_geojson_leaves_no_query() {
        let mut state = AppState::new();
        set_text_field(&mut state, TextField::OverpassPolygon, "kein json".into());

        let result = build_overpass_query(&mut state);

        assert!(matches!(
            result,
            Err(EditorError::Import(ImportError::GeoJson(_)))
        ));
        assert!(state.ui.overpass_query.is_none());
    }

    #[test]
    fn polygon_text_produces_query() {
        let mut state = AppState::new();
        let geojson = r#"{"type":"Polygon","coordinates":[[[13.40,52.50],[13.41,52.50],[13.41,52.51],[13.40,52.50]]]}"#;
        set_text_field(&mut state, TextField::OverpassPolygon, geojson.into());

        build_overpass_query(&mut state).expect("gültiges Polygon");

        let query = state.ui.overpass_query.as_deref().expect("Abfrage gesetzt");
        assert!(query.contains("poly:"));
        assert!(query.contains("52.5 13.4"));
    }
}
