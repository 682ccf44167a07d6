use glam::DVec2;
use ltn_editor::core::DirectoryStore;
use ltn_editor::{
    AppCommand, AppController, AppIntent, AppState, EditorError, EditorOptions, Mode,
    ProjectStore, ValidationError,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Pollt, bis keine Hintergrund-Aufgabe mehr läuft.
fn wait_for_tasks(controller: &mut AppController, state: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while state.tasks.any_busy() {
        controller.poll_tasks(state);
        assert!(
            Instant::now() < deadline,
            "Hintergrund-Aufgabe wurde nicht rechtzeitig fertig"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn import_grid(controller: &mut AppController, state: &mut AppState) {
    controller
        .handle_intent(
            state,
            AppIntent::NetworkFileSelected {
                path: fixture_path("grid_4x4.osm"),
            },
        )
        .expect("Import sollte starten");
    wait_for_tasks(controller, state);
    assert!(state.model().is_some(), "Netz sollte geladen sein");
}

/// Zeichnet das mittlere Gitterquadrat als Grenze und speichert sie.
fn draw_center_boundary(controller: &mut AppController, state: &mut AppState) {
    controller
        .handle_intent(
            state,
            AppIntent::ModeRequested {
                mode: Mode::SetBoundary { existing: None },
            },
        )
        .expect("SetBoundary sollte erreichbar sein");

    for (lon, lat) in [
        (13.401, 52.501),
        (13.402, 52.501),
        (13.402, 52.502),
        (13.401, 52.502),
    ] {
        controller
            .handle_intent(
                state,
                AppIntent::MapClicked {
                    position: DVec2::new(lon, lat),
                },
            )
            .expect("Wegpunkt sollte gesetzt werden");
    }

    controller
        .handle_intent(state, AppIntent::FinishBoundaryRequested)
        .expect("Grenze sollte vollständig sein");
}

#[test]
fn test_exit_requested_sets_exit_flag_and_logs_command() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    assert!(!state.should_exit);

    controller
        .handle_intent(&mut state, AppIntent::ExitRequested)
        .expect("ExitRequested sollte ohne Fehler durchlaufen");

    assert!(state.should_exit);

    let last = state
        .command_log
        .entries()
        .last()
        .expect("Es sollte ein Command geloggt sein");

    match last {
        AppCommand::RequestExit => {}
        other => panic!("Unerwarteter letzter Command: {other:?}"),
    }
}

#[test]
fn test_mode_request_without_model_is_rejected_and_keeps_title() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    let err = controller
        .handle_intent(
            &mut state,
            AppIntent::ModeRequested {
                mode: Mode::Network,
            },
        )
        .expect_err("Netz-Ansicht ohne Netz muss scheitern");

    assert!(matches!(
        err,
        EditorError::Validation(ValidationError::ModelRequired { .. })
    ));
    assert_eq!(state.mode(), &Mode::Title);
    assert!(state.ui.last_error.is_some());
    assert!(state
        .regions
        .sidebar
        .is_owned_by(ltn_editor::ModeKind::Title));
}

#[test]
fn test_import_installs_model_and_forces_network_mode() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    import_grid(&mut controller, &mut state);

    assert_eq!(state.mode(), &Mode::Network);
    assert!(state.route.is_some(), "Routen-Koordinator fehlt");
    assert_eq!(state.ui.project_name, "grid_4x4");
    assert_eq!(state.ui.network_path, Some(fixture_path("grid_4x4.osm")));
    assert!(state
        .regions
        .map_overlay
        .is_owned_by(ltn_editor::ModeKind::Network));
    // Kartenansicht noch nicht bereit: Einpassen wird nachgeholt
    assert!(state.view.pending_fit);
}

#[test]
fn test_failed_import_keeps_previous_network() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);
    let roads_before = state.model().map(|m| m.roads.len());

    let dir = tempfile::tempdir().expect("temp dir");
    let broken = dir.path().join("kaputt.osm");
    std::fs::write(&broken, "<osm><node id=\"1\" lat=\"x\" lon=\"2\"/></osm>").expect("write");

    controller
        .handle_intent(&mut state, AppIntent::NetworkFileSelected { path: broken })
        .expect("Import sollte starten");
    wait_for_tasks(&mut controller, &mut state);

    assert!(matches!(
        state.ui.last_error,
        Some(EditorError::Import(_))
    ));
    assert_eq!(state.mode(), &Mode::Network);
    assert_eq!(state.model().map(|m| m.roads.len()), roads_before);
    assert_eq!(state.ui.network_path, Some(fixture_path("grid_4x4.osm")));
}

#[test]
fn test_second_import_while_busy_is_rejected() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    let path = fixture_path("grid_4x4.osm");

    controller
        .handle_intent(
            &mut state,
            AppIntent::NetworkFileSelected { path: path.clone() },
        )
        .expect("Erster Import sollte starten");

    // Ohne Poll bleibt die erste Aufgabe eingetragen
    let err = controller
        .handle_intent(&mut state, AppIntent::NetworkFileSelected { path })
        .expect_err("Zweiter Import muss abgelehnt werden");
    assert!(matches!(err, EditorError::Busy(_)));

    wait_for_tasks(&mut controller, &mut state);
    assert_eq!(state.mode(), &Mode::Network);
}

#[test]
fn test_finished_boundary_opens_neighbourhood() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);

    draw_center_boundary(&mut controller, &mut state);

    assert_eq!(state.mode(), &Mode::Neighbourhood);
    let model = state.model().expect("Netz");
    let (name, _) = model
        .active_neighbourhood()
        .expect("Nachbarschaft sollte aktiv sein");
    assert_eq!(name, "Nachbarschaft 1");
    assert!(state
        .regions
        .sidebar
        .is_owned_by(ltn_editor::ModeKind::Neighbourhood));
}

#[test]
fn test_repeated_mode_request_does_not_remount() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);

    controller
        .handle_intent(&mut state, AppIntent::ModeRequested { mode: Mode::Route })
        .expect("Route sollte erreichbar sein");
    controller
        .handle_intent(
            &mut state,
            AppIntent::MapClicked {
                position: DVec2::new(13.401, 52.501),
            },
        )
        .expect("Wegpunkt sollte gesetzt werden");

    // Mount würde die Route zurücksetzen
    controller
        .handle_intent(&mut state, AppIntent::ModeRequested { mode: Mode::Route })
        .expect("Gleicher Modus sollte ohne Fehler durchlaufen");

    assert_eq!(state.route.as_ref().map(|r| r.len()), Some(1));
    assert_eq!(state.modes.mounted(), Some(ltn_editor::ModeKind::Route));
}

#[test]
fn test_save_switch_and_load_restores_neighbourhoods() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = DirectoryStore::open(dir.path().join("projekte")).expect("Speicher");
    let mut controller = AppController::new();
    let mut state = AppState::with_store(EditorOptions::default(), Box::new(store));

    import_grid(&mut controller, &mut state);
    draw_center_boundary(&mut controller, &mut state);

    controller
        .handle_intent(&mut state, AppIntent::SaveProjectRequested)
        .expect("Speichern sollte gelingen");
    assert!(state.store.keys().contains(&"ltn_grid_4x4".to_string()));

    controller
        .handle_intent(&mut state, AppIntent::SwitchProjectRequested)
        .expect("Projektwechsel sollte gelingen");
    assert_eq!(state.mode(), &Mode::Title);
    assert!(state.model().is_none());
    assert!(state.route.is_none());
    assert_eq!(state.project_names(), vec!["grid_4x4".to_string()]);

    controller
        .handle_intent(
            &mut state,
            AppIntent::LoadProjectRequested {
                name: "grid_4x4".into(),
            },
        )
        .expect("Laden sollte starten");
    wait_for_tasks(&mut controller, &mut state);

    assert_eq!(state.mode(), &Mode::Network);
    let model = state.model().expect("Netz");
    assert!(model.neighbourhood("Nachbarschaft 1").is_some());
    assert_eq!(state.ui.project_name, "grid_4x4");
}

#[test]
fn test_loading_unknown_project_reports_storage_error() {
    let mut controller = AppController::new();
    let mut state = AppState::new();

    let err = controller
        .handle_intent(
            &mut state,
            AppIntent::LoadProjectRequested {
                name: "gibt_es_nicht".into(),
            },
        )
        .expect_err("Unbekanntes Projekt muss scheitern");

    assert!(matches!(err, EditorError::Storage(_)));
    assert!(!state.tasks.any_busy());
    assert_eq!(state.mode(), &Mode::Title);
}

/// Zeichnet eine Grenze aus freien Wegpunkten knapp innerhalb des mittleren
/// Gitterquadrats; vier Straßen liegen dann eindeutig im Inneren.
fn draw_free_boundary(controller: &mut AppController, state: &mut AppState) {
    controller
        .handle_intent(
            state,
            AppIntent::ModeRequested {
                mode: Mode::SetBoundary { existing: None },
            },
        )
        .expect("SetBoundary sollte erreichbar sein");
    controller
        .handle_intent(state, AppIntent::ToggleSnapModeRequested)
        .expect("Einrasten sollte umschaltbar sein");
    for (lon, lat) in [
        (13.4007, 52.5007),
        (13.4023, 52.5007),
        (13.4023, 52.5023),
        (13.4007, 52.5023),
    ] {
        controller
            .handle_intent(
                state,
                AppIntent::MapClicked {
                    position: DVec2::new(lon, lat),
                },
            )
            .expect("Wegpunkt sollte gesetzt werden");
    }
    controller
        .handle_intent(state, AppIntent::FinishBoundaryRequested)
        .expect("Grenze sollte vollständig sein");
}

fn filter_count(state: &AppState) -> usize {
    state.model().map_or(0, |m| m.modal_filters().len())
}

#[test]
fn test_project_load_is_rejected_while_import_runs() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);
    controller
        .handle_intent(&mut state, AppIntent::SaveProjectRequested)
        .expect("Speichern sollte gelingen");

    controller
        .handle_intent(
            &mut state,
            AppIntent::NetworkFileSelected {
                path: fixture_path("grid_4x4.osm"),
            },
        )
        .expect("Import sollte starten");
    let err = controller
        .handle_intent(
            &mut state,
            AppIntent::LoadProjectRequested {
                name: "grid_4x4".into(),
            },
        )
        .expect_err("Laden während eines Imports muss abgelehnt werden");
    assert!(matches!(err, EditorError::Busy(_)));

    wait_for_tasks(&mut controller, &mut state);
    assert_eq!(state.mode(), &Mode::Network);
}

#[test]
fn test_import_during_boundary_drawing_unmounts_it() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);
    controller
        .handle_intent(
            &mut state,
            AppIntent::ModeRequested {
                mode: Mode::SetBoundary { existing: None },
            },
        )
        .expect("SetBoundary sollte erreichbar sein");
    controller
        .handle_intent(
            &mut state,
            AppIntent::MapClicked {
                position: DVec2::new(13.401, 52.501),
            },
        )
        .expect("Wegpunkt sollte gesetzt werden");
    assert_eq!(state.route.as_ref().map(|r| r.len()), Some(1));

    import_grid(&mut controller, &mut state);

    assert_eq!(state.mode(), &Mode::Network);
    assert_eq!(state.modes.mounted(), Some(ltn_editor::ModeKind::Network));
    assert!(state
        .regions
        .sidebar
        .is_owned_by(ltn_editor::ModeKind::Network));
    assert!(state
        .regions
        .map_overlay
        .is_owned_by(ltn_editor::ModeKind::Network));
    assert_eq!(state.route.as_ref().map(|r| r.len()), Some(0));
}

#[test]
fn test_project_load_during_route_drawing_unmounts_it() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);
    controller
        .handle_intent(&mut state, AppIntent::SaveProjectRequested)
        .expect("Speichern sollte gelingen");
    controller
        .handle_intent(&mut state, AppIntent::ModeRequested { mode: Mode::Route })
        .expect("Route sollte erreichbar sein");
    controller
        .handle_intent(
            &mut state,
            AppIntent::MapClicked {
                position: DVec2::new(13.401, 52.501),
            },
        )
        .expect("Wegpunkt sollte gesetzt werden");

    controller
        .handle_intent(
            &mut state,
            AppIntent::LoadProjectRequested {
                name: "grid_4x4".into(),
            },
        )
        .expect("Laden sollte starten");
    wait_for_tasks(&mut controller, &mut state);

    assert_eq!(state.mode(), &Mode::Network);
    assert_eq!(state.modes.mounted(), Some(ltn_editor::ModeKind::Network));
    assert!(state
        .regions
        .sidebar
        .is_owned_by(ltn_editor::ModeKind::Network));
    assert_eq!(state.route.as_ref().map(|r| r.len()), Some(0));
}

#[test]
fn test_renamed_boundary_replaces_old_entry_and_keeps_waypoints() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);
    draw_free_boundary(&mut controller, &mut state);

    controller
        .handle_intent(
            &mut state,
            AppIntent::ModeRequested {
                mode: Mode::SetBoundary {
                    existing: Some(ltn_editor::BoundaryRef("Nachbarschaft 1".into())),
                },
            },
        )
        .expect("Grenze sollte bearbeitbar sein");
    // Die gezeichneten Wegpunkte kommen zurück, nicht die Ring-Stützpunkte
    assert_eq!(state.route.as_ref().map(|r| r.len()), Some(4));

    controller
        .handle_intent(
            &mut state,
            AppIntent::TextFieldChanged {
                field: ltn_editor::app::TextField::BoundaryName,
                value: "Kiez".into(),
            },
        )
        .expect("Name sollte übernommen werden");
    controller
        .handle_intent(&mut state, AppIntent::FinishBoundaryRequested)
        .expect("Grenze sollte gespeichert werden");

    let model = state.model().expect("Netz");
    assert_eq!(model.neighbourhood_names().collect::<Vec<_>>(), vec!["Kiez"]);
    assert_eq!(model.active_neighbourhood().map(|(n, _)| n), Some("Kiez"));
}

#[test]
fn test_filters_are_set_undone_and_block_the_route() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);
    draw_free_boundary(&mut controller, &mut state);
    assert_eq!(state.mode(), &Mode::Neighbourhood);

    // Klick knapp über der Straße 105-106
    controller
        .handle_intent(
            &mut state,
            AppIntent::MapClicked {
                position: DVec2::new(13.4015, 52.50101),
            },
        )
        .expect("Filter sollte gesetzt werden");
    assert_eq!(filter_count(&state), 1);

    // Linie quer durch die Nachbarschaft kreuzt die beiden senkrechten Straßen
    for lon in [13.4008, 13.4022] {
        controller
            .handle_intent(
                &mut state,
                AppIntent::FilterLinePointRequested {
                    position: DVec2::new(lon, 52.5015),
                },
            )
            .expect("Punkt der Filter-Linie");
    }
    controller
        .handle_intent(&mut state, AppIntent::ApplyFilterLineRequested)
        .expect("Filter entlang der Linie");
    assert_eq!(filter_count(&state), 3);
    assert!(state.ui.filter_line.is_empty());

    controller
        .handle_intent(&mut state, AppIntent::UndoRequested)
        .expect("Undo");
    assert_eq!(filter_count(&state), 1);
    controller
        .handle_intent(&mut state, AppIntent::RedoRequested)
        .expect("Redo");
    assert_eq!(filter_count(&state), 3);
    controller
        .handle_intent(&mut state, AppIntent::UndoRequested)
        .expect("Undo");

    // Route über die gefilterte Straße muss ausweichen
    controller
        .handle_intent(&mut state, AppIntent::ModeRequested { mode: Mode::Route })
        .expect("Route sollte erreichbar sein");
    for lon in [13.401, 13.402] {
        controller
            .handle_intent(
                &mut state,
                AppIntent::MapClicked {
                    position: DVec2::new(lon, 52.501),
                },
            )
            .expect("Wegpunkt sollte gesetzt werden");
    }
    controller
        .handle_intent(&mut state, AppIntent::CompareRouteRequested)
        .expect("Vergleich sollte gelingen");
    let detour = state
        .ui
        .route_comparison
        .as_ref()
        .and_then(|c| c.detour_m())
        .expect("Route vor und nach den Filtern");
    assert!(detour > 100.0, "Umweg nur {detour} m");

    // Jede Änderung der Route verwirft den Vergleich
    controller
        .handle_intent(
            &mut state,
            AppIntent::MapClicked {
                position: DVec2::new(13.402, 52.502),
            },
        )
        .expect("Wegpunkt sollte gesetzt werden");
    assert!(state.ui.route_comparison.is_none());
}

#[test]
fn test_closing_neighbourhood_returns_to_network() {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    import_grid(&mut controller, &mut state);
    draw_free_boundary(&mut controller, &mut state);

    controller
        .handle_intent(&mut state, AppIntent::CloseNeighbourhoodRequested)
        .expect("Schließen sollte gelingen");

    assert_eq!(state.mode(), &Mode::Network);
    let model = state.model().expect("Netz");
    assert!(model.active_neighbourhood().is_none());
    assert!(model.neighbourhood("Nachbarschaft 1").is_some());
}
