//! Handler für Moduswechsel, Mount/Unmount und Regionen-Übergabe.

use crate::app::mode::Mode;
use crate::app::AppState;
use crate::error::EditorResult;

/// Wechselt in `mode`.
///
/// Ungültige Wechsel lassen den Zustand unverändert. Ist der Modus bereits
/// aktiv und gemountet, werden nur die Regionen aufgefrischt.
pub fn transition(state: &mut AppState, mode: Mode) -> EditorResult<()> {
    state.validate_transition(&mode)?;

    if *state.mode() == mode && state.modes.mounted() == Some(mode.kind()) {
        refresh_regions(state);
        return Ok(());
    }

    unmount_active(state);
    let previous = state.replace_mode(mode);
    if let Err(e) = mount_active(state) {
        log::warn!("Modus '{}' nicht betretbar: {}", state.mode().kind(), e);
        state.replace_mode(previous);
        if let Err(e) = mount_active(state) {
            log::error!("Vorheriger Modus nicht wiederherstellbar: {}", e);
        }
        refresh_regions(state);
        return Err(e);
    }
    log::info!("Modus: {} -> {}", previous.kind(), state.mode().kind());
    refresh_regions(state);
    Ok(())
}

/// Mountet den Controller des aktiven Modus (idempotent).
pub fn mount_active(state: &mut AppState) -> EditorResult<()> {
    let kind = state.mode().kind();
    if state.modes.mounted() == Some(kind) {
        return Ok(());
    }
    let (modes, mode, mut ctx) = state.split_for_mount();
    if let Some(controller) = modes.controller_mut(kind) {
        controller.on_mount(mode, &mut ctx)?;
    }
    modes.set_mounted(Some(kind));
    Ok(())
}

/// Unmountet den aktuell gemounteten Controller und zieht seine Regionen zurück.
pub fn unmount_active(state: &mut AppState) {
    if let Some(kind) = state.modes.mounted() {
        if let Some(controller) = state.modes.controller_mut(kind) {
            controller.on_unmount();
        }
        state.modes.set_mounted(None);
    }
    state.regions.retract_all();
}

/// Übergibt Seitenleiste und Overlay an die aktuellen Inhalte des Controllers.
pub fn refresh_regions(state: &mut AppState) {
    let kind = state.mode().kind();
    let contents = {
        let ctx = state.mode_context();
        state
            .modes
            .controller(kind)
            .map(|c| (c.sidebar(&ctx), c.overlay(&ctx)))
    };
    match contents {
        Some((sidebar, overlay)) => state.regions.hand_over(sidebar, overlay),
        None => state.regions.retract_all(),
    }
}

/// Verwirft das Netz und kehrt zur Projektauswahl zurück.
pub fn reset_to_title(state: &mut AppState) {
    unmount_active(state);
    state.route = None;
    state.clear_model();
    state.replace_mode(Mode::Title);
    if let Err(e) = mount_active(state) {
        log::error!("Projektauswahl nicht mountbar: {}", e);
    }
    refresh_regions(state);
}
