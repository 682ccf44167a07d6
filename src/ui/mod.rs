//! UI-Layer mit egui
//!
//! Jede Komponente liest den AppState und gibt `AppIntent`s zurück; der
//! State wird ausschließlich über den Controller verändert.

pub mod dialogs;
pub mod keyboard;
pub mod map_view;
pub mod menu;
pub mod sidebar;
pub mod status;

pub use dialogs::{handle_file_dialogs, show_about_window};
pub use keyboard::collect_keyboard_intents;
pub use map_view::MapViewState;
pub use menu::render_menu;
pub use sidebar::render_sidebar;
pub use status::render_status_bar;
