//! Application-Layer: Controller, Session-State, Modi und Routen-Koordinator.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod handlers;
pub mod history;
mod intent_mapping;
pub mod mode;
pub mod modes;
pub mod regions;
pub mod route_drawer;
/// Session-State
///
/// Hält alle Stores der laufenden Sitzung (Modus, Netz, Kartenfläche, Regionen).
pub mod state;
pub mod tasks;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent};
pub use history::EditHistory;
pub use mode::{BoundaryRef, Mode, ModeKind};
pub use modes::{ModeContext, ModeController, ModeManager};
pub use regions::{MapOverlay, OverlayLayer, OverlayShape, SidebarContent, SidebarItem, TextField};
pub use route_drawer::{RouteDrawer, RouteGeometry, Waypoint};
pub use state::{AppState, UiState, ViewState};
pub use tasks::{BackgroundTasks, TaskKind};
