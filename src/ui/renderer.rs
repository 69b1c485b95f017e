//! Top-level rendering coordinator.
//!
//! Picks the home screen or the view on top of the navigation stack,
//! computes its view model and hands it to the components.

use crate::app::AppState;
use crate::navigation::{Navigator, Route};
use crate::ui::components;

/// Renders the plugin UI to stdout.
///
/// Prints ANSI-styled output with `print!`. Does not clear the screen.
pub fn render(state: &AppState, navigator: &Navigator, rows: usize, cols: usize) {
    let _span = tracing::trace_span!("render", rows = rows, cols = cols, depth = navigator.depth())
        .entered();

    match navigator.current() {
        Route::Home => {
            let viewmodel = state.compute_viewmodel(rows, cols);
            components::render_home(&viewmodel, &state.theme, cols, rows);
        }
        route => {
            let viewmodel = state.compute_route_viewmodel(route, rows);
            components::render_route(&viewmodel, &state.theme, cols, rows);
        }
    }
}
