//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar
//! - [`footer`]: Keybinding hints
//! - [`search`]: Search input box
//! - [`loading`]: Spinner and bouncing wait label
//! - [`section`]: Section header with its rail, grid or empty message
//! - [`card`]: Book cards and time tiles
//! - [`route`]: Detail and list views above the home screen
//!
//! # Layouts
//!
//! ```text
//! [blank]            [blank]
//! [Header]           [Header]
//! [Border]           [Border]
//! [Search Bar?]      [Detail / List]
//! [Sections...]
//! [Border]           [Border]
//! [Footer]           [Footer]
//! ```

mod card;
mod footer;
mod header;
mod loading;
mod route;
mod search;
mod section;

pub use card::{card_lines, time_tile_lines, TIME_TILE_ROWS};
pub use section::{first_visible_section, section_height};

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{HomeBody, RouteBody, RouteViewModel, UIViewModel};

use footer::render_footer;
use header::render_header;
use loading::render_loading;
use search::render_search_bar;
use section::render_section;

/// Renders a horizontal border line at `row`. Returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Draws the footer and the border above it on the last two rows.
fn render_bottom(footer: &crate::ui::viewmodel::FooterInfo, theme: &Theme, cols: usize, rows: usize) {
    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);

    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, footer, theme, cols);
}

/// Renders the home screen.
///
/// Sections are drawn top to bottom. When they do not all fit, the earliest
/// ones are skipped until the focused section is on screen.
pub fn render_home(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }

    let body_end = rows.saturating_sub(2);

    match &vm.body {
        HomeBody::Loading(view) => render_loading(view, theme, current_row, body_end, cols),
        HomeBody::Sections(sections) => {
            let available = body_end.saturating_sub(current_row);
            let heights: Vec<usize> = sections.iter().map(section_height).collect();
            let focused = sections.iter().position(|s| s.is_focused).unwrap_or(0);
            let first = first_visible_section(&heights, focused, available);

            for (index, (view, height)) in sections.iter().zip(&heights).enumerate().skip(first) {
                if index > first && current_row + height > body_end + 1 {
                    break;
                }
                current_row = render_section(current_row, view, theme, cols);
            }
        }
    }

    render_bottom(&vm.footer, theme, cols, rows);
}

/// Renders a view opened above the home screen.
pub fn render_route(vm: &RouteViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols) + 1;

    match &vm.body {
        RouteBody::Detail(detail) => {
            route::render_detail(current_row, detail, theme, cols);
        }
        RouteBody::List(list) => {
            route::render_list(current_row, list, theme, cols);
        }
    }

    render_bottom(&vm.footer, theme, cols, rows);
}
