//! View model types representing renderable UI state.
//!
//! View models are computed from `AppState` (home screen) or from the top
//! navigation route and consumed by the renderer. They contain no business
//! logic, only display-ready data.

use crate::domain::Section;

/// Complete home screen view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    /// Header information (title, saved count).
    pub header: HeaderInfo,

    /// Loading indicator or the section list.
    pub body: HomeBody,

    /// Footer information (keybindings, help text).
    pub footer: FooterInfo,

    /// Search bar information (when in search mode).
    pub search_bar: Option<SearchBarInfo>,
}

/// What the area between header and footer shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeBody {
    /// No complete snapshot yet.
    Loading(LoadingView),
    /// Sections of the visible snapshot, in display order.
    Sections(Vec<SectionView>),
}

/// Spinner and bouncing "Please wait" label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingView {
    pub spinner: &'static str,
    pub label: String,
    /// Rows the label is pushed down in the current animation frame.
    pub label_offset: usize,
}

/// One section of the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub section: Section,
    pub header: Option<SectionHeaderView>,
    pub presentation: Presentation,
    pub is_focused: bool,
}

/// Section title with its optional toggle control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeaderView {
    pub title: String,
    pub toggle: Option<String>,
    /// The section is in the middle of an expand/collapse transition.
    pub is_animating: bool,
}

/// How a section's cards are arranged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// One row of cards, windowed around the focus.
    Rail {
        cards: Vec<CardView>,
        card_width: usize,
        more_before: bool,
        more_after: bool,
    },
    /// Rows of cards side by side, windowed around the focus.
    Grid {
        rows: Vec<Vec<CardView>>,
        card_width: usize,
        more_above: bool,
        more_below: bool,
    },
    /// The section has no items.
    Empty { message: String },
}

/// Cover art state of a book card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverView {
    /// Time tiles have no cover.
    None,
    /// Still resolving, or no art exists: draw the placeholder.
    Placeholder,
    /// Cached ASCII art lines.
    Art(Vec<String>),
}

/// One time tile or book card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub cover: CoverView,
    pub is_focused: bool,
    pub is_saved: bool,
    /// The card was inserted by the running snapshot transition.
    pub is_inserted: bool,
    /// The card changed position in the running snapshot transition.
    pub is_moved: bool,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Title text to display in the header.
    pub title: String,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Current search query text.
    pub query: String,
}

/// View model of a view opened above the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteViewModel {
    pub header: HeaderInfo,
    pub body: RouteBody,
    pub footer: FooterInfo,
}

/// Content of a route view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteBody {
    /// One book with its cover.
    Detail(DetailView),
    /// Books saved in a window or matching a search.
    List(ListView),
}

/// Detail card of one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub key: String,
    pub cover: CoverView,
    pub is_saved: bool,
}

/// Scrollable list of books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Rows in the visible window.
    pub rows: Vec<ListRow>,
    /// Shown instead of rows when there is nothing to list.
    pub empty_message: Option<String>,
}

/// One row of a book list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub title: String,
    /// Author, or the save date in time-filtered lists.
    pub detail: String,
    /// Matched character ranges of the title.
    pub title_ranges: Vec<(usize, usize)>,
    pub is_selected: bool,
    pub is_saved: bool,
}
