//! Home screen state and view model computation.
//!
//! [`AppState`] is the presentation controller. It exclusively owns the
//! section expansion flags, the screen layout built from them and the
//! snapshot synchronizer, together with the source lists the snapshot is
//! built from. Everything here runs on the plugin's UI thread; worker results
//! reach it only as events.

use super::actions::{Action, TimerTag};
use super::modes::InputMode;
use crate::domain::{BookSummary, Item, ItemId, Section, TimeBucket};
use crate::layout::{
    screen_layout, Dimension, Grouping, ScreenLayout, SectionLayout, SectionLayoutState,
    ToggleOutcome,
};
use crate::navigation::{NavigationRequest, Route};
use crate::snapshot::{Snapshot, SnapshotSynchronizer, TickOutcome};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    CardView, CoverView, DetailView, FooterInfo, HeaderInfo, HomeBody, ListRow, ListView,
    LoadingView, Presentation, RouteBody, RouteViewModel, SearchBarInfo, SectionHeaderView,
    SectionView, UIViewModel,
};
use crate::worker::WorkerMessage;
use crate::Config;
use std::collections::{HashMap, HashSet};

/// Spinner frames shown while the first snapshot is loading.
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Vertical offsets of the wait label, one per animation frame.
const WAIT_LABEL_BOUNCE: [usize; 4] = [0, 1, 2, 1];

const WAIT_LABEL: &str = "Please wait";
const LOAD_FAILED_LABEL: &str = "Could not read your saved books";

/// Layout points per terminal column.
const POINTS_PER_CELL: f32 = 8.0;

/// Rows taken by header, borders and footer around the body.
const CHROME_ROWS: usize = 6;

/// Extra rows taken by the search bar.
const SEARCH_BAR_ROWS: usize = 3;

/// Rows of one book card, borders included.
pub const CARD_ROWS: usize = 8;

/// Focus cursor over the visible snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub section: Section,
    pub index: usize,
}

impl Default for Focus {
    fn default() -> Self {
        Self {
            section: Section::Time,
            index: 0,
        }
    }
}

/// Cover art known for a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverArt {
    Lines(Vec<String>),
    Unavailable,
}

/// An expand/collapse animation in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutTransition {
    generation: u64,
    section: Section,
    frames: u32,
    frames_left: u32,
}

/// Loading indicator animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LoadingIndicator {
    frame: usize,
    timer_pending: bool,
}

/// Home screen state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Color scheme for UI rendering.
    pub theme: Theme,

    /// Current input handling mode.
    pub input_mode: InputMode,

    /// Search query being typed.
    pub search_query: String,

    /// Focus cursor over the visible snapshot.
    pub focus: Focus,

    /// Time buckets from configuration; always available.
    pub time_buckets: Vec<TimeBucket>,

    /// Top books from the catalog, `None` until loaded.
    pub top_books: Option<Vec<BookSummary>>,

    /// Saved books, most recent first, `None` until the library answered.
    pub recent_books: Option<Vec<BookSummary>>,

    /// Keys of books in the user's list.
    pub saved_keys: HashSet<String>,

    /// Resolved or failed cover art by book key.
    pub covers: HashMap<String, CoverArt>,

    catalog_path: String,
    catalog_requested: bool,
    recent_requested: bool,
    requested_covers: HashSet<String>,

    layout_state: SectionLayoutState,
    layout: ScreenLayout,
    layout_transition: Option<LayoutTransition>,
    next_layout_generation: u64,
    transition_frames: u32,

    synchronizer: SnapshotSynchronizer,
    loading: LoadingIndicator,
}

impl AppState {
    /// Creates the home screen state. Nothing is loaded yet.
    #[must_use]
    pub fn new(config: &Config, theme: Theme) -> Self {
        let layout_state = SectionLayoutState::default();
        Self {
            theme,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            focus: Focus::default(),
            time_buckets: TimeBucket::from_labels(config.time_buckets.iter().cloned()),
            top_books: None,
            recent_books: None,
            saved_keys: HashSet::new(),
            covers: HashMap::new(),
            catalog_path: config.catalog_file.clone(),
            catalog_requested: false,
            recent_requested: false,
            requested_covers: HashSet::new(),
            layout_state,
            layout: screen_layout(&layout_state),
            layout_transition: None,
            next_layout_generation: 1,
            transition_frames: config.transition_frames,
            synchronizer: SnapshotSynchronizer::new(config.transition_frames),
            loading: LoadingIndicator::default(),
        }
    }

    #[must_use]
    pub const fn layout_state(&self) -> &SectionLayoutState {
        &self.layout_state
    }

    #[must_use]
    pub const fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    #[must_use]
    pub const fn synchronizer(&self) -> &SnapshotSynchronizer {
        &self.synchronizer
    }

    /// The snapshot the screen shows or is moving towards.
    #[must_use]
    pub fn visible(&self) -> &Snapshot {
        self.synchronizer.visible()
    }

    /// Whether the loading indicator is shown.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.synchronizer.has_content()
    }

    /// Section currently in an expand/collapse transition.
    #[must_use]
    pub fn animating_section(&self) -> Option<Section> {
        self.layout_transition.map(|transition| transition.section)
    }

    /// Asks the worker for every source list that is still missing.
    ///
    /// A list already being loaded is not requested twice.
    pub fn request_missing_data(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.top_books.is_none() && !self.catalog_requested {
            self.catalog_requested = true;
            actions.push(Action::PostToWorker(WorkerMessage::load_catalog(
                self.catalog_path.clone(),
            )));
        }
        if self.recent_books.is_none() && !self.recent_requested {
            self.recent_requested = true;
            actions.push(Action::PostToWorker(WorkerMessage::load_recent_books()));
        }
        actions
    }

    /// Reloads saved books even if a list is already present.
    pub fn reload_recent_books(&mut self) -> Action {
        self.recent_requested = true;
        Action::PostToWorker(WorkerMessage::load_recent_books())
    }

    /// Records that the catalog arrived (or failed) so it may be requested
    /// again later.
    pub fn catalog_settled(&mut self) {
        self.catalog_requested = false;
    }

    /// Records that the saved-books list arrived (or failed).
    pub fn recent_settled(&mut self) {
        self.recent_requested = false;
    }

    /// Replaces the saved-books list and the saved-key set derived from it.
    pub fn set_recent_books(&mut self, books: Vec<BookSummary>) {
        self.saved_keys = books.iter().map(|book| book.key.clone()).collect();
        self.recent_books = Some(books);
    }

    /// Rebuilds the snapshot from the current source lists.
    ///
    /// A failed refresh changes nothing on screen. A successful one starts a
    /// transition (replacing any running one), keeps the focus on the same
    /// item when it survived, and requests covers for newly visible books.
    pub fn refresh(&mut self) -> (bool, Vec<Action>) {
        let focused_id = self.focused_item().map(Item::id);

        let outcome = match self.synchronizer.refresh(
            &self.time_buckets,
            self.top_books.as_deref(),
            self.recent_books.as_deref(),
        ) {
            Ok(outcome) => outcome,
            Err(failure) => {
                tracing::debug!(reason = %failure, "refresh skipped");
                return (false, self.request_missing_data());
            }
        };

        let mut actions = Vec::new();
        if let Some(generation) = outcome.generation {
            actions.push(Action::ScheduleTimer(TimerTag::Snapshot { generation }));
        }

        self.restore_focus(focused_id.as_ref());
        actions.extend(self.request_covers());

        tracing::debug!(
            changes = outcome.changes,
            superseded = ?outcome.superseded,
            "snapshot refreshed"
        );
        (true, actions)
    }

    fn restore_focus(&mut self, previous: Option<&ItemId>) {
        let section = self.focus.section;
        if let Some(index) = previous.and_then(|id| self.visible().position_of(section, id)) {
            self.focus.index = index;
            return;
        }

        let len = self.visible().items(section).len();
        if len > 0 {
            self.focus.index = self.focus.index.min(len - 1);
            return;
        }

        self.focus = Section::ALL
            .iter()
            .find(|&&candidate| !self.visible().items(candidate).is_empty())
            .map_or_else(Focus::default, |&section| Focus { section, index: 0 });
    }

    fn request_covers(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        for section in [Section::TopBooks, Section::RecentBooks] {
            for item in self.synchronizer.visible().items(section) {
                let Some(book) = item.as_book() else {
                    continue;
                };
                let Some(cover) = &book.cover else {
                    continue;
                };
                if self.covers.contains_key(&book.key) || !self.requested_covers.insert(book.key.clone()) {
                    continue;
                }
                actions.push(Action::PostToWorker(WorkerMessage::resolve_cover(
                    book.key.clone(),
                    cover.clone(),
                )));
            }
        }
        actions
    }

    /// Starts the loading animation if it is needed and not yet running.
    pub fn start_loading_animation(&mut self) -> Option<Action> {
        if !self.is_loading() || self.loading.timer_pending {
            return None;
        }
        self.loading.timer_pending = true;
        Some(Action::ScheduleTimer(TimerTag::Loading))
    }

    /// Handles a timer tick. Returns whether to re-render and what to schedule.
    pub fn tick(&mut self, tag: TimerTag) -> (bool, Vec<Action>) {
        match tag {
            TimerTag::Loading => {
                self.loading.timer_pending = false;
                if !self.is_loading() {
                    return (false, vec![]);
                }
                self.loading.frame = self.loading.frame.wrapping_add(1);
                let actions = self.start_loading_animation().into_iter().collect();
                (true, actions)
            }
            TimerTag::Snapshot { generation } => match self.synchronizer.tick(generation) {
                TickOutcome::Stale => (false, vec![]),
                TickOutcome::Advanced { .. } => (
                    true,
                    vec![Action::ScheduleTimer(TimerTag::Snapshot { generation })],
                ),
                TickOutcome::Committed => (true, vec![]),
            },
            TimerTag::Layout { generation } => {
                let Some(transition) = self.layout_transition.as_mut() else {
                    return (false, vec![]);
                };
                if transition.generation != generation {
                    return (false, vec![]);
                }
                transition.frames_left = transition.frames_left.saturating_sub(1);
                if transition.frames_left == 0 {
                    self.layout_transition = None;
                    (true, vec![])
                } else {
                    (true, vec![Action::ScheduleTimer(TimerTag::Layout { generation })])
                }
            }
        }
    }

    /// Expands or collapses a section.
    ///
    /// The new label and the rebuilt layout are applied together. Returns
    /// `None` for the time section.
    pub fn toggle_section(&mut self, section: Section) -> Option<(ToggleOutcome, Vec<Action>)> {
        let outcome = self.layout_state.toggle(section)?;
        self.layout = outcome.layout.clone();

        let mut actions = Vec::new();
        if self.transition_frames > 0 {
            let generation = self.next_layout_generation;
            self.next_layout_generation += 1;
            self.layout_transition = Some(LayoutTransition {
                generation,
                section,
                frames: self.transition_frames,
                frames_left: self.transition_frames,
            });
            actions.push(Action::ScheduleTimer(TimerTag::Layout { generation }));
        }

        Some((outcome, actions))
    }

    /// Item under the focus cursor.
    #[must_use]
    pub fn focused_item(&self) -> Option<&Item> {
        self.visible().item(self.focus.section, self.focus.index)
    }

    fn columns(&self, section: Section) -> usize {
        self.layout
            .section(section)
            .map_or(1, |layout| layout.grouping.columns())
    }

    fn is_grid(&self, section: Section) -> bool {
        self.layout
            .section(section)
            .is_some_and(|layout| layout.grouping == Grouping::TwoColumnGrid)
    }

    /// Moves the focus to the next item of the focused section.
    pub fn move_focus_right(&mut self) -> bool {
        let len = self.visible().items(self.focus.section).len();
        if self.focus.index + 1 < len {
            self.focus.index += 1;
            true
        } else {
            false
        }
    }

    /// Moves the focus to the previous item of the focused section.
    pub fn move_focus_left(&mut self) -> bool {
        if self.focus.index > 0 {
            self.focus.index -= 1;
            true
        } else {
            false
        }
    }

    /// Moves the focus down: one grid row inside an expanded section, else to
    /// the next non-empty section.
    pub fn move_focus_down(&mut self) -> bool {
        let section = self.focus.section;
        if self.is_grid(section) {
            let step = self.columns(section);
            if self.focus.index + step < self.visible().items(section).len() {
                self.focus.index += step;
                return true;
            }
        }

        let mut candidate = section.next();
        while let Some(next) = candidate {
            if !self.visible().items(next).is_empty() {
                self.focus = Focus {
                    section: next,
                    index: 0,
                };
                return true;
            }
            candidate = next.next();
        }
        false
    }

    /// Moves the focus up: one grid row inside an expanded section, else to
    /// the previous non-empty section.
    pub fn move_focus_up(&mut self) -> bool {
        let section = self.focus.section;
        if self.is_grid(section) {
            let step = self.columns(section);
            if self.focus.index >= step {
                self.focus.index -= step;
                return true;
            }
        }

        let mut candidate = section.previous();
        while let Some(previous) = candidate {
            if !self.visible().items(previous).is_empty() {
                self.focus = Focus {
                    section: previous,
                    index: 0,
                };
                return true;
            }
            candidate = previous.previous();
        }
        false
    }

    /// Resolves the item shown at `index` of `section` into a navigation
    /// request.
    ///
    /// The identity is read from the visible snapshot and looked up again in
    /// the source list, so a book that left the list since the last refresh
    /// yields `None` instead of another book.
    #[must_use]
    pub fn select_at(&self, section: Section, index: usize) -> Option<NavigationRequest> {
        let _span = tracing::debug_span!("select_at", section = ?section, index = index).entered();

        let Some(item) = self.visible().item(section, index) else {
            tracing::debug!("selection outside the visible snapshot ignored");
            return None;
        };

        let request = match item {
            Item::Time(bucket) => self
                .time_buckets
                .iter()
                .find(|candidate| candidate.index == bucket.index)
                .cloned()
                .map(NavigationRequest::TimeFiltered),
            Item::Book(book) => self
                .resolve_book(section, &book.key)
                .cloned()
                .map(NavigationRequest::BookDetail),
        };

        if request.is_none() {
            tracing::debug!(id = ?item.id(), "stale selection ignored");
        }
        request
    }

    /// Resolves the focused item into a navigation request.
    #[must_use]
    pub fn select_focused(&self) -> Option<NavigationRequest> {
        self.select_at(self.focus.section, self.focus.index)
    }

    /// Looks a book up by key in the source list behind a section.
    #[must_use]
    pub fn resolve_book(&self, section: Section, key: &str) -> Option<&BookSummary> {
        let source = match section {
            Section::TopBooks => self.top_books.as_deref(),
            Section::RecentBooks => self.recent_books.as_deref(),
            Section::Time => None,
        };
        source?.iter().find(|book| book.key == key)
    }

    /// The focused book, resolved against its source list.
    #[must_use]
    pub fn focused_book(&self) -> Option<&BookSummary> {
        let key = &self.focused_item()?.as_book()?.key;
        self.resolve_book(self.focus.section, key)
    }

    /// Books a search looks through: top books then saved books, each key
    /// once.
    #[must_use]
    pub fn searchable_books(&self) -> Vec<BookSummary> {
        let mut seen = HashSet::new();
        self.top_books
            .iter()
            .chain(self.recent_books.iter())
            .flatten()
            .filter(|book| seen.insert(book.key.as_str()))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn is_saved(&self, key: &str) -> bool {
        self.saved_keys.contains(key)
    }

    /// Computes the home screen view model for the given terminal size.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let body = if self.is_loading() {
            HomeBody::Loading(self.compute_loading())
        } else {
            let available = self.calculate_available_rows(rows);
            HomeBody::Sections(
                self.layout
                    .sections
                    .iter()
                    .map(|layout| self.compute_section(layout, cols, available))
                    .collect(),
            )
        };

        UIViewModel {
            header: self.compute_header(),
            body,
            footer: self.compute_footer(),
            search_bar: self.compute_search_bar(),
        }
    }

    fn compute_loading(&self) -> LoadingView {
        let frame = self.loading.frame;
        LoadingView {
            spinner: SPINNER_FRAMES[frame % SPINNER_FRAMES.len()],
            label: WAIT_LABEL.to_string(),
            label_offset: WAIT_LABEL_BOUNCE[frame % WAIT_LABEL_BOUNCE.len()],
        }
    }

    fn compute_section(&self, layout: &SectionLayout, cols: usize, available_rows: usize) -> SectionView {
        let section = layout.section;
        let is_focused = self.focus.section == section;
        let items = self.visible().items(section);

        let header = layout.header.as_ref().map(|header| SectionHeaderView {
            title: header.title.clone(),
            toggle: header.toggle.map(|label| label.to_string()),
            is_animating: self.animating_section() == Some(section),
        });

        let card_width = Self::card_width(layout, cols);
        let focus_index = if is_focused { self.focus.index } else { 0 };

        let presentation = if items.is_empty() {
            Presentation::Empty {
                message: match section {
                    Section::Time => "No time ranges configured".to_string(),
                    Section::TopBooks => "The catalog has no books".to_string(),
                    Section::RecentBooks => "Nothing saved yet. Press s on a book to add it.".to_string(),
                },
            }
        } else if layout.grouping == Grouping::TwoColumnGrid {
            let columns = layout.grouping.columns();
            let total_rows = items.len().div_ceil(columns);
            let visible_rows = self.revealed(section, (available_rows / CARD_ROWS).max(1));
            let focus_row = focus_index / columns;
            let start = window_start(focus_row, visible_rows, total_rows);
            let end = (start + visible_rows).min(total_rows);

            let rows = (start..end)
                .map(|row| {
                    let first = row * columns;
                    let last = (first + columns).min(items.len());
                    (first..last)
                        .map(|index| self.compute_card(section, index, &items[index], is_focused))
                        .collect()
                })
                .collect();

            Presentation::Grid {
                rows,
                card_width,
                more_above: start > 0,
                more_below: end < total_rows,
            }
        } else {
            let per_row = self.revealed(section, (cols.saturating_sub(2) / (card_width + 1)).max(1));
            let start = window_start(focus_index, per_row, items.len());
            let end = (start + per_row).min(items.len());

            Presentation::Rail {
                cards: (start..end)
                    .map(|index| self.compute_card(section, index, &items[index], is_focused))
                    .collect(),
                card_width,
                more_before: start > 0,
                more_after: end < items.len(),
            }
        };

        SectionView {
            section,
            header,
            presentation,
            is_focused,
        }
    }

    /// How many of `full` rows or cards of `section` are drawn.
    ///
    /// While a section expands or collapses its cards are revealed in
    /// proportion to the ticks elapsed, reaching `full` only once the
    /// transition is over.
    fn revealed(&self, section: Section, full: usize) -> usize {
        let Some(transition) = self.layout_transition.filter(|t| t.section == section) else {
            return full;
        };
        let step = (transition.frames - transition.frames_left) as usize + 1;
        let steps = transition.frames as usize + 1;
        (full * step).div_ceil(steps).clamp(1, full)
    }

    /// Width of one card in terminal columns.
    ///
    /// Absolute item widths are scaled from layout points; items that fill
    /// their group take the group's fraction of the screen.
    fn card_width(layout: &SectionLayout, cols: usize) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let width = match (layout.item.width, layout.group.width) {
            (Dimension::Absolute(points), _) => (points / POINTS_PER_CELL).round() as usize,
            (_, Dimension::FractionalWidth(fraction)) => (cols as f32 * fraction).floor() as usize,
            _ => cols,
        };

        let column_limit = cols / layout.grouping.columns();
        width.min(column_limit.saturating_sub(1)).max(8)
    }

    fn compute_card(&self, section: Section, index: usize, item: &Item, section_focused: bool) -> CardView {
        let is_focused = section_focused && index == self.focus.index;
        let id = item.id();
        let (is_inserted, is_moved) = self.synchronizer.transition().map_or((false, false), |transition| {
            (
                transition.diff.is_inserted(section, &id),
                transition.diff.is_moved(section, &id),
            )
        });

        match item {
            Item::Time(bucket) => CardView {
                title: bucket.label.clone(),
                author: String::new(),
                genre: String::new(),
                cover: CoverView::None,
                is_focused,
                is_saved: false,
                is_inserted,
                is_moved,
            },
            Item::Book(book) => CardView {
                title: book.title.clone(),
                author: book.author_line().to_string(),
                genre: book.genre_line().to_string(),
                cover: self.cover_view(&book.key),
                is_focused,
                is_saved: self.is_saved(&book.key),
                is_inserted,
                is_moved,
            },
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let saved = self.saved_keys.len();
        HeaderInfo {
            title: format!(" Shelfview ({saved} saved) "),
        }
    }

    /// Key hints for the current mode.
    ///
    /// The top-books section has no header, so its toggle label is shown
    /// here while it has the focus.
    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match self.input_mode {
            InputMode::Search => "ESC: cancel  Enter: search  Type to search titles and authors".to_string(),
            InputMode::Normal => {
                let section = self.focus.section;
                let toggle = if section.is_toggleable() {
                    format!("m: {}  ", self.layout_state.label(section))
                } else {
                    String::new()
                };
                format!(
                    "h/j/k/l: move  Enter: open  {toggle}s: add to list  /: search  r: refresh  q: quit"
                )
            }
        };
        FooterInfo { keybindings }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        (self.input_mode == InputMode::Search).then(|| SearchBarInfo {
            query: self.search_query.clone(),
        })
    }

    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        match self.input_mode {
            InputMode::Normal => total_rows.saturating_sub(CHROME_ROWS),
            InputMode::Search => total_rows.saturating_sub(CHROME_ROWS + SEARCH_BAR_ROWS),
        }
    }
}

impl AppState {
    /// Computes the view model of a view opened above the home screen.
    #[must_use]
    pub fn compute_route_viewmodel(&self, route: &Route, rows: usize) -> RouteViewModel {
        let visible_rows = rows.saturating_sub(CHROME_ROWS).max(1);

        let (body, keybindings) = match route {
            Route::BookDetail(book) => {
                let is_saved = self.is_saved(&book.key);
                let hint = if is_saved {
                    "s: remove from list  Esc: back"
                } else {
                    "s: add to list  Esc: back"
                };
                let detail = DetailView {
                    title: book.title.clone(),
                    author: book.author_line().to_string(),
                    genre: book.genre_line().to_string(),
                    key: book.key.clone(),
                    cover: self.cover_view(&book.key),
                    is_saved,
                };
                (RouteBody::Detail(detail), hint)
            }
            Route::TimeFiltered {
                bucket,
                records,
                selected,
                error,
            } => {
                let list = match records {
                    _ if error.is_some() => ListView {
                        rows: vec![],
                        empty_message: Some(LOAD_FAILED_LABEL.to_string()),
                    },
                    None => ListView {
                        rows: vec![],
                        empty_message: Some(WAIT_LABEL.to_string()),
                    },
                    Some(records) if records.is_empty() => ListView {
                        rows: vec![],
                        empty_message: Some(format!(
                            "Nothing saved {}",
                            bucket.label.to_lowercase()
                        )),
                    },
                    Some(records) => {
                        let start = window_start(*selected, visible_rows, records.len());
                        let end = (start + visible_rows).min(records.len());
                        ListView {
                            rows: (start..end)
                                .map(|index| {
                                    let record = &records[index];
                                    ListRow {
                                        title: record.book.title.clone(),
                                        detail: saved_on(record.book.author_line(), record.saved_at),
                                        title_ranges: vec![],
                                        is_selected: index == *selected,
                                        is_saved: true,
                                    }
                                })
                                .collect(),
                            empty_message: None,
                        }
                    }
                };
                (RouteBody::List(list), "j/k: move  Enter: open  Esc: back")
            }
            Route::Search {
                query,
                hits,
                selected,
            } => {
                let list = if hits.is_empty() {
                    ListView {
                        rows: vec![],
                        empty_message: Some(format!("No books match \"{query}\"")),
                    }
                } else {
                    let start = window_start(*selected, visible_rows, hits.len());
                    let end = (start + visible_rows).min(hits.len());
                    ListView {
                        rows: (start..end)
                            .map(|index| {
                                let hit = &hits[index];
                                ListRow {
                                    title: hit.book.title.clone(),
                                    detail: hit.book.author_line().to_string(),
                                    title_ranges: hit.title_ranges.clone(),
                                    is_selected: index == *selected,
                                    is_saved: self.is_saved(&hit.book.key),
                                }
                            })
                            .collect(),
                        empty_message: None,
                    }
                };
                (RouteBody::List(list), "j/k: move  Enter: open  Esc: back")
            }
            Route::Home => (
                RouteBody::List(ListView {
                    rows: vec![],
                    empty_message: None,
                }),
                "",
            ),
        };

        RouteViewModel {
            header: HeaderInfo {
                title: format!(" {} ", route.title()),
            },
            body,
            footer: FooterInfo {
                keybindings: keybindings.to_string(),
            },
        }
    }

    fn cover_view(&self, key: &str) -> CoverView {
        match self.covers.get(key) {
            Some(CoverArt::Lines(lines)) => CoverView::Art(lines.clone()),
            Some(CoverArt::Unavailable) | None => CoverView::Placeholder,
        }
    }
}

/// Author followed by the day a book was saved.
fn saved_on(author: &str, saved_at: i64) -> String {
    let day = chrono::DateTime::from_timestamp(saved_at, 0)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    if author.is_empty() {
        format!("saved {day}")
    } else {
        format!("{author}  saved {day}")
    }
}

/// First index of a window of `size` over `total` entries that keeps `focus`
/// inside, centered where possible.
fn window_start(focus: usize, size: usize, total: usize) -> usize {
    if total <= size {
        return 0;
    }
    focus.saturating_sub(size / 2).min(total - size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ToggleLabel;

    fn config(frames: u32) -> Config {
        Config {
            transition_frames: frames,
            ..Config::default()
        }
    }

    fn books(keys: &[&str]) -> Vec<BookSummary> {
        keys.iter()
            .map(|key| BookSummary::new(*key, key.to_uppercase()))
            .collect()
    }

    fn loaded_state(top: &[&str], recent: &[&str]) -> AppState {
        let mut state = AppState::new(&config(0), Theme::default());
        state.top_books = Some(books(top));
        state.set_recent_books(books(recent));
        state.refresh();
        state
    }

    #[test]
    fn selecting_index_one_of_recent_books_opens_the_second_book() {
        let state = loaded_state(&[], &["a", "b", "c"]);
        assert_eq!(
            state.select_at(Section::RecentBooks, 1),
            Some(NavigationRequest::BookDetail(BookSummary::new("b", "B")))
        );
    }

    #[test]
    fn selecting_a_time_tile_opens_the_filtered_list() {
        let state = loaded_state(&[], &[]);
        assert_eq!(
            state.select_at(Section::Time, 2),
            Some(NavigationRequest::TimeFiltered(TimeBucket::new(2, "This Year")))
        );
    }

    #[test]
    fn stale_selection_is_a_no_op() {
        let mut state = loaded_state(&["a", "b"], &[]);
        // The source list changes without a refresh.
        state.top_books = Some(books(&["a"]));

        assert_eq!(state.select_at(Section::TopBooks, 1), None);
        assert_eq!(state.select_at(Section::TopBooks, 9), None);
    }

    #[test]
    fn selection_resolves_by_identity_not_position() {
        let mut state = loaded_state(&["a", "b"], &[]);
        state.top_books = Some(books(&["b", "a"]));

        assert_eq!(
            state.select_at(Section::TopBooks, 1),
            Some(NavigationRequest::BookDetail(BookSummary::new("b", "B")))
        );
    }

    #[test]
    fn toggle_updates_label_and_layout_together() {
        let mut state = loaded_state(&[], &[]);
        let (outcome, _) = state.toggle_section(Section::RecentBooks).unwrap();

        assert_eq!(outcome.label, ToggleLabel::Hide);
        assert_eq!(state.layout(), &outcome.layout);
        assert_eq!(state.layout_state().label(Section::RecentBooks), ToggleLabel::Hide);
        assert!(state.toggle_section(Section::Time).is_none());
    }

    #[test]
    fn missing_catalog_keeps_loading_and_requests_it_once() {
        let mut state = AppState::new(&config(0), Theme::default());
        state.set_recent_books(vec![]);

        let (render, actions) = state.refresh();
        assert!(!render);
        assert_eq!(actions.len(), 1);
        assert!(matches!(
            actions[0],
            Action::PostToWorker(WorkerMessage::LoadCatalog { .. })
        ));
        assert!(state.is_loading());
        assert!(state.refresh().1.is_empty());
    }

    #[test]
    fn focus_follows_item_across_refresh() {
        let mut state = loaded_state(&["a", "b", "c"], &[]);
        state.focus = Focus {
            section: Section::TopBooks,
            index: 2,
        };
        state.top_books = Some(books(&["c", "a", "b"]));
        state.refresh();
        assert_eq!(state.focus.index, 0);
    }

    #[test]
    fn grid_moves_by_whole_rows() {
        let mut state = loaded_state(&["a", "b", "c", "d"], &[]);
        state.toggle_section(Section::TopBooks);
        state.focus = Focus {
            section: Section::TopBooks,
            index: 1,
        };

        assert!(state.move_focus_down());
        assert_eq!(state.focus, Focus { section: Section::TopBooks, index: 3 });
        assert!(state.move_focus_up());
        assert_eq!(state.focus.index, 1);
    }

    #[test]
    fn vertical_moves_skip_empty_sections() {
        let mut state = loaded_state(&[], &["a"]);
        assert!(state.move_focus_down());
        assert_eq!(state.focus.section, Section::RecentBooks);
        assert!(!state.move_focus_down());
    }

    #[test]
    fn layout_ticks_from_an_older_toggle_are_ignored() {
        let mut state = AppState::new(&config(2), Theme::default());
        let (_, first) = state.toggle_section(Section::TopBooks).unwrap();
        let (_, second) = state.toggle_section(Section::TopBooks).unwrap();

        let Action::ScheduleTimer(old_tag) = first[0].clone() else {
            panic!("expected a timer");
        };
        let Action::ScheduleTimer(new_tag) = second[0].clone() else {
            panic!("expected a timer");
        };

        assert_eq!(state.tick(old_tag), (false, vec![]));
        assert_eq!(state.tick(new_tag), (true, vec![Action::ScheduleTimer(new_tag)]));
        assert_eq!(state.tick(new_tag), (true, vec![]));
        assert_eq!(state.animating_section(), None);
    }

    #[test]
    fn loading_view_bounces_the_wait_label() {
        let mut state = AppState::new(&config(0), Theme::default());
        let offsets: Vec<usize> = (0..4)
            .map(|_| {
                let HomeBody::Loading(view) = state.compute_viewmodel(24, 80).body else {
                    panic!("expected loading view");
                };
                state.tick(TimerTag::Loading);
                view.label_offset
            })
            .collect();
        assert_eq!(offsets, vec![0, 1, 2, 1]);
    }

    #[test]
    fn inserted_cards_are_marked_during_transition() {
        let mut state = AppState::new(&config(2), Theme::default());
        state.top_books = Some(books(&["a"]));
        state.set_recent_books(vec![]);
        state.refresh();

        let HomeBody::Sections(sections) = state.compute_viewmodel(40, 120).body else {
            panic!("expected sections");
        };
        let Presentation::Rail { cards, .. } = &sections[1].presentation else {
            panic!("expected rail");
        };
        assert!(cards[0].is_inserted);
    }

    /// Runs every timer scheduled by `actions` until none is left.
    fn run_timers(state: &mut AppState, mut actions: Vec<Action>) {
        while let Some(action) = actions.pop() {
            if let Action::ScheduleTimer(tag) = action {
                actions.extend(state.tick(tag).1);
            }
        }
    }

    fn grid_row_count(state: &AppState) -> usize {
        let HomeBody::Sections(sections) = state.compute_viewmodel(38, 120).body else {
            panic!("expected sections");
        };
        let Presentation::Grid { rows, .. } = &sections[1].presentation else {
            panic!("expected grid");
        };
        rows.len()
    }

    #[test]
    fn expanding_reveals_grid_rows_tick_by_tick() {
        let mut state = loaded_state(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"], &[]);
        state.transition_frames = 3;

        let (_, actions) = state.toggle_section(Section::TopBooks).unwrap();
        let Action::ScheduleTimer(tag) = actions[0].clone() else {
            panic!("expected a timer");
        };

        let mut counts = vec![grid_row_count(&state)];
        while state.animating_section().is_some() {
            state.tick(tag);
            counts.push(grid_row_count(&state));
        }

        assert_eq!(counts, vec![1, 2, 3, 4]);
    }

    #[test]
    fn moved_cards_are_marked_during_transition() {
        let mut state = AppState::new(&config(2), Theme::default());
        state.top_books = Some(books(&["a", "b", "c"]));
        state.set_recent_books(vec![]);
        let (_, actions) = state.refresh();
        run_timers(&mut state, actions);
        assert!(state.synchronizer().transition().is_none());

        state.top_books = Some(books(&["c", "a", "b"]));
        state.refresh();

        let HomeBody::Sections(sections) = state.compute_viewmodel(40, 120).body else {
            panic!("expected sections");
        };
        let Presentation::Rail { cards, .. } = &sections[1].presentation else {
            panic!("expected rail");
        };
        let moved: Vec<&str> = cards
            .iter()
            .filter(|card| card.is_moved)
            .map(|card| card.title.as_str())
            .collect();
        assert_eq!(moved, vec!["C"]);
        assert!(cards.iter().all(|card| !card.is_inserted));
    }

    #[test]
    fn time_filtered_view_waits_for_records() {
        let state = loaded_state(&[], &[]);
        let route = Route::TimeFiltered {
            bucket: TimeBucket::new(0, "This Week"),
            records: None,
            selected: 0,
            error: None,
        };
        let RouteBody::List(list) = state.compute_route_viewmodel(&route, 24).body else {
            panic!("expected list");
        };
        assert_eq!(list.empty_message.as_deref(), Some("Please wait"));
    }

    #[test]
    fn time_filtered_view_reports_a_failed_load() {
        let state = loaded_state(&[], &[]);
        let route = Route::TimeFiltered {
            bucket: TimeBucket::new(0, "This Week"),
            records: Some(vec![]),
            selected: 0,
            error: Some("load saved in window: library unreadable".into()),
        };
        let RouteBody::List(list) = state.compute_route_viewmodel(&route, 24).body else {
            panic!("expected list");
        };
        assert!(list.rows.is_empty());
        assert_eq!(list.empty_message.as_deref(), Some(LOAD_FAILED_LABEL));
    }

    #[test]
    fn detail_view_reflects_saved_state() {
        let state = loaded_state(&[], &["a"]);
        let route = Route::BookDetail(BookSummary::new("a", "A"));
        let vm = state.compute_route_viewmodel(&route, 24);

        let RouteBody::Detail(detail) = vm.body else {
            panic!("expected detail");
        };
        assert!(detail.is_saved);
        assert_eq!(detail.cover, CoverView::Placeholder);
        assert!(vm.footer.keybindings.contains("remove from list"));
    }

    #[test]
    fn footer_shows_top_books_toggle_label() {
        let mut state = loaded_state(&["a"], &[]);
        state.focus = Focus {
            section: Section::TopBooks,
            index: 0,
        };
        assert!(state.compute_viewmodel(24, 80).footer.keybindings.contains("m: See More"));
    }
}
