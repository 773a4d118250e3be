use super::category::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    CategoryDetail,
}

/// Which level of the distribution is on screen.
///
/// `selected()` is `Some` exactly when the view is `CategoryDetail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    view: View,
    selected: Option<Category>,
}

impl ViewState {
    pub fn overview() -> Self {
        Self {
            view: View::Overview,
            selected: None,
        }
    }

    pub fn detail(category: Category) -> Self {
        Self {
            view: View::CategoryDetail,
            selected: Some(category),
        }
    }

    fn from_selection(selection: Option<Category>) -> Self {
        selection.map_or_else(Self::overview, Self::detail)
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected(&self) -> Option<Category> {
        self.selected
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::overview()
    }
}

/// Drill-down navigation that an outside controller can take over.
///
/// Internal `drill_down`/`drill_up` calls move freely until
/// [`sync_external`](Navigator::sync_external) is handed a selection that
/// differs from the last one it saw; that selection then replaces whatever
/// state navigation had reached.
#[derive(Debug, Default)]
pub struct Navigator {
    state: ViewState,
    last_external: Option<Option<Category>>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn drill_down(&mut self, category: Category) {
        self.state = ViewState::detail(category);
    }

    pub fn drill_up(&mut self) {
        self.state = ViewState::overview();
    }

    /// Apply the externally controlled selection. Returns whether the state
    /// was forced.
    pub fn sync_external(&mut self, selection: Option<Category>) -> bool {
        if self.last_external == Some(selection) {
            return false;
        }
        self.last_external = Some(selection);
        self.state = ViewState::from_selection(selection);
        true
    }
}
