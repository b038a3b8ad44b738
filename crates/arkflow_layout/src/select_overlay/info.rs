//! Selection overlay data: handles, menu and the callbacks the owner
//! installs to follow handle drags and menu clicks.

use arkflow_core::geometry::{Offset, Rect};
use smallvec::SmallVec;

/// One selection handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectHandleInfo {
    pub paint_rect: Rect,
    pub is_show: bool,
}

impl SelectHandleInfo {
    /// Visible handle painted at `rect`
    pub fn new(paint_rect: Rect) -> Self {
        Self {
            paint_rect,
            is_show: true,
        }
    }

    pub fn hidden(paint_rect: Rect) -> Self {
        Self {
            paint_rect,
            is_show: false,
        }
    }
}

impl Default for SelectHandleInfo {
    fn default() -> Self {
        Self::hidden(Rect::default())
    }
}

/// Entries of the selection menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuOption {
    Cut,
    Copy,
    Paste,
    SelectAll,
}

impl MenuOption {
    pub const ALL: [MenuOption; 4] = [
        MenuOption::Cut,
        MenuOption::Copy,
        MenuOption::Paste,
        MenuOption::SelectAll,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::Cut => "Cut",
            MenuOption::Copy => "Copy",
            MenuOption::Paste => "Paste",
            MenuOption::SelectAll => "Select all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectMenuInfo {
    pub menu_is_show: bool,
    pub menu_disable: bool,
    /// Explicit menu position; laid out next to the handles when `None`
    pub menu_offset: Option<Offset>,
    pub show_copy: bool,
    pub show_paste: bool,
    pub show_cut: bool,
    pub show_copy_all: bool,
}

impl Default for SelectMenuInfo {
    fn default() -> Self {
        Self {
            menu_is_show: false,
            menu_disable: false,
            menu_offset: None,
            show_copy: true,
            show_paste: true,
            show_cut: true,
            show_copy_all: true,
        }
    }
}

impl SelectMenuInfo {
    pub fn shown() -> Self {
        Self {
            menu_is_show: true,
            ..Default::default()
        }
    }

    pub fn is_option_shown(&self, option: MenuOption) -> bool {
        match option {
            MenuOption::Cut => self.show_cut,
            MenuOption::Copy => self.show_copy,
            MenuOption::Paste => self.show_paste,
            MenuOption::SelectAll => self.show_copy_all,
        }
    }

    /// Options to display, in order
    pub fn options(&self) -> SmallVec<[MenuOption; 4]> {
        MenuOption::ALL
            .into_iter()
            .filter(|option| self.is_option_shown(*option))
            .collect()
    }
}

/// `is_first` tells which handle the event is about
pub type HandleCallback = Box<dyn FnMut(bool) + Send>;
pub type HandleRectCallback = Box<dyn FnMut(Rect, bool) + Send>;
pub type HandleReverseCallback = Box<dyn FnMut(bool) + Send>;
pub type ClickCallback = Box<dyn FnMut(Offset) + Send>;
pub type MenuCallback = Box<dyn FnMut() + Send>;

#[derive(Default)]
pub struct SelectOverlayCallbacks {
    pub on_handle_move_start: Option<HandleCallback>,
    pub on_handle_move: Option<HandleRectCallback>,
    pub on_handle_move_done: Option<HandleRectCallback>,
    pub on_handle_reverse: Option<HandleReverseCallback>,
    pub on_click: Option<ClickCallback>,
    pub on_cut: Option<MenuCallback>,
    pub on_copy: Option<MenuCallback>,
    pub on_paste: Option<MenuCallback>,
    pub on_select_all: Option<MenuCallback>,
}

impl SelectOverlayCallbacks {
    pub(crate) fn menu_callback_mut(&mut self, option: MenuOption) -> Option<&mut MenuCallback> {
        match option {
            MenuOption::Cut => self.on_cut.as_mut(),
            MenuOption::Copy => self.on_copy.as_mut(),
            MenuOption::Paste => self.on_paste.as_mut(),
            MenuOption::SelectAll => self.on_select_all.as_mut(),
        }
    }
}

impl std::fmt::Debug for SelectOverlayCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectOverlayCallbacks")
            .field("on_handle_move_start", &self.on_handle_move_start.is_some())
            .field("on_handle_move", &self.on_handle_move.is_some())
            .field("on_handle_move_done", &self.on_handle_move_done.is_some())
            .field("on_handle_reverse", &self.on_handle_reverse.is_some())
            .field("on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

/// Everything a selection overlay is built from
///
/// ```rust
/// use arkflow_core::geometry::Rect;
/// use arkflow_layout::select_overlay::{SelectMenuInfo, SelectOverlayInfo};
///
/// let info = SelectOverlayInfo::new(
///     Rect::new(10.0, 20.0, 2.0, 18.0),
///     Rect::new(80.0, 20.0, 2.0, 18.0),
/// )
/// .with_menu(SelectMenuInfo::shown())
/// .on_copy(|| println!("copy"));
/// assert!(!info.is_single_handle);
/// ```
#[derive(Debug, Default)]
pub struct SelectOverlayInfo {
    pub first_handle: SelectHandleInfo,
    pub second_handle: SelectHandleInfo,
    pub is_single_handle: bool,
    /// A caret line is shown instead of a draggable handle
    pub is_handle_line_show: bool,
    pub handle_reverse: bool,
    pub menu_info: SelectMenuInfo,
    pub callbacks: SelectOverlayCallbacks,
}

impl SelectOverlayInfo {
    /// Range selection between two visible handles
    pub fn new(first: Rect, second: Rect) -> Self {
        Self {
            first_handle: SelectHandleInfo::new(first),
            second_handle: SelectHandleInfo::new(second),
            ..Default::default()
        }
    }

    /// Collapsed selection with one caret handle
    pub fn single_handle(handle: Rect) -> Self {
        Self {
            first_handle: SelectHandleInfo::new(handle),
            is_single_handle: true,
            ..Default::default()
        }
    }

    pub fn with_handle_line(mut self, show: bool) -> Self {
        self.is_handle_line_show = show;
        self
    }

    pub fn with_menu(mut self, menu: SelectMenuInfo) -> Self {
        self.menu_info = menu;
        self
    }

    pub fn on_handle_move_start<F: FnMut(bool) + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_handle_move_start = Some(Box::new(f));
        self
    }

    pub fn on_handle_move<F: FnMut(Rect, bool) + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_handle_move = Some(Box::new(f));
        self
    }

    pub fn on_handle_move_done<F: FnMut(Rect, bool) + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_handle_move_done = Some(Box::new(f));
        self
    }

    pub fn on_handle_reverse<F: FnMut(bool) + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_handle_reverse = Some(Box::new(f));
        self
    }

    pub fn on_click<F: FnMut(Offset) + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_click = Some(Box::new(f));
        self
    }

    pub fn on_cut<F: FnMut() + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_cut = Some(Box::new(f));
        self
    }

    pub fn on_copy<F: FnMut() + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_copy = Some(Box::new(f));
        self
    }

    pub fn on_paste<F: FnMut() + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_paste = Some(Box::new(f));
        self
    }

    pub fn on_select_all<F: FnMut() + Send + 'static>(mut self, f: F) -> Self {
        self.callbacks.on_select_all = Some(Box::new(f));
        self
    }
}
