/// One poll cycle's worth of display state. `Default` is the empty/hidden
/// snapshot shown while the player is unreachable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NowPlayingSnapshot {
    pub video_name: String,
    pub position_label: String,
    pub percent: f64,
    pub bar_visible: bool,
}

/// Screen or window bounds in virtual-desktop coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Area shared with another rect, zero when they don't intersect.
    pub fn overlap_area(&self, other: &Rect) -> i64 {
        let w = (self.right.min(other.right) - self.left.max(other.left)).max(0) as i64;
        let h = (self.bottom.min(other.bottom) - self.top.max(other.top)).max(0) as i64;
        w * h
    }
}

/// A user-chosen window position, tied to the screen it was captured on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CustomPosition {
    pub x: f64,
    pub y: f64,
    pub screen: usize,
}

/// Where the widget sits on the target screen. `Custom` carries its own
/// payload so placement can be matched exhaustively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    Centered,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Custom(CustomPosition),
}

impl Anchor {
    /// Integer form used by the settings store.
    pub fn as_index(&self) -> i32 {
        match self {
            Anchor::Centered => 0,
            Anchor::TopLeft => 1,
            Anchor::TopRight => 2,
            Anchor::BottomLeft => 3,
            Anchor::BottomRight => 4,
            Anchor::Custom(_) => 5,
        }
    }

    /// Inverse of `as_index`. Out-of-range values load as `Centered`;
    /// `Custom` re-attaches the saved position.
    pub fn from_index(index: i32, saved: CustomPosition) -> Anchor {
        match index {
            1 => Anchor::TopLeft,
            2 => Anchor::TopRight,
            3 => Anchor::BottomLeft,
            4 => Anchor::BottomRight,
            5 => Anchor::Custom(saved),
            _ => Anchor::Centered,
        }
    }
}

/// Full placement state: the active screen and anchor, plus the save/load
/// slot for a custom position.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementState {
    pub screen: usize,
    pub anchor: Anchor,
    pub saved: CustomPosition,
}

impl Default for PlacementState {
    fn default() -> Self {
        Self {
            screen: 0,
            anchor: Anchor::Centered,
            saved: CustomPosition::default(),
        }
    }
}
