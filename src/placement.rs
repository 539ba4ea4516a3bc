use crate::models::{Anchor, CustomPosition, PlacementState, Rect};

/// Compute the window's top-left corner from the placement state, the
/// window's own size and the live screen list. Never fails: an out-of-range
/// screen index or an empty screen list degrades to a zero rect.
pub fn place(state: &PlacementState, width: i32, height: i32, screens: &[Rect]) -> (i32, i32) {
    let screen = screens
        .get(state.screen)
        .or_else(|| screens.first())
        .copied()
        .unwrap_or_default();

    match state.anchor {
        // Stored position verbatim, screen bounds are not consulted.
        Anchor::Custom(p) => (p.x as i32, p.y as i32),
        Anchor::TopLeft => (screen.left, screen.top),
        Anchor::TopRight => (screen.right - width, screen.top),
        Anchor::BottomLeft => (screen.left, screen.bottom - height),
        Anchor::BottomRight => (screen.right - width, screen.bottom - height),
        Anchor::Centered => (
            screen.left + (screen.width() - width) / 2,
            screen.top + (screen.height() - height) / 2,
        ),
    }
}

/// Index of the screen sharing the largest area with `bounds`; 0 when
/// nothing overlaps.
pub fn screen_for_bounds(bounds: Rect, screens: &[Rect]) -> usize {
    let mut best = 0;
    let mut best_area = 0i64;
    for (i, screen) in screens.iter().enumerate() {
        let area = screen.overlap_area(&bounds);
        if area > best_area {
            best_area = area;
            best = i;
        }
    }
    best
}

impl PlacementState {
    /// A custom position is tied to the screen it was captured on, so a
    /// screen change while Custom is active downgrades to Centered.
    pub fn select_screen(&mut self, index: usize) {
        if matches!(self.anchor, Anchor::Custom(_)) {
            self.anchor = Anchor::Centered;
        }
        self.screen = index;
    }

    pub fn select_anchor(&mut self, anchor: Anchor) {
        self.anchor = anchor;
    }

    /// Capture a position into the save slot. The active anchor is
    /// unchanged until `load_custom` is called.
    pub fn save_custom(&mut self, x: f64, y: f64, screen: usize) {
        self.saved = CustomPosition { x, y, screen };
    }

    pub fn load_custom(&mut self) {
        self.screen = self.saved.screen;
        self.anchor = Anchor::Custom(self.saved);
    }

    /// A completed drag pins the window where it was dropped and re-derives
    /// the active screen from the new bounds.
    pub fn drag_finished(&mut self, bounds: Rect, screens: &[Rect]) {
        let screen = screen_for_bounds(bounds, screens);
        self.screen = screen;
        self.anchor = Anchor::Custom(CustomPosition {
            x: bounds.left as f64,
            y: bounds.top as f64,
            screen,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: i32 = 280;
    const H: i32 = 96;

    fn screens() -> Vec<Rect> {
        vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, -200, 3840, 880),
        ]
    }

    fn state(anchor: Anchor) -> PlacementState {
        PlacementState { screen: 0, anchor, ..PlacementState::default() }
    }

    #[test]
    fn corner_anchors_stay_within_screen_bounds() {
        let screens = screens();
        for screen_index in 0..screens.len() {
            let bounds = screens[screen_index];
            for anchor in [
                Anchor::TopLeft,
                Anchor::TopRight,
                Anchor::BottomLeft,
                Anchor::BottomRight,
                Anchor::Centered,
            ] {
                let mut st = state(anchor);
                st.screen = screen_index;
                let (left, top) = place(&st, W, H, &screens);
                assert!(left >= bounds.left, "{anchor:?} left on screen {screen_index}");
                assert!(top >= bounds.top, "{anchor:?} top on screen {screen_index}");
                assert!(left + W <= bounds.right, "{anchor:?} right on screen {screen_index}");
                assert!(top + H <= bounds.bottom, "{anchor:?} bottom on screen {screen_index}");
            }
        }
    }

    #[test]
    fn centered_is_screen_center() {
        let (left, top) = place(&state(Anchor::Centered), W, H, &screens());
        assert_eq!(left, (1920 - W) / 2);
        assert_eq!(top, (1080 - H) / 2);
    }

    #[test]
    fn custom_returns_stored_position_verbatim() {
        let custom = CustomPosition { x: -500.0, y: 9999.0, screen: 1 };
        let st = state(Anchor::Custom(custom));
        assert_eq!(place(&st, W, H, &screens()), (-500, 9999));
    }

    #[test]
    fn empty_screen_list_does_not_panic() {
        let (left, top) = place(&state(Anchor::Centered), W, H, &[]);
        assert_eq!((left, top), (-W / 2, -H / 2));
    }

    #[test]
    fn out_of_range_screen_falls_back_to_first() {
        let mut st = state(Anchor::TopLeft);
        st.screen = 7;
        assert_eq!(place(&st, W, H, &screens()), (0, 0));
    }

    #[test]
    fn screen_change_downgrades_custom_to_centered() {
        let mut st = state(Anchor::Custom(CustomPosition::default()));
        st.select_screen(1);
        assert_eq!(st.anchor, Anchor::Centered);
        assert_eq!(st.screen, 1);
    }

    #[test]
    fn screen_change_keeps_corner_anchor() {
        let mut st = state(Anchor::BottomRight);
        st.select_screen(1);
        assert_eq!(st.anchor, Anchor::BottomRight);
        assert_eq!(st.screen, 1);
    }

    #[test]
    fn save_custom_does_not_change_anchor() {
        let mut st = state(Anchor::TopRight);
        st.save_custom(12.0, 34.0, 1);
        assert_eq!(st.anchor, Anchor::TopRight);
        assert_eq!(st.saved, CustomPosition { x: 12.0, y: 34.0, screen: 1 });
    }

    #[test]
    fn load_custom_activates_saved_slot() {
        let mut st = state(Anchor::Centered);
        st.save_custom(12.0, 34.0, 1);
        st.load_custom();
        assert_eq!(st.screen, 1);
        assert_eq!(st.anchor, Anchor::Custom(CustomPosition { x: 12.0, y: 34.0, screen: 1 }));
    }

    #[test]
    fn drag_pins_custom_on_overlapping_screen() {
        let screens = screens();
        let mut st = state(Anchor::Centered);
        // Mostly on the second screen.
        st.drag_finished(Rect::new(1900, 100, 1900 + W, 100 + H), &screens);
        assert_eq!(st.screen, 1);
        assert_eq!(
            st.anchor,
            Anchor::Custom(CustomPosition { x: 1900.0, y: 100.0, screen: 1 })
        );
    }

    #[test]
    fn largest_overlap_wins() {
        let screens = screens();
        assert_eq!(screen_for_bounds(Rect::new(1800, 100, 1800 + W, 100 + H), &screens), 0);
        assert_eq!(screen_for_bounds(Rect::new(1800, -150, 1800 + W, -150 + H), &screens), 1);
        // No overlap at all falls back to the first screen.
        assert_eq!(screen_for_bounds(Rect::new(-5000, -5000, -4000, -4000), &screens), 0);
    }
}
