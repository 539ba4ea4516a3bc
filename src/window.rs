#[cfg(windows)]
use std::sync::atomic::{AtomicBool, Ordering};
#[cfg(windows)]
use std::sync::{Arc, Mutex, MutexGuard};
#[cfg(windows)]
use std::time::{Duration, Instant};

#[cfg(windows)]
use windows::Win32::Foundation::*;
#[cfg(windows)]
use windows::Win32::Graphics::Gdi::*;
#[cfg(windows)]
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
#[cfg(windows)]
use windows::Win32::System::Threading::CreateMutexW;
#[cfg(windows)]
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
#[cfg(windows)]
use windows::Win32::UI::WindowsAndMessaging::*;
#[cfg(windows)]
use windows::core::PCWSTR;

#[cfg(windows)]
use crate::models::{Anchor, NowPlayingSnapshot, PlacementState, Rect};
#[cfg(windows)]
use crate::native_interop::{self, Color, WM_APP_SNAPSHOT, WM_APP_TRAY};
#[cfg(windows)]
use crate::placement;
#[cfg(windows)]
use crate::poller::{self, PollerConfig};
#[cfg(windows)]
use crate::settings::{self, RegistryStore, Settings};
#[cfg(windows)]
use crate::theme;

/// Wrapper to make HWND sendable across threads (safe for PostMessage usage)
#[cfg(windows)]
#[derive(Clone, Copy)]
struct SendHwnd(isize);

#[cfg(windows)]
unsafe impl Send for SendHwnd {}

#[cfg(windows)]
impl SendHwnd {
    fn from_hwnd(hwnd: HWND) -> Self {
        Self(hwnd.0 as isize)
    }
    fn to_hwnd(self) -> HWND {
        HWND(self.0 as *mut _)
    }
}

/// Shared application state
#[cfg(windows)]
struct AppState {
    hwnd: SendHwnd,
    is_dark: bool,

    screens: Vec<Rect>,
    placement: PlacementState,
    always_on_top: bool,

    snapshot: NowPlayingSnapshot,
    clock_text: String,

    drag_origin: Option<(i32, i32)>,
    stop: Arc<AtomicBool>,
}

#[cfg(windows)]
static STATE: Mutex<Option<AppState>> = Mutex::new(None);

/// Lock STATE safely, recovering from poisoned mutex
#[cfg(windows)]
fn lock_state() -> MutexGuard<'static, Option<AppState>> {
    STATE.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(windows)]
const POLL_INTERVAL: Duration = Duration::from_millis(1000);

const WIDGET_W: i32 = 280;
const WIDGET_H: i32 = 96;
const PAD: i32 = 12;
const CLOCK_TOP: i32 = 8;
const CLOCK_H: i32 = 32;
const NAME_TOP: i32 = 44;
const NAME_H: i32 = 16;
const LABEL_TOP: i32 = 62;
const LABEL_H: i32 = 14;
const BAR_TOP: i32 = 82;
const BAR_H: i32 = 6;
const BAR_RADIUS: i32 = 3;

// Menu item IDs
const IDM_EXIT: u16 = 1;
const IDM_ALWAYS_ON_TOP: u16 = 2;
const IDM_SAVE_CUSTOM: u16 = 3;
const IDM_LOAD_CUSTOM: u16 = 4;
const IDM_SCREEN_BASE: u16 = 100;
const IDM_ANCHOR_BASE: u16 = 200;

const ANCHOR_MENU: &[(i32, &str)] = &[
    (0, "Centered"),
    (1, "Top Left"),
    (2, "Top Right"),
    (3, "Bottom Left"),
    (4, "Bottom Right"),
];

#[cfg(windows)]
pub fn run() {
    // Single-instance guard: silently exit if another instance is running
    let mutex_name = native_interop::wide_str("Global\\IllyaOverlay");
    let _mutex = unsafe {
        let handle = CreateMutexW(None, false, PCWSTR::from_raw(mutex_name.as_ptr()));
        match handle {
            Ok(h) => {
                if GetLastError() == ERROR_ALREADY_EXISTS {
                    return;
                }
                h
            }
            Err(_) => return,
        }
    };

    let class_name = native_interop::wide_str("IllyaOverlay");

    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);

        let hinstance = GetModuleHandleW(PCWSTR::null()).unwrap();

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: HINSTANCE(hinstance.0),
            hCursor: LoadCursorW(HINSTANCE::default(), IDC_ARROW).unwrap_or_default(),
            hbrBackground: HBRUSH(std::ptr::null_mut()),
            lpszClassName: PCWSTR::from_raw(class_name.as_ptr()),
            ..Default::default()
        };

        RegisterClassExW(&wc);

        let title = native_interop::wide_str("Illya");
        let hwnd = CreateWindowExW(
            WS_EX_TOOLWINDOW | WS_EX_LAYERED | WS_EX_NOACTIVATE,
            PCWSTR::from_raw(class_name.as_ptr()),
            PCWSTR::from_raw(title.as_ptr()),
            WS_POPUP,
            0,
            0,
            WIDGET_W,
            WIDGET_H,
            HWND::default(),
            HMENU::default(),
            hinstance,
            None,
        )
        .unwrap();

        let screens = native_interop::list_screens();
        let loaded = settings::load(&RegistryStore::open(), screens.len());
        let stop = Arc::new(AtomicBool::new(false));

        {
            let mut state = lock_state();
            *state = Some(AppState {
                hwnd: SendHwnd::from_hwnd(hwnd),
                is_dark: theme::is_dark_mode(),
                screens,
                placement: loaded.placement,
                always_on_top: loaded.always_on_top,
                snapshot: NowPlayingSnapshot::default(),
                clock_text: native_interop::local_time_label(),
                drag_origin: None,
                stop: stop.clone(),
            });
        }

        let _ = SetLayeredWindowAttributes(hwnd, COLORREF(0), 240, LWA_ALPHA);
        if loaded.always_on_top {
            native_interop::set_always_on_top(hwnd, true);
        }

        apply_placement();
        let _ = ShowWindow(hwnd, SW_SHOWNOACTIVATE);

        native_interop::add_tray_icon(hwnd, "Illya", WM_APP_TRAY);

        let send_hwnd = SendHwnd::from_hwnd(hwnd);
        std::thread::spawn(move || {
            poll_loop(send_hwnd, stop);
        });

        // Message loop
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, HWND::default(), 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Detached polling loop: one fetch per second, self-correcting for
/// processing time, cooperatively stopped via the shared flag. Each tick
/// publishes one whole snapshot plus a fresh clock label, then nudges the
/// UI thread with a single message.
#[cfg(windows)]
fn poll_loop(send_hwnd: SendHwnd, stop: Arc<AtomicBool>) {
    let config = PollerConfig::default();
    let agent = poller::build_agent(&config);

    while !stop.load(Ordering::Relaxed) {
        let started = Instant::now();

        let snapshot = poller::tick(&agent, &config);
        let clock = native_interop::local_time_label();

        {
            let mut state = lock_state();
            if let Some(s) = state.as_mut() {
                s.snapshot = snapshot;
                s.clock_text = clock;
            }
        }

        unsafe {
            let _ = PostMessageW(send_hwnd.to_hwnd(), WM_APP_SNAPSHOT, WPARAM(0), LPARAM(0));
        }

        if let Some(rest) = POLL_INTERVAL.checked_sub(started.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

/// Recompute the window position from the placement state and move it.
#[cfg(windows)]
fn apply_placement() {
    let (hwnd, x, y) = {
        let state = lock_state();
        let s = match state.as_ref() {
            Some(s) => s,
            None => return,
        };
        let (x, y) = placement::place(&s.placement, WIDGET_W, WIDGET_H, &s.screens);
        (s.hwnd.to_hwnd(), x, y)
    };
    native_interop::move_window(hwnd, x, y, WIDGET_W, WIDGET_H);
}

#[cfg(windows)]
fn check_theme_change() {
    let new_dark = theme::is_dark_mode();
    let mut state = lock_state();
    if let Some(s) = state.as_mut() {
        s.is_dark = new_dark;
    }
}

/// Persist placement and the always-on-top flag. A failed save must never
/// block shutdown, so the error is swallowed here.
#[cfg(windows)]
fn save_settings() {
    let settings = {
        let state = lock_state();
        match state.as_ref() {
            Some(s) => Settings {
                placement: s.placement.clone(),
                always_on_top: s.always_on_top,
            },
            None => return,
        }
    };
    let _ = settings::save(&mut RegistryStore::open(), &settings);
}

#[cfg(windows)]
fn on_drag_started(hwnd: HWND) {
    let origin = native_interop::get_window_rect_safe(hwnd).map(|r| (r.left, r.top));
    let mut state = lock_state();
    if let Some(s) = state.as_mut() {
        s.drag_origin = origin;
    }
}

#[cfg(windows)]
fn on_drag_finished(hwnd: HWND) {
    let bounds = match native_interop::get_window_rect_safe(hwnd) {
        Some(r) => r,
        None => return,
    };
    let mut state = lock_state();
    if let Some(s) = state.as_mut() {
        if drag_moved(s.drag_origin.take(), (bounds.left, bounds.top)) {
            s.placement.drag_finished(bounds, &s.screens);
        }
    }
}

/// A drag only counts as movement when an origin was captured and the
/// window landed somewhere else. An unmatched exit-sizemove must not pin
/// the anchor.
fn drag_moved(origin: Option<(i32, i32)>, landed: (i32, i32)) -> bool {
    match origin {
        Some(o) => o != landed,
        None => false,
    }
}

/// Command-id range and checked id for a radio submenu; `None` when the
/// selection is outside the submenu (an active custom position shows no
/// check).
fn radio_selection(base: u16, count: usize, selected: usize) -> Option<(u32, u32, u32)> {
    if count == 0 || selected >= count {
        return None;
    }
    Some((
        base as u32,
        base as u32 + count as u32 - 1,
        base as u32 + selected as u32,
    ))
}

/// Main window procedure
#[cfg(windows)]
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_PAINT => {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);
            paint(hdc, hwnd);
            let _ = EndPaint(hwnd, &ps);
            LRESULT(0)
        }
        WM_ERASEBKGND => LRESULT(1),
        WM_NCHITTEST => {
            // The whole client area drags the window
            let hit = DefWindowProcW(hwnd, msg, wparam, lparam);
            if hit.0 == HTCLIENT as isize {
                LRESULT(HTCAPTION as isize)
            } else {
                hit
            }
        }
        WM_ENTERSIZEMOVE => {
            on_drag_started(hwnd);
            LRESULT(0)
        }
        WM_EXITSIZEMOVE => {
            on_drag_finished(hwnd);
            LRESULT(0)
        }
        WM_DISPLAYCHANGE => {
            {
                let screens = native_interop::list_screens();
                let mut state = lock_state();
                if let Some(s) = state.as_mut() {
                    if s.placement.screen >= screens.len() {
                        s.placement.screen = 0;
                    }
                    s.screens = screens;
                }
            }
            apply_placement();
            LRESULT(0)
        }
        WM_APP_SNAPSHOT => {
            check_theme_change();
            let _ = InvalidateRect(hwnd, None, false);
            LRESULT(0)
        }
        WM_APP_TRAY => {
            let event = lparam.0 as u32;
            if event == WM_RBUTTONUP || event == WM_CONTEXTMENU {
                show_context_menu(hwnd);
            }
            LRESULT(0)
        }
        WM_NCRBUTTONUP | WM_RBUTTONUP => {
            show_context_menu(hwnd);
            LRESULT(0)
        }
        WM_COMMAND => {
            on_menu_command(hwnd, wparam.0 as u16);
            LRESULT(0)
        }
        WM_DESTROY => {
            {
                let state = lock_state();
                if let Some(s) = state.as_ref() {
                    s.stop.store(true, Ordering::Relaxed);
                }
            }
            save_settings();
            native_interop::remove_tray_icon(hwnd);
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

#[cfg(windows)]
fn on_menu_command(hwnd: HWND, id: u16) {
    match id {
        IDM_EXIT => unsafe {
            let _ = DestroyWindow(hwnd);
        },
        IDM_ALWAYS_ON_TOP => {
            let on_top = {
                let mut state = lock_state();
                match state.as_mut() {
                    Some(s) => {
                        s.always_on_top = !s.always_on_top;
                        s.always_on_top
                    }
                    None => return,
                }
            };
            native_interop::set_always_on_top(hwnd, on_top);
        }
        IDM_SAVE_CUSTOM => {
            let bounds = match native_interop::get_window_rect_safe(hwnd) {
                Some(r) => r,
                None => return,
            };
            let mut state = lock_state();
            if let Some(s) = state.as_mut() {
                let screen = placement::screen_for_bounds(bounds, &s.screens);
                s.placement.save_custom(bounds.left as f64, bounds.top as f64, screen);
            }
        }
        IDM_LOAD_CUSTOM => {
            {
                let mut state = lock_state();
                if let Some(s) = state.as_mut() {
                    s.placement.load_custom();
                }
            }
            apply_placement();
        }
        id if id >= IDM_ANCHOR_BASE && (id - IDM_ANCHOR_BASE) < ANCHOR_MENU.len() as u16 => {
            {
                let index = (id - IDM_ANCHOR_BASE) as i32;
                let mut state = lock_state();
                if let Some(s) = state.as_mut() {
                    let anchor = Anchor::from_index(index, s.placement.saved);
                    s.placement.select_anchor(anchor);
                }
            }
            apply_placement();
        }
        id if id >= IDM_SCREEN_BASE && id < IDM_ANCHOR_BASE => {
            {
                let index = (id - IDM_SCREEN_BASE) as usize;
                let mut state = lock_state();
                if let Some(s) = state.as_mut() {
                    if index < s.screens.len() {
                        s.placement.select_screen(index);
                    }
                }
            }
            apply_placement();
        }
        _ => {}
    }
}

#[cfg(windows)]
fn show_context_menu(hwnd: HWND) {
    let (screen_count, current_screen, anchor_index, always_on_top) = {
        let state = lock_state();
        match state.as_ref() {
            Some(s) => (
                s.screens.len(),
                s.placement.screen,
                s.placement.anchor.as_index(),
                s.always_on_top,
            ),
            None => return,
        }
    };

    unsafe {
        let menu = match CreatePopupMenu() {
            Ok(m) => m,
            Err(_) => return,
        };

        // Screen submenu
        let screen_menu = CreatePopupMenu().unwrap_or_default();
        for i in 0..screen_count {
            let label = native_interop::wide_str(&format!("Screen {}", i + 1));
            let _ = AppendMenuW(
                screen_menu,
                MENU_ITEM_FLAGS(0),
                (IDM_SCREEN_BASE as usize) + i,
                PCWSTR::from_raw(label.as_ptr()),
            );
        }
        if let Some((first, last, check)) =
            radio_selection(IDM_SCREEN_BASE, screen_count, current_screen)
        {
            let _ = CheckMenuRadioItem(screen_menu, first, last, check, MF_BYCOMMAND.0);
        }
        let screen_label = native_interop::wide_str("Screen");
        let _ = AppendMenuW(
            menu,
            MF_POPUP,
            screen_menu.0 as usize,
            PCWSTR::from_raw(screen_label.as_ptr()),
        );

        // Position submenu: Centered plus the four corners
        let anchor_menu = CreatePopupMenu().unwrap_or_default();
        for &(index, label) in ANCHOR_MENU {
            let label_wide = native_interop::wide_str(label);
            let _ = AppendMenuW(
                anchor_menu,
                MENU_ITEM_FLAGS(0),
                (IDM_ANCHOR_BASE as i32 + index) as usize,
                PCWSTR::from_raw(label_wide.as_ptr()),
            );
        }
        if let Some((first, last, check)) =
            radio_selection(IDM_ANCHOR_BASE, ANCHOR_MENU.len(), anchor_index as usize)
        {
            let _ = CheckMenuRadioItem(anchor_menu, first, last, check, MF_BYCOMMAND.0);
        }
        let anchor_label = native_interop::wide_str("Position");
        let _ = AppendMenuW(
            menu,
            MF_POPUP,
            anchor_menu.0 as usize,
            PCWSTR::from_raw(anchor_label.as_ptr()),
        );

        let save_str = native_interop::wide_str("Save Custom Position");
        let _ = AppendMenuW(
            menu,
            MENU_ITEM_FLAGS(0),
            IDM_SAVE_CUSTOM as usize,
            PCWSTR::from_raw(save_str.as_ptr()),
        );

        let load_str = native_interop::wide_str("Load Custom Position");
        let _ = AppendMenuW(
            menu,
            MENU_ITEM_FLAGS(0),
            IDM_LOAD_CUSTOM as usize,
            PCWSTR::from_raw(load_str.as_ptr()),
        );

        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());

        let topmost_str = native_interop::wide_str("Always on Top");
        let topmost_flags = if always_on_top {
            MF_CHECKED
        } else {
            MENU_ITEM_FLAGS(0)
        };
        let _ = AppendMenuW(
            menu,
            topmost_flags,
            IDM_ALWAYS_ON_TOP as usize,
            PCWSTR::from_raw(topmost_str.as_ptr()),
        );

        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());

        let exit_str = native_interop::wide_str("Exit");
        let _ = AppendMenuW(
            menu,
            MENU_ITEM_FLAGS(0),
            IDM_EXIT as usize,
            PCWSTR::from_raw(exit_str.as_ptr()),
        );

        let mut pt = POINT::default();
        let _ = GetCursorPos(&mut pt);
        let _ = SetForegroundWindow(hwnd);
        let _ = TrackPopupMenu(menu, TPM_RIGHTBUTTON, pt.x, pt.y, 0, hwnd, None);
        let _ = DestroyMenu(menu);
    }
}

#[cfg(windows)]
fn paint(hdc: HDC, hwnd: HWND) {
    let (is_dark, snapshot, clock_text) = {
        let state = lock_state();
        match state.as_ref() {
            Some(s) => (s.is_dark, s.snapshot.clone(), s.clock_text.clone()),
            None => return,
        }
    };

    let accent = Color::from_hex("#E255A1");
    let track = if is_dark {
        Color::from_hex("#444444")
    } else {
        Color::from_hex("#AAAAAA")
    };
    let text_color = if is_dark {
        Color::from_hex("#EDEDED")
    } else {
        Color::from_hex("#202020")
    };
    let dim_color = if is_dark {
        Color::from_hex("#888888")
    } else {
        Color::from_hex("#606060")
    };
    let bg_color = if is_dark {
        Color::from_hex("#1C1C1C")
    } else {
        Color::from_hex("#F3F3F3")
    };

    unsafe {
        let mut client_rect = RECT::default();
        let _ = GetClientRect(hwnd, &mut client_rect);
        let width = client_rect.right - client_rect.left;
        let height = client_rect.bottom - client_rect.top;

        if width <= 0 || height <= 0 {
            return;
        }

        let mem_dc = CreateCompatibleDC(hdc);
        let mem_bmp = CreateCompatibleBitmap(hdc, width, height);
        let old_bmp = SelectObject(mem_dc, mem_bmp);

        paint_content(
            mem_dc, width, height, &bg_color, &text_color, &dim_color, &accent, &track,
            &snapshot, &clock_text,
        );

        let _ = BitBlt(hdc, 0, 0, width, height, mem_dc, 0, 0, SRCCOPY);

        SelectObject(mem_dc, old_bmp);
        let _ = DeleteObject(mem_bmp);
        let _ = DeleteDC(mem_dc);
    }
}

/// Paint all widget content onto a DC: the clock, the video name, the
/// position label and the progress bar.
#[cfg(windows)]
fn paint_content(
    hdc: HDC,
    width: i32,
    height: i32,
    bg: &Color,
    text_color: &Color,
    dim_color: &Color,
    accent: &Color,
    track: &Color,
    snapshot: &NowPlayingSnapshot,
    clock_text: &str,
) {
    unsafe {
        let client_rect = RECT {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        };

        let bg_brush = CreateSolidBrush(COLORREF(bg.to_colorref()));
        FillRect(hdc, &client_rect, bg_brush);
        let _ = DeleteObject(bg_brush);

        let _ = SetBkMode(hdc, TRANSPARENT);

        let clock_font = make_font(-(CLOCK_H - 6), FW_SEMIBOLD.0 as i32);
        let body_font = make_font(-12, FW_MEDIUM.0 as i32);

        // Clock line
        let _ = SetTextColor(hdc, COLORREF(text_color.to_colorref()));
        let old_font = SelectObject(hdc, clock_font);
        draw_text_line(
            hdc,
            clock_text,
            PAD,
            CLOCK_TOP,
            width - PAD,
            CLOCK_TOP + CLOCK_H,
            DT_LEFT | DT_VCENTER | DT_SINGLELINE,
        );

        // Video name, end-ellipsized
        SelectObject(hdc, body_font);
        if !snapshot.video_name.is_empty() {
            draw_text_line(
                hdc,
                &snapshot.video_name,
                PAD,
                NAME_TOP,
                width - PAD,
                NAME_TOP + NAME_H,
                DT_LEFT | DT_VCENTER | DT_SINGLELINE | DT_END_ELLIPSIS,
            );
        }

        // Position label
        if !snapshot.position_label.is_empty() {
            let _ = SetTextColor(hdc, COLORREF(dim_color.to_colorref()));
            draw_text_line(
                hdc,
                &snapshot.position_label,
                PAD,
                LABEL_TOP,
                width - PAD,
                LABEL_TOP + LABEL_H,
                DT_LEFT | DT_VCENTER | DT_SINGLELINE,
            );
        }

        if snapshot.bar_visible {
            draw_progress_bar(hdc, PAD, BAR_TOP, width - 2 * PAD, snapshot.percent, accent, track);
        }

        SelectObject(hdc, old_font);
        let _ = DeleteObject(clock_font);
        let _ = DeleteObject(body_font);
    }
}

#[cfg(windows)]
fn make_font(height: i32, weight: i32) -> HFONT {
    unsafe {
        let font_name = native_interop::wide_str("Segoe UI");
        CreateFontW(
            height,
            0,
            0,
            0,
            weight,
            0,
            0,
            0,
            DEFAULT_CHARSET.0 as u32,
            OUT_TT_PRECIS.0 as u32,
            CLIP_DEFAULT_PRECIS.0 as u32,
            CLEARTYPE_QUALITY.0 as u32,
            (DEFAULT_PITCH.0 | FF_DONTCARE.0) as u32,
            PCWSTR::from_raw(font_name.as_ptr()),
        )
    }
}

#[cfg(windows)]
fn draw_text_line(
    hdc: HDC,
    text: &str,
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
    format: DRAW_TEXT_FORMAT,
) {
    unsafe {
        let mut wide: Vec<u16> = text.encode_utf16().collect();
        let mut rect = RECT { left, top, right, bottom };
        let _ = DrawTextW(hdc, &mut wide, &mut rect, format);
    }
}

/// Rounded track with a clipped fill proportional to `percent`.
#[cfg(windows)]
fn draw_progress_bar(
    hdc: HDC,
    x: i32,
    y: i32,
    width: i32,
    percent: f64,
    accent: &Color,
    track: &Color,
) {
    unsafe {
        let bar_rect = RECT {
            left: x,
            top: y,
            right: x + width,
            bottom: y + BAR_H,
        };
        draw_rounded_rect(hdc, &bar_rect, track, BAR_RADIUS);

        let fraction = percent.clamp(0.0, 100.0) / 100.0;
        let fill_width = (width as f64 * fraction) as i32;
        if fill_width > 0 {
            let fill_rect = RECT {
                left: x,
                top: y,
                right: x + fill_width,
                bottom: y + BAR_H,
            };
            let rgn = CreateRoundRectRgn(
                bar_rect.left,
                bar_rect.top,
                bar_rect.right + 1,
                bar_rect.bottom + 1,
                BAR_RADIUS * 2,
                BAR_RADIUS * 2,
            );
            let _ = SelectClipRgn(hdc, rgn);
            let brush = CreateSolidBrush(COLORREF(accent.to_colorref()));
            FillRect(hdc, &fill_rect, brush);
            let _ = DeleteObject(brush);
            let _ = SelectClipRgn(hdc, HRGN::default());
            let _ = DeleteObject(rgn);
        }
    }
}

#[cfg(windows)]
fn draw_rounded_rect(hdc: HDC, rect: &RECT, color: &Color, radius: i32) {
    unsafe {
        let brush = CreateSolidBrush(COLORREF(color.to_colorref()));
        let rgn = CreateRoundRectRgn(
            rect.left,
            rect.top,
            rect.right + 1,
            rect.bottom + 1,
            radius * 2,
            radius * 2,
        );
        let _ = FillRgn(hdc, rgn, brush);
        let _ = DeleteObject(rgn);
        let _ = DeleteObject(brush);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_without_captured_origin_is_not_a_move() {
        assert!(!drag_moved(None, (100, 100)));
    }

    #[test]
    fn drag_back_to_origin_is_not_a_move() {
        assert!(!drag_moved(Some((100, 100)), (100, 100)));
    }

    #[test]
    fn drag_to_new_position_is_a_move() {
        assert!(drag_moved(Some((100, 100)), (100, 101)));
    }

    #[test]
    fn radio_selection_maps_to_command_ids() {
        assert_eq!(
            radio_selection(IDM_SCREEN_BASE, 3, 1),
            Some((100, 102, 101))
        );
        assert_eq!(
            radio_selection(IDM_ANCHOR_BASE, ANCHOR_MENU.len(), 0),
            Some((200, 204, 200))
        );
    }

    #[test]
    fn out_of_range_selection_has_no_radio_check() {
        // Anchor index 5 is an active custom position
        assert_eq!(radio_selection(IDM_ANCHOR_BASE, ANCHOR_MENU.len(), 5), None);
        assert_eq!(radio_selection(IDM_SCREEN_BASE, 0, 0), None);
    }
}
