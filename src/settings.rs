use std::fmt;

#[cfg(windows)]
use windows::core::PCWSTR;
#[cfg(windows)]
use windows::Win32::System::Registry::*;

use crate::models::{Anchor, CustomPosition, PlacementState};
#[cfg(windows)]
use crate::native_interop::wide_str;

const SETTINGS_PATH: &str = r"Software\Illya";

const KEY_SCREEN: &str = "CurrentScreen";
const KEY_CORNER: &str = "CurrentCorner";
const KEY_CUSTOM_X: &str = "CustomPositionX";
const KEY_CUSTOM_Y: &str = "CustomPositionY";
const KEY_CUSTOM_SCREEN: &str = "CustomPositionScreen";
const KEY_ALWAYS_ON_TOP: &str = "AlwaysOnTop";

#[derive(Debug)]
pub enum SettingsError {
    Store(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Store(msg) => write!(f, "settings store error: {msg}"),
        }
    }
}

/// Typed key/value access with per-key fallbacks. A read returns the
/// fallback whenever the key is absent, the store is unreachable, or the
/// stored text fails to parse; no read path can raise an error.
pub trait SettingsStore {
    fn read_raw(&self, key: &str) -> Option<String>;
    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;

    fn read_int(&self, key: &str, fallback: i32) -> i32 {
        self.read_raw(key)
            .and_then(|s| s.parse().ok())
            .unwrap_or(fallback)
    }

    fn read_double(&self, key: &str, fallback: f64) -> f64 {
        self.read_raw(key)
            .and_then(|s| s.parse().ok())
            .unwrap_or(fallback)
    }

    /// Only the canonical literals `true`/`false` are accepted; any other
    /// stored text yields the fallback.
    fn read_bool(&self, key: &str, fallback: bool) -> bool {
        self.read_raw(key)
            .and_then(|s| s.parse().ok())
            .unwrap_or(fallback)
    }

    fn write_int(&mut self, key: &str, value: i32) -> Result<(), SettingsError> {
        self.write_raw(key, &value.to_string())
    }

    fn write_double(&mut self, key: &str, value: f64) -> Result<(), SettingsError> {
        self.write_raw(key, &value.to_string())
    }

    fn write_bool(&mut self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.write_raw(key, &value.to_string())
    }
}

/// Everything the widget persists between runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub placement: PlacementState,
    pub always_on_top: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            placement: PlacementState::default(),
            always_on_top: true,
        }
    }
}

fn validate_screen(index: i32, screen_count: usize) -> usize {
    if index >= 0 && (index as usize) < screen_count {
        index as usize
    } else {
        0
    }
}

/// Load settings, validating stored indices against the live screen list.
/// Never fails; every field degrades to its default independently.
pub fn load(store: &impl SettingsStore, screen_count: usize) -> Settings {
    let screen = validate_screen(store.read_int(KEY_SCREEN, 0), screen_count);
    let saved = CustomPosition {
        x: store.read_double(KEY_CUSTOM_X, 0.0),
        y: store.read_double(KEY_CUSTOM_Y, 0.0),
        screen: validate_screen(store.read_int(KEY_CUSTOM_SCREEN, 0), screen_count),
    };
    let anchor = Anchor::from_index(store.read_int(KEY_CORNER, 0), saved);

    Settings {
        placement: PlacementState { screen, anchor, saved },
        always_on_top: store.read_bool(KEY_ALWAYS_ON_TOP, true),
    }
}

/// Write each field independently. The first store-access failure is
/// surfaced as a `SettingsError`; the caller at shutdown is expected to
/// swallow it (best-effort persistence must never block exit).
pub fn save(store: &mut impl SettingsStore, settings: &Settings) -> Result<(), SettingsError> {
    let placement = &settings.placement;
    store.write_int(KEY_SCREEN, placement.screen as i32)?;
    store.write_int(KEY_CORNER, placement.anchor.as_index())?;
    store.write_double(KEY_CUSTOM_X, placement.saved.x)?;
    store.write_double(KEY_CUSTOM_Y, placement.saved.y)?;
    store.write_int(KEY_CUSTOM_SCREEN, placement.saved.screen as i32)?;
    store.write_bool(KEY_ALWAYS_ON_TOP, settings.always_on_top)?;
    Ok(())
}

/// Seed a fresh store with `Settings::default()`, each key written
/// independently and best-effort.
pub fn populate_defaults(store: &mut impl SettingsStore) {
    let defaults = Settings::default();
    let placement = &defaults.placement;
    let _ = store.write_int(KEY_SCREEN, placement.screen as i32);
    let _ = store.write_int(KEY_CORNER, placement.anchor.as_index());
    let _ = store.write_double(KEY_CUSTOM_X, placement.saved.x);
    let _ = store.write_double(KEY_CUSTOM_Y, placement.saved.y);
    let _ = store.write_int(KEY_CUSTOM_SCREEN, placement.saved.screen as i32);
    let _ = store.write_bool(KEY_ALWAYS_ON_TOP, defaults.always_on_top);
}

/// Registry-backed store under `HKCU\Software\Illya`. Values are stored as
/// `REG_SZ` text and parsed on read. The key is created and populated with
/// defaults the first time it is touched.
#[cfg(windows)]
pub struct RegistryStore {
    path: String,
}

#[cfg(windows)]
impl RegistryStore {
    pub fn open() -> Self {
        Self { path: SETTINGS_PATH.to_string() }
    }

    fn ensure_key(&self) -> Result<(HKEY, bool), SettingsError> {
        unsafe {
            let path = wide_str(&self.path);
            let mut hkey = HKEY::default();
            let mut disposition = REG_CREATE_KEY_DISPOSITION::default();
            let result = RegCreateKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(path.as_ptr()),
                0,
                PCWSTR::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_READ | KEY_WRITE,
                None,
                &mut hkey,
                Some(&mut disposition),
            );
            if result.is_err() {
                return Err(SettingsError::Store(format!(
                    "open HKCU\\{}: {result:?}",
                    self.path
                )));
            }
            Ok((hkey, disposition == REG_CREATED_NEW_KEY))
        }
    }
}

/// An already-open registry key, so default seeding goes through the same
/// trait path as every other store.
#[cfg(windows)]
struct OpenKey(HKEY);

#[cfg(windows)]
impl SettingsStore for OpenKey {
    fn read_raw(&self, key: &str) -> Option<String> {
        query_string(self.0, key)
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        set_string(self.0, key, value)
    }
}

#[cfg(windows)]
fn set_string(hkey: HKEY, name: &str, value: &str) -> Result<(), SettingsError> {
    unsafe {
        let name_wide = wide_str(name);
        let value_wide = wide_str(value);
        let bytes = std::slice::from_raw_parts(
            value_wide.as_ptr() as *const u8,
            value_wide.len() * 2,
        );
        let result = RegSetValueExW(
            hkey,
            PCWSTR::from_raw(name_wide.as_ptr()),
            0,
            REG_SZ,
            Some(bytes),
        );
        if result.is_err() {
            return Err(SettingsError::Store(format!("set {name}: {result:?}")));
        }
        Ok(())
    }
}

#[cfg(windows)]
fn query_string(hkey: HKEY, name: &str) -> Option<String> {
    unsafe {
        let name_wide = wide_str(name);
        let mut size: u32 = 0;
        let result = RegQueryValueExW(
            hkey,
            PCWSTR::from_raw(name_wide.as_ptr()),
            None,
            None,
            None,
            Some(&mut size),
        );
        if result.is_err() || size == 0 {
            return None;
        }

        let mut buf = vec![0u8; size as usize];
        let mut read = size;
        let result = RegQueryValueExW(
            hkey,
            PCWSTR::from_raw(name_wide.as_ptr()),
            None,
            None,
            Some(buf.as_mut_ptr()),
            Some(&mut read),
        );
        if result.is_err() {
            return None;
        }

        let wide: Vec<u16> = buf[..read as usize]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let trimmed = match wide.split_last() {
            Some((0, rest)) => rest,
            _ => &wide[..],
        };
        Some(String::from_utf16_lossy(trimmed))
    }
}

#[cfg(windows)]
impl SettingsStore for RegistryStore {
    fn read_raw(&self, key: &str) -> Option<String> {
        let (hkey, created) = self.ensure_key().ok()?;
        if created {
            populate_defaults(&mut OpenKey(hkey));
        }
        let value = query_string(hkey, key);
        unsafe {
            let _ = RegCloseKey(hkey);
        }
        value
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let (hkey, created) = self.ensure_key()?;
        if created {
            populate_defaults(&mut OpenKey(hkey));
        }
        let result = set_string(hkey, key, value);
        unsafe {
            let _ = RegCloseKey(hkey);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        values: HashMap<String, String>,
        fail_writes: bool,
    }

    impl SettingsStore for MemoryStore {
        fn read_raw(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn write_raw(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
            if self.fail_writes {
                return Err(SettingsError::Store("store closed".to_string()));
            }
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn missing_keys_read_as_fallbacks() {
        let store = MemoryStore::default();
        assert_eq!(store.read_int("nope", 7), 7);
        assert_eq!(store.read_double("nope", 2.5), 2.5);
        assert!(store.read_bool("nope", true));
    }

    #[test]
    fn corrupted_values_read_as_fallbacks() {
        let mut store = MemoryStore::default();
        store.write_raw("n", "not a number").unwrap();
        store.write_raw("d", "12,5").unwrap();
        assert_eq!(store.read_int("n", -1), -1);
        assert_eq!(store.read_double("d", 0.5), 0.5);
    }

    #[test]
    fn bool_requires_canonical_literals() {
        let mut store = MemoryStore::default();
        store.write_raw("b", "True").unwrap();
        assert!(!store.read_bool("b", false));
        store.write_raw("b", "1").unwrap();
        assert!(!store.read_bool("b", false));
        store.write_raw("b", "true").unwrap();
        assert!(store.read_bool("b", false));
        store.write_raw("b", "false").unwrap();
        assert!(!store.read_bool("b", true));
    }

    #[test]
    fn round_trip_reproduces_settings() {
        let mut store = MemoryStore::default();
        let settings = Settings {
            placement: PlacementState {
                screen: 1,
                anchor: Anchor::BottomRight,
                saved: CustomPosition { x: 120.5, y: -30.0, screen: 1 },
            },
            always_on_top: false,
        };
        save(&mut store, &settings).unwrap();
        assert_eq!(load(&store, 2), settings);
    }

    #[test]
    fn custom_anchor_round_trips_with_payload() {
        let mut store = MemoryStore::default();
        let saved = CustomPosition { x: 42.0, y: 17.0, screen: 0 };
        let settings = Settings {
            placement: PlacementState { screen: 0, anchor: Anchor::Custom(saved), saved },
            always_on_top: true,
        };
        save(&mut store, &settings).unwrap();
        let loaded = load(&store, 1);
        assert_eq!(loaded.placement.anchor, Anchor::Custom(saved));
    }

    #[test]
    fn fresh_store_is_seeded_with_defaults() {
        let mut store = MemoryStore::default();
        populate_defaults(&mut store);
        assert_eq!(store.read_raw(KEY_SCREEN).as_deref(), Some("0"));
        assert_eq!(store.read_raw(KEY_CORNER).as_deref(), Some("0"));
        assert_eq!(store.read_raw(KEY_CUSTOM_X).as_deref(), Some("0"));
        assert_eq!(store.read_raw(KEY_CUSTOM_Y).as_deref(), Some("0"));
        assert_eq!(store.read_raw(KEY_CUSTOM_SCREEN).as_deref(), Some("0"));
        assert_eq!(store.read_raw(KEY_ALWAYS_ON_TOP).as_deref(), Some("true"));
        assert_eq!(load(&store, 1), Settings::default());
    }

    #[test]
    fn load_defaults_from_empty_store() {
        let store = MemoryStore::default();
        assert_eq!(load(&store, 1), Settings::default());
    }

    #[test]
    fn stored_screen_no_longer_present_falls_back_to_zero() {
        let mut store = MemoryStore::default();
        store.write_int(KEY_SCREEN, 3).unwrap();
        store.write_int(KEY_CUSTOM_SCREEN, -2).unwrap();
        let loaded = load(&store, 2);
        assert_eq!(loaded.placement.screen, 0);
        assert_eq!(loaded.placement.saved.screen, 0);
    }

    #[test]
    fn invalid_corner_index_falls_back_to_centered() {
        let mut store = MemoryStore::default();
        store.write_int(KEY_CORNER, 9).unwrap();
        assert_eq!(load(&store, 1).placement.anchor, Anchor::Centered);
        store.write_raw(KEY_CORNER, "garbage").unwrap();
        assert_eq!(load(&store, 1).placement.anchor, Anchor::Centered);
    }

    #[test]
    fn save_surfaces_store_failure() {
        let mut store = MemoryStore { fail_writes: true, ..MemoryStore::default() };
        let err = save(&mut store, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("store closed"));
    }
}
