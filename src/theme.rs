use std::ffi::c_void;

use windows::core::PCWSTR;
use windows::Win32::System::Registry::*;

use crate::native_interop::wide_str;

const PERSONALIZE_PATH: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";
const LIGHT_THEME_VALUE: &str = "SystemUsesLightTheme";

/// Check if the system is in dark mode by reading the registry.
/// Unreadable or missing value defaults to dark.
pub fn is_dark_mode() -> bool {
    read_theme_flag().unwrap_or(0) == 0
}

fn read_theme_flag() -> Option<u32> {
    unsafe {
        let path = wide_str(PERSONALIZE_PATH);
        let name = wide_str(LIGHT_THEME_VALUE);

        let mut data: u32 = 0;
        let mut size = std::mem::size_of::<u32>() as u32;
        let result = RegGetValueW(
            HKEY_CURRENT_USER,
            PCWSTR::from_raw(path.as_ptr()),
            PCWSTR::from_raw(name.as_ptr()),
            RRF_RT_REG_DWORD,
            None,
            Some(&mut data as *mut u32 as *mut c_void),
            Some(&mut size),
        );

        if result.is_err() {
            None
        } else {
            Some(data)
        }
    }
}
