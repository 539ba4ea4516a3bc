#![cfg_attr(windows, windows_subsystem = "windows")]

mod models;
#[cfg(windows)]
mod native_interop;
mod placement;
mod poller;
mod settings;
#[cfg(windows)]
mod theme;
mod window;

fn main() {
    #[cfg(windows)]
    window::run();
}
