//! System tray presentation
//!
//! The shipped presentation layer: a menu-bar item showing the current
//! now-playing status with transport controls underneath. Uses the
//! `tray-icon` crate for native tray support.

use crate::{NowPlaying, TransportCommand};
use anyhow::{Context, Result};
use tray_icon::{
    menu::{CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};

/// Menu item identifiers
const MENU_ID_STATUS: &str = "status";
const MENU_ID_PLAYPAUSE: &str = "playpause";
const MENU_ID_NEXT: &str = "next";
const MENU_ID_PREVIOUS: &str = "previous";
const MENU_ID_INTERACTIVE: &str = "interactive";
const MENU_ID_QUIT: &str = "quit";

/// User actions originating from the tray menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    /// A transport command to forward to the media layer
    Transport(TransportCommand),

    /// Toggle interactive (click-through) mode
    ToggleInteractive,

    /// Quit the overlay
    Quit,
}

/// System tray manager.
pub struct TrayManager {
    _tray_icon: TrayIcon,
    status_item: MenuItem,
    interactive_item: CheckMenuItem,
}

impl TrayManager {
    /// Build the tray icon and menu.
    pub fn new() -> Result<Self> {
        let icon = Self::load_icon()?;

        let status_item = MenuItem::with_id(MENU_ID_STATUS, "Deezer Overlay", false, None);
        let playpause_item = MenuItem::with_id(MENU_ID_PLAYPAUSE, "Play / Pause", true, None);
        let next_item = MenuItem::with_id(MENU_ID_NEXT, "Next", true, None);
        let previous_item = MenuItem::with_id(MENU_ID_PREVIOUS, "Previous", true, None);
        let interactive_item =
            CheckMenuItem::with_id(MENU_ID_INTERACTIVE, "Interactive", true, false, None);
        let quit_item = MenuItem::with_id(MENU_ID_QUIT, "Quit", true, None);

        let menu = Menu::new();
        menu.append(&status_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&playpause_item)?;
        menu.append(&next_item)?;
        menu.append(&previous_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&interactive_item)?;
        menu.append(&PredefinedMenuItem::separator())?;
        menu.append(&quit_item)?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_menu(Box::new(menu))
            .with_tooltip("Deezer Overlay")
            .build()
            .context("Failed to create tray icon")?;

        Ok(Self {
            _tray_icon: tray_icon,
            status_item,
            interactive_item,
        })
    }

    /// Load the tray icon from embedded bytes.
    fn load_icon() -> Result<Icon> {
        let icon_bytes = include_bytes!("../assets/tray_icon.png");

        let image = image::load_from_memory(icon_bytes)
            .context("Failed to load tray icon image")?
            .into_rgba8();

        let (width, height) = image.dimensions();
        let rgba = image.into_raw();

        Icon::from_rgba(rgba, width, height).context("Failed to create icon from RGBA data")
    }

    /// Map a menu event to a tray action.
    pub fn action_for(event: &MenuEvent) -> Option<TrayAction> {
        match event.id.0.as_str() {
            MENU_ID_PLAYPAUSE => Some(TrayAction::Transport(TransportCommand::PlayPause)),
            MENU_ID_NEXT => Some(TrayAction::Transport(TransportCommand::Next)),
            MENU_ID_PREVIOUS => Some(TrayAction::Transport(TransportCommand::Previous)),
            MENU_ID_INTERACTIVE => Some(TrayAction::ToggleInteractive),
            MENU_ID_QUIT => Some(TrayAction::Quit),
            _ => None,
        }
    }

    /// Render a snapshot into the status line.
    pub fn show_snapshot(&self, snapshot: &NowPlaying) {
        self.status_item.set_text(snapshot.status_line());
    }

    /// Reflect interactive mode in the menu.
    pub fn set_interactive(&self, interactive: bool) {
        self.interactive_item.set_checked(interactive);
    }
}
