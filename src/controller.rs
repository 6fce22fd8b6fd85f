//! Adapter between the host's signal stream and the per-screen drivers. The
//! drivers are plain method calls with no signal wiring of their own, so this
//! is the only module that knows how deliveries are routed; everything below
//! it stays testable in isolation.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::collections::HashMap;
use crate::common::config::Config;
use crate::driver::TilingDriver;
use crate::engine::{EngineKind, EngineType};
use crate::geometry::Direction;
use crate::host::Host;
use crate::resolve::{descend_live_chain, insert_direction, neighbor_probe, probe_point};

/// Host deliveries, handled to completion one at a time in delivery order.
pub enum Event<H: Host> {
    WindowAdded(H::WindowId),
    WindowRemoved(H::WindowId),
    /// The visible desktop changed; every screen is rebuilt.
    DesktopChanged,
    /// Outputs appeared or disappeared.
    ScreensChanged,
    /// The host mutated a screen's tile tree out-of-band, for example a
    /// pointer-driven resize or a manual split.
    TileLayoutModified(H::ScreenId),
    Command(Command),
}

// hand-written so H itself does not need Debug
impl<H: Host> fmt::Debug for Event<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::WindowAdded(window) => f.debug_tuple("WindowAdded").field(window).finish(),
            Event::WindowRemoved(window) => f.debug_tuple("WindowRemoved").field(window).finish(),
            Event::DesktopChanged => f.write_str("DesktopChanged"),
            Event::ScreensChanged => f.write_str("ScreensChanged"),
            Event::TileLayoutModified(screen) => {
                f.debug_tuple("TileLayoutModified").field(screen).finish()
            }
            Event::Command(command) => f.debug_tuple("Command").field(command).finish(),
        }
    }
}

/// User-facing commands, typically bound to shortcuts by the embedder.
#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Focus(Direction),
    Insert(Direction),
    Resize(Direction),
    Retile,
    SwitchEngine(EngineType),
}

pub struct Controller<H: Host> {
    config: Config,
    drivers: HashMap<H::ScreenId, TilingDriver<H>>,
}

impl<H: Host> Controller<H> {
    pub fn new(config: Config) -> Self {
        Controller { config, drivers: HashMap::default() }
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn driver(&self, screen: H::ScreenId) -> Option<&TilingDriver<H>> {
        self.drivers.get(&screen)
    }

    /// Creates drivers for new screens and drops the ones whose screen went
    /// away.
    pub fn sync_screens(&mut self, host: &mut H) {
        let screens = host.screens();
        self.drivers.retain(|screen, _| screens.contains(screen));
        for screen in screens {
            self.drivers
                .entry(screen)
                .or_insert_with(|| TilingDriver::new(screen, self.config.settings.clone()));
        }
    }

    pub fn handle_event(&mut self, host: &mut H, event: Event<H>) {
        debug!(?event, "handling event");
        match event {
            Event::WindowAdded(window) => {
                let screen = host.window_screen(window);
                self.ensure_driver(screen).add_window(host, window);
            }
            Event::WindowRemoved(window) => {
                let screen = host.window_screen(window);
                match self.drivers.get_mut(&screen) {
                    Some(driver) => driver.remove_window(host, window),
                    None => debug!(?window, "removed window had no driver"),
                }
            }
            Event::DesktopChanged => self.rebuild_all(host),
            Event::ScreensChanged => {
                self.sync_screens(host);
                self.rebuild_all(host);
            }
            Event::TileLayoutModified(screen) => match self.drivers.get_mut(&screen) {
                Some(driver) => driver.regenerate_layout(host),
                None => debug!(?screen, "modified screen has no driver"),
            },
            Event::Command(command) => self.handle_command(host, command),
        }
    }

    fn handle_command(&mut self, host: &mut H, command: Command) {
        match command {
            Command::Focus(direction) => self.focus(host, direction),
            Command::Insert(direction) => self.insert(host, direction),
            Command::Resize(direction) => self.resize(host, direction),
            Command::Retile => self.rebuild_all(host),
            Command::SwitchEngine(engine) => self.switch_engine(host, engine),
        }
    }

    fn focus(&mut self, host: &mut H, direction: Direction) {
        let Some(window) = host.active_window() else {
            debug!("no active window to focus from");
            return;
        };
        let Some((_, tile)) = neighbor_probe(host, window, direction) else {
            debug!(?direction, "nothing to focus there");
            return;
        };
        if let Some(&neighbor) = host.windows_in_tile(tile).first() {
            host.activate_window(neighbor);
        }
    }

    fn insert(&mut self, host: &mut H, direction: Direction) {
        let Some(window) = host.active_window() else {
            debug!("no active window to move");
            return;
        };
        let Some(tile) = host.window_tile(window) else {
            debug!(?window, "active window is not tiled");
            return;
        };
        let point = probe_point(host.window_frame(window), direction, host.tile_padding(tile));
        let screen = host.window_screen(window);
        let Some(driver) = self.drivers.get_mut(&screen) else {
            debug!(?screen, "window's screen has no driver");
            return;
        };
        driver.remove_window(host, window);
        // resolve at the original probe point; the rebuild above may have
        // moved everything
        let target = host
            .tile_at(screen, point)
            .or_else(|| host.root_tile(screen).map(|root| descend_live_chain(host, root)));
        let Some(target) = target else {
            debug!(?screen, "no tile to move into");
            return;
        };
        let hint = insert_direction(host.tile_geometry(target), point);
        driver.put_window_in_tile(host, window, target, Some(hint));
    }

    fn resize(&mut self, host: &mut H, direction: Direction) {
        let Some(window) = host.active_window() else {
            debug!("no active window to resize");
            return;
        };
        let Some(tile) = host.window_tile(window) else {
            debug!(?window, "active window is not tiled");
            return;
        };
        // the host answers with a tile-layout-modified signal, which pulls
        // the new sizes back into the abstract tree
        host.resize_tile(tile, direction, self.config.settings.resize_amount);
    }

    fn switch_engine(&mut self, host: &mut H, engine: EngineType) {
        self.config.settings.engine = engine;
        let config = self.config.settings.engine_config();
        for driver in self.drivers.values_mut() {
            driver.switch_engine(host, EngineKind::new(engine, config));
        }
    }

    fn rebuild_all(&mut self, host: &mut H) {
        for driver in self.drivers.values_mut() {
            driver.build_layout(host);
        }
    }

    fn ensure_driver(&mut self, screen: H::ScreenId) -> &mut TilingDriver<H> {
        self.drivers
            .entry(screen)
            .or_insert_with(|| TilingDriver::new(screen, self.config.settings.clone()))
    }
}
