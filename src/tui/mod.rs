//! Interactive timeline browser
mod app;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;

use anyhow::Result;
pub use app::{App, BrowseSettings, END_OF_TIMELINE, Services};
use tokio::runtime::Handle;
pub use timestamps::{format_full, format_timestamp};

use self::terminal::TerminalGuard;

/// Run the browser until the user quits. Network tasks are spawned on `runtime`.
pub fn run_browser(services: Services, runtime: Handle, settings: BrowseSettings, namespace: String) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(services, runtime, settings, namespace);
    app.run(guard.terminal_mut())
}
