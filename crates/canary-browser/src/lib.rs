//! Chrome DevTools Protocol implementation of the Canary automation capability.

mod chrome_finder;
mod error;
mod network_tracker;
mod page;
mod profile;
mod session;

pub use chrome_finder::ChromeFinder;
pub use error::{Error, Result};
pub use network_tracker::NetworkTracker;
pub use page::CdpPage;
pub use profile::ProfileManager;
pub use session::{BrowserSession, LaunchOptions};
