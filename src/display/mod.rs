//! # Display backends.
//!
//! The [`Display`] trait is everything the scheduler needs from a screen: mount
//! and unmount elements in named zones, paint the header band and ticker line,
//! and show the debug overlay. The scheduler never touches a renderer directly.
//!
//! [`ConsoleDisplay`] is the built-in headless backend used by the binary.

mod console;

pub use console::ConsoleDisplay;

use async_trait::async_trait;

use crate::error::MediaError;
use crate::manifest::Header;
use crate::render::{ElementId, SignalLink, Surface};

/// A screen divided into named zones.
///
/// ## Contract
/// - `mount` either returns an element id or a [`MediaError`] it detected synchronously;
///   asynchronous outcomes (video ended, asset failed later) go through `link`.
/// - After `unmount` (or `clear`) the element must stop playing and must not use its
///   link again. The caller also detaches the link first.
/// - Calls for one zone are never concurrent.
#[async_trait]
pub trait Display: Send + Sync + 'static {
    async fn mount(
        &self,
        zone: &str,
        surface: &Surface,
        link: SignalLink,
    ) -> Result<ElementId, MediaError>;

    async fn unmount(&self, zone: &str, element: ElementId);

    /// Removes every element of `zone`.
    async fn clear(&self, zone: &str);

    async fn set_background(&self, zone: &str, color: Option<&str>);

    async fn set_header(&self, header: &Header);

    async fn set_ticker(&self, text: &str);

    /// Replaces the debug overlay text.
    async fn show_overlay(&self, text: &str);

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
