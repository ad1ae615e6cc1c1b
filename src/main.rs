//! screenvisor: plays the signage rotation of one screen.
//!
//! ```text
//! screenvisor http://signage.local:8000/player/lobby
//! screenvisor --layout zoned --widget spa_cards=main http://signage.local:8000/player-zones/lobby
//! ```
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use screenvisor::{
    Config, ConsoleDisplay, Layout, LogWriter, Player, ScreenAddress, Subscribe, WidgetSpec,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    /// One full-screen zone fed by `playlist.items`.
    Single,
    /// Main and right zones plus a ticker line.
    Zoned,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Display URL; its last path segment is the screen id.
    #[arg(env = "SCREENVISOR_URL")]
    url: String,

    #[arg(long, value_enum, default_value_t = LayoutArg::Single, env = "SCREENVISOR_LAYOUT")]
    layout: LayoutArg,

    /// Hand a zone to a widget loop, as NAME=ZONE (repeatable).
    #[arg(long = "widget", value_name = "NAME=ZONE", value_parser = parse_widget)]
    widgets: Vec<WidgetSpec>,

    /// Seconds between manifest polls.
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,

    /// Seconds between widget re-fetches (0 = fetch once).
    #[arg(long, default_value_t = 0)]
    widget_refresh: u64,

    /// Seconds a video plays on the console display before it ends.
    #[arg(long, default_value_t = 30)]
    video_length: u64,

    /// Seconds to wait for loops to stop on shutdown.
    #[arg(long, default_value_t = 5)]
    grace: u64,

    /// Show the debug overlay (same as `debug=1` in the URL).
    #[arg(long)]
    debug: bool,
}

fn parse_widget(raw: &str) -> Result<WidgetSpec, String> {
    match raw.split_once('=') {
        Some((name, zone)) if !name.trim().is_empty() && !zone.trim().is_empty() => {
            Ok(WidgetSpec::new(name.trim(), zone.trim()))
        }
        _ => Err(format!("expected NAME=ZONE, got {raw:?}")),
    }
}

impl Args {
    fn config(&self) -> Config {
        Config {
            poll_interval: Duration::from_secs(self.poll_interval.max(1)),
            widget_refresh: Duration::from_secs(self.widget_refresh),
            grace: Duration::from_secs(self.grace),
            ..Config::default()
        }
    }

    fn layout(&self) -> Layout {
        let base = match self.layout {
            LayoutArg::Single => Layout::single(),
            LayoutArg::Zoned => Layout::zoned(),
        };
        self.widgets
            .iter()
            .cloned()
            .fold(base, |layout, widget| layout.with_widget(widget))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let address = ScreenAddress::parse(&args.url).context("bad display url")?;
    info!(screen = %address.screen(), base = %address.endpoints().base(), "starting player");

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let mut builder = Player::builder(args.config(), address)
        .with_layout(args.layout())
        .with_subscribers(subs)
        .with_display(Arc::new(ConsoleDisplay::new(Duration::from_secs(
            args.video_length,
        ))));
    if args.debug {
        builder = builder.with_debug(true);
    }
    let player = builder.build()?;

    if let Err(err) = player.run().await {
        error!(label = err.as_label(), "{err}");
        return Err(err.into());
    }
    info!("player stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_flag_needs_both_halves() {
        let spec = parse_widget("spa_cards=main").unwrap();
        assert_eq!(spec, WidgetSpec::new("spa_cards", "main"));
        assert!(parse_widget("spa_cards").is_err());
        assert!(parse_widget("=main").is_err());
    }

    #[test]
    fn widgets_take_zones_from_the_layout() {
        let args = Args::parse_from([
            "screenvisor",
            "--layout",
            "zoned",
            "--widget",
            "spa_cards=main",
            "http://h/player-zones/lobby",
        ]);
        let layout = args.layout();
        assert_eq!(layout.zones.len(), 1);
        assert_eq!(layout.widgets.len(), 1);
        assert!(layout.validate().is_ok());
    }
}
