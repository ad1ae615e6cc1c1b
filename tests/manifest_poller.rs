mod common;

use std::sync::Arc;
use std::time::Duration;

use screenvisor::{
    Bus, EventKind, ManifestPoller, PollOutcome, ScreenId, TICKER_SEPARATOR, ZoneCommand,
    ZoneHandle,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use common::{RecordingDisplay, ScriptedSource, drain, endpoints, kinds, transport_error};

const A: &str = r#"{"manifest_id":"A","main_items":[{"type":"image","asset_id":"a1.png"},{"type":"image","asset_id":"a2.png"}],"right_items":[]}"#;
const B: &str = r#"{"manifest_id":"B","main_items":[{"type":"image","asset_id":"b1.png"}],"right_items":[{"type":"youtube","url":"https://www.youtube.com/embed/x"}]}"#;

struct Rig {
    poller: ManifestPoller,
    source: Arc<ScriptedSource>,
    display: Arc<RecordingDisplay>,
    main: mpsc::Receiver<ZoneCommand>,
    right: mpsc::Receiver<ZoneCommand>,
    bus: Bus,
}

fn rig() -> Rig {
    let source = ScriptedSource::new();
    let display = RecordingDisplay::new();
    let bus = Bus::new(256);
    let (main_handle, main) = ZoneHandle::channel("main", 16);
    let (right_handle, right) = ZoneHandle::channel("right", 16);
    let poller = ManifestPoller::new(
        source.clone(),
        display.clone(),
        endpoints(),
        ScreenId::new("lobby"),
        Duration::from_secs(5),
        bus.clone(),
    )
    .bind("main", main_handle)
    .bind("right", right_handle);
    Rig {
        poller,
        source,
        display,
        main,
        right,
        bus,
    }
}

fn resets(rx: &mut mpsc::Receiver<ZoneCommand>) -> Vec<usize> {
    let mut out = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        if let ZoneCommand::Reset(items) = cmd {
            out.push(items.len());
        }
    }
    out
}

#[tokio::test]
async fn only_identity_changes_reset_zones() {
    let mut rig = rig();
    let mut events = rig.bus.subscribe();
    rig.source.push_manifest(A);
    rig.source.push_manifest(A);
    rig.source.push_manifest(B);

    assert_eq!(rig.poller.poll_once().await, PollOutcome::Applied);
    assert_eq!(rig.poller.poll_once().await, PollOutcome::Unchanged);
    assert_eq!(rig.poller.poll_once().await, PollOutcome::Applied);

    assert_eq!(resets(&mut rig.main), [2, 1]);
    assert_eq!(resets(&mut rig.right), [0, 1]);
    assert_eq!(rig.poller.applied(), Some(Some("B")));
    assert_eq!(
        kinds(&drain(&mut events)),
        [
            EventKind::ManifestApplied,
            EventKind::ManifestUnchanged,
            EventKind::ManifestApplied
        ]
    );
}

#[tokio::test]
async fn force_reload_reapplies_same_identity() {
    let mut rig = rig();
    rig.source.push_manifest(A);
    rig.source
        .push_manifest(&A.replace(r#""manifest_id":"A""#, r#""manifest_id":"A","force_reload":1"#));

    assert_eq!(rig.poller.poll_once().await, PollOutcome::Applied);
    assert_eq!(rig.poller.poll_once().await, PollOutcome::Applied);
    assert_eq!(resets(&mut rig.main), [2, 2]);
}

#[tokio::test]
async fn fetch_failure_leaves_zones_alone() {
    let mut rig = rig();
    let mut events = rig.bus.subscribe();
    rig.source.push_manifest(A);
    rig.source.push_manifest_error(transport_error("/api/manifest/lobby"));
    rig.source.push_manifest(A);

    rig.poller.poll_once().await;
    let failed = rig.poller.poll_once().await;
    assert!(matches!(failed, PollOutcome::Failed(_)));
    assert_eq!(rig.poller.applied(), Some(Some("A")));

    // Recovery with the same identity is not a change.
    assert_eq!(rig.poller.poll_once().await, PollOutcome::Unchanged);
    assert_eq!(resets(&mut rig.main), [2]);

    let events = drain(&mut events);
    let failed = events
        .iter()
        .find(|e| e.kind == EventKind::ManifestFailed)
        .expect("manifest failed event");
    assert_eq!(failed.reason.as_deref(), Some("http 502 Bad Gateway"));
    assert_eq!(failed.delay(), Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn missing_identity_applies_once() {
    let mut rig = rig();
    rig.source.push_manifest(r#"{"playlist":{"items":[]}}"#);

    assert_eq!(rig.poller.poll_once().await, PollOutcome::Applied);
    assert_eq!(rig.poller.poll_once().await, PollOutcome::Unchanged);
    assert_eq!(rig.poller.applied(), Some(None));
}

#[tokio::test]
async fn apply_paints_header_and_ticker() {
    let rig = rig();
    let Rig {
        poller,
        source,
        display,
        ..
    } = rig;
    let mut poller = poller.with_ticker("rss_ticker", "fallback line");
    source.push_manifest(
        r#"{"manifest_id":"A","header_title":"Prestige MedSpa","logo_url":"/media/logo.jpg"}"#,
    );
    source.push_widget(
        "rss_ticker",
        r#"{"items":[{"text":"Open late Fridays"},{"text":"  "},{"text":"New: PRP facials"}]}"#,
    );

    poller.poll_once().await;
    let header = display.header().expect("header set");
    assert_eq!(header.title, "Prestige MedSpa");
    assert_eq!(
        header.logo_url.as_deref(),
        Some("http://signage.test/media/logo.jpg")
    );
    assert_eq!(
        display.ticker().as_deref(),
        Some(format!("Open late Fridays{TICKER_SEPARATOR}New: PRP facials").as_str())
    );
}

#[tokio::test]
async fn ticker_falls_back_when_widget_fails() {
    let rig = rig();
    let mut poller = rig.poller.with_ticker("rss_ticker", "fallback line");
    rig.source.push_manifest(A);
    rig.source
        .push_widget_error("rss_ticker", transport_error("/api/widgets/rss_ticker"));

    poller.poll_once().await;
    assert_eq!(rig.display.ticker().as_deref(), Some("fallback line"));
}

#[tokio::test(start_paused = true)]
async fn run_polls_on_a_fixed_interval() {
    let rig = rig();
    let source = rig.source.clone();
    source.push_manifest_error(transport_error("/api/manifest/lobby"));
    let token = CancellationToken::new();
    let task = tokio::spawn(rig.poller.run(token.clone()));

    tokio::time::sleep(Duration::from_secs(12)).await;
    token.cancel();
    task.await.unwrap();

    // t = 0, 5, 10
    assert_eq!(source.manifest_calls(), 3);
}
