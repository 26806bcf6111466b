//! Event loop behaviour against scripted events
use screen_overlay::screen::headless::RawEvent;
use screen_overlay::screen::{
    SCREEN_EVENT_CLOSE, SCREEN_EVENT_CREATE, SCREEN_EVENT_KEYBOARD, SCREEN_EVENT_NONE,
    SCREEN_EVENT_PROPERTY,
};
use screen_overlay::{
    run_overlay, EventLoop, HeadlessScreen, OverlayConfig, PollOutcome, ScreenError,
    ScreenEventKind, ScreenSession,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_create_then_pointer() {
    let screen = HeadlessScreen::new();
    screen.push_event(RawEvent::new(SCREEN_EVENT_CREATE));
    screen.push_event(RawEvent::pointer(50, 75));

    let mut session = ScreenSession::open(screen.clone()).unwrap();
    let mut event_loop = EventLoop::new(Duration::from_millis(1000));
    let mut out = Vec::new();

    let first = event_loop.poll_once(&mut session, &mut out).unwrap();
    let second = event_loop.poll_once(&mut session, &mut out).unwrap();

    assert_eq!(
        first,
        PollOutcome::Event {
            index: 0,
            kind: ScreenEventKind::Create
        }
    );
    assert_eq!(
        second,
        PollOutcome::Event {
            index: 1,
            kind: ScreenEventKind::Pointer { x: 50, y: 75 }
        }
    );
    assert_eq!(
        lines(out),
        vec![
            "Event 0: SCREEN_EVENT_CREATE",
            "Event 1: SCREEN_EVENT_POINTER at (50, 75)",
        ]
    );
}

#[test]
fn test_timeout_does_not_advance_counter() {
    let screen = HeadlessScreen::new();
    screen.push_event(RawEvent::new(SCREEN_EVENT_KEYBOARD));
    screen.push_timeout();
    screen.push_poll_failure(4);
    screen.push_event(RawEvent::new(SCREEN_EVENT_CLOSE));

    let mut session = ScreenSession::open(screen.clone()).unwrap();
    let mut event_loop = EventLoop::new(Duration::from_millis(1000));
    let mut out = Vec::new();

    for _ in 0..4 {
        event_loop.poll_once(&mut session, &mut out).unwrap();
    }

    assert_eq!(event_loop.event_count(), 2);
    assert_eq!(
        lines(out),
        vec![
            "Event 0: SCREEN_EVENT_KEYBOARD",
            "No events received (timeout)",
            "No events received (timeout)",
            "Event 1: SCREEN_EVENT_CLOSE",
        ]
    );
}

#[test]
fn test_empty_event_is_reported_as_timeout() {
    let screen = HeadlessScreen::new();
    screen.push_event(RawEvent::new(SCREEN_EVENT_NONE));
    screen.push_event(RawEvent::new(SCREEN_EVENT_CREATE));

    let mut session = ScreenSession::open(screen.clone()).unwrap();
    let mut event_loop = EventLoop::new(Duration::from_millis(1000));
    let mut out = Vec::new();

    let outcome = event_loop.poll_once(&mut session, &mut out).unwrap();
    assert_eq!(outcome, PollOutcome::NoEvent(ScreenError::Timeout));
    assert_eq!(event_loop.event_count(), 0);

    event_loop.poll_once(&mut session, &mut out).unwrap();
    assert_eq!(event_loop.event_count(), 1);
    assert_eq!(
        lines(out),
        vec!["No events received (timeout)", "Event 0: SCREEN_EVENT_CREATE"]
    );
}

#[test]
fn test_poll_failure_is_reported_like_a_timeout() {
    let screen = HeadlessScreen::new();
    screen.push_poll_failure(4);

    let mut session = ScreenSession::open(screen.clone()).unwrap();
    let mut event_loop = EventLoop::new(Duration::from_millis(1000));
    let mut out = Vec::new();

    let outcome = event_loop.poll_once(&mut session, &mut out).unwrap();
    assert_eq!(
        outcome,
        PollOutcome::NoEvent(ScreenError::Call {
            call: "screen_get_event",
            code: 4
        })
    );

    let outcome = event_loop.poll_once(&mut session, &mut out).unwrap();
    assert_eq!(outcome, PollOutcome::NoEvent(ScreenError::Timeout));
    assert_eq!(event_loop.event_count(), 0);
}

#[test]
fn test_unknown_events_are_counted() {
    let screen = HeadlessScreen::new();
    screen.push_event(RawEvent::new(SCREEN_EVENT_PROPERTY));
    screen.push_event(RawEvent::new(SCREEN_EVENT_CREATE));

    let mut session = ScreenSession::open(screen.clone()).unwrap();
    let mut event_loop = EventLoop::new(Duration::from_millis(1000));
    let mut out = Vec::new();
    event_loop.poll_once(&mut session, &mut out).unwrap();
    event_loop.poll_once(&mut session, &mut out).unwrap();

    assert_eq!(
        lines(out),
        vec![
            format!("Event 0: Unknown event type {}", SCREEN_EVENT_PROPERTY),
            "Event 1: SCREEN_EVENT_CREATE".to_string(),
        ]
    );
}

#[test]
fn test_event_receptacle_is_reused() {
    let screen = HeadlessScreen::new();
    screen.push_event(RawEvent::new(SCREEN_EVENT_CREATE));
    screen.push_event(RawEvent::new(SCREEN_EVENT_CLOSE));

    let mut session = ScreenSession::open(screen.clone()).unwrap();
    session.create_event().unwrap();
    let mut event_loop = EventLoop::new(Duration::from_millis(1000));
    let mut out = Vec::new();
    event_loop.poll_once(&mut session, &mut out).unwrap();
    event_loop.poll_once(&mut session, &mut out).unwrap();

    assert_eq!(screen.call_count("screen_create_event"), 1);
    assert_eq!(screen.live_events(), 1);
}

#[test]
fn test_run_stops_when_flag_cleared() {
    let screen = HeadlessScreen::new().with_display(0, 1920, 1080);
    screen.push_event(RawEvent::new(SCREEN_EVENT_CREATE));
    screen.push_timeout();
    screen.push_event(RawEvent::pointer(50, 75));

    let running = Arc::new(AtomicBool::new(true));
    screen.stop_when_drained(running.clone());

    let mut out = Vec::new();
    let events = run_overlay(screen.clone(), &OverlayConfig::default(), &running, &mut out).unwrap();

    assert_eq!(events, 2);
    assert!(!running.load(Ordering::SeqCst));
    assert_eq!(
        lines(out),
        vec![
            "Available displays:",
            "  Display 0: 1920x1080",
            "Windows created successfully!",
            "Window 1: 500x500 black at position 100,100 (sensitive to touch)",
            "Window 2: 1000x1000 semi-transparent (touch insensitive)",
            "Window 2 will pass all touches through to Window 1",
            "Press Ctrl+C to exit...",
            "Event 0: SCREEN_EVENT_CREATE",
            "No events received (timeout)",
            "Event 1: SCREEN_EVENT_POINTER at (50, 75)",
        ]
    );
    // teardown ran on the way out
    assert_eq!(screen.live_windows(), 0);
    assert_eq!(screen.live_events(), 0);
    assert_eq!(screen.live_contexts(), 0);
}

#[test]
fn test_no_displays_still_composes() {
    let screen = HeadlessScreen::new();
    let running = AtomicBool::new(false);

    let mut out = Vec::new();
    let events = run_overlay(screen.clone(), &OverlayConfig::default(), &running, &mut out).unwrap();

    assert_eq!(events, 0);
    let output = lines(out);
    assert_eq!(output[0], "No displays found or error querying displays");
    assert_eq!(output[1], "Windows created successfully!");
    assert_eq!(screen.call_count("screen_create_window"), 2);
    assert_eq!(screen.call_count("screen_get_event"), 0);
}
