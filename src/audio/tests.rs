use super::events::EventBook;
use super::listeners::ListenerSet;
use super::types::{Listener, MediaEvent};
use std::time::{Duration, Instant};

#[test]
fn emit_reaches_every_attached_listener() {
    let mut set = ListenerSet::new();
    let a = set.attach();
    let b = set.attach();
    assert_ne!(a.id(), b.id());

    set.emit(MediaEvent::PositionChanged(Duration::from_secs(3)));
    assert_eq!(
        a.try_recv(),
        Some(MediaEvent::PositionChanged(Duration::from_secs(3)))
    );
    assert_eq!(
        b.try_recv(),
        Some(MediaEvent::PositionChanged(Duration::from_secs(3)))
    );
    assert_eq!(a.try_recv(), None);
}

#[test]
fn detached_listener_receives_nothing_further() {
    let mut set = ListenerSet::new();
    let a = set.attach();
    set.detach(a.id());
    assert!(set.is_empty());

    set.emit(MediaEvent::Ended);
    assert_eq!(a.try_recv(), None);
}

#[test]
fn dropped_listener_is_pruned_on_emit() {
    let mut set = ListenerSet::new();
    let a = set.attach();
    let b = set.attach();
    drop(a);

    set.emit(MediaEvent::PlayStarted);
    assert_eq!(set.len(), 1);
    assert_eq!(b.try_recv(), Some(MediaEvent::PlayStarted));
}

fn drain(listener: &Listener) -> Vec<MediaEvent> {
    std::iter::from_fn(|| listener.try_recv()).collect()
}

fn book() -> (EventBook, Listener) {
    let mut book = EventBook::new(Duration::from_millis(250));
    let listener = book.attach();
    (book, listener)
}

#[test]
fn nothing_is_delivered_before_flush() {
    let (mut book, listener) = book();
    book.rebound(Ok(Some(Duration::from_secs(90))));
    assert!(drain(&listener).is_empty());

    book.flush();
    assert_eq!(
        drain(&listener),
        vec![MediaEvent::MetadataReady {
            duration: Some(Duration::from_secs(90))
        }]
    );
}

#[test]
fn ended_fires_once_per_binding() {
    let (mut book, listener) = book();
    book.rebound(Ok(None));
    book.ended();
    book.ended();
    book.flush();
    book.ended();
    book.flush();

    let ended = drain(&listener)
        .into_iter()
        .filter(|e| *e == MediaEvent::Ended)
        .count();
    assert_eq!(ended, 1);

    book.rebound(Ok(None));
    book.ended();
    book.flush();
    assert!(drain(&listener).contains(&MediaEvent::Ended));
}

#[test]
fn rebinding_discards_undelivered_events() {
    let (mut book, listener) = book();
    book.rebound(Ok(Some(Duration::from_secs(10))));
    book.position(Duration::from_secs(4));
    book.ended();

    book.rebound(Ok(Some(Duration::from_secs(20))));
    book.flush();

    assert_eq!(
        drain(&listener),
        vec![MediaEvent::MetadataReady {
            duration: Some(Duration::from_secs(20))
        }]
    );
}

#[test]
fn failed_load_is_reported_when_play_is_requested() {
    let (mut book, listener) = book();
    book.rebound(Err("failed to decode /music/broken.mp3".to_string()));

    assert!(!book.play_requested(false, Instant::now()));
    book.flush();
    assert_eq!(
        drain(&listener),
        vec![MediaEvent::PlayFailed(
            "failed to decode /music/broken.mp3".to_string()
        )]
    );
}

#[test]
fn play_without_a_binding_fails_with_a_generic_reason() {
    let (mut book, listener) = book();
    assert!(!book.play_requested(false, Instant::now()));
    book.flush();
    assert_eq!(
        drain(&listener),
        vec![MediaEvent::PlayFailed("no source bound".to_string())]
    );
}

#[test]
fn successful_load_clears_an_earlier_failure() {
    let (mut book, listener) = book();
    book.rebound(Err("gone".to_string()));
    book.rebound(Ok(None));

    assert!(book.play_requested(true, Instant::now()));
    book.flush();
    assert_eq!(
        drain(&listener),
        vec![
            MediaEvent::MetadataReady { duration: None },
            MediaEvent::PlayStarted
        ]
    );
}

#[test]
fn position_reports_respect_the_interval() {
    let (mut book, _listener) = book();
    let start = Instant::now();
    book.rebound(Ok(None));
    assert!(book.play_requested(true, start));

    assert!(!book.position_due(start + Duration::from_millis(100)));
    assert!(book.position_due(start + Duration::from_millis(250)));
    assert!(!book.position_due(start + Duration::from_millis(400)));
    assert!(book.position_due(start + Duration::from_millis(500)));
}

#[test]
fn first_position_after_a_rebind_is_due_immediately() {
    let (mut book, _listener) = book();
    let start = Instant::now();
    assert!(book.play_requested(true, start));
    assert!(!book.position_due(start));

    book.rebound(Ok(None));
    assert!(book.position_due(start));
}

#[test]
fn detached_listener_misses_later_events() {
    let (mut book, listener) = book();
    book.detach(listener.id());
    book.rebound(Ok(None));
    book.flush();
    assert!(drain(&listener).is_empty());
}
