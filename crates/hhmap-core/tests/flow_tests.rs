use hhmap_core::*;
use hhmap_test_utils::{
    setup_test_app, tel_aviv_places, FixedGeolocation, RecordingMap, RecordingSink, ScriptedSource,
};
use pretty_assertions::assert_eq;

fn app_with(config: AppConfig) -> MapApp<RecordingMap> {
    MapApp::new(config, RecordingMap::new())
}

#[tokio::test]
async fn test_start_loads_then_centres_on_user() {
    let mut app = app_with(AppConfig::default());
    let source = ScriptedSource::new().then_ok(tel_aviv_places());
    let gps = FixedGeolocation::at(32.08, 34.78);

    let report = app.start(&source, Some(&gps)).await.unwrap();

    assert_eq!(report.accepted, 8);
    assert_eq!(report.mappable, 7);
    assert_eq!(app.markers().len(), 7);
    let user = app.user_marker().unwrap();
    assert_eq!(app.map().markers[&user].variant, MarkerVariant::UserLocation);
    assert_eq!(app.map().view, Some((Coordinates::new(32.08, 34.78), 17)));
    assert_eq!(app.locate_state(), LocateState::Idle);
}

#[tokio::test]
async fn test_start_survives_locate_failure() {
    let mut app = app_with(AppConfig::default());
    let source = ScriptedSource::new().then_ok(tel_aviv_places());
    let gps = FixedGeolocation::failing(GeolocationError::PermissionDenied);

    app.start(&source, Some(&gps)).await.unwrap();

    assert_eq!(app.store().len(), 8);
    assert!(app.user_marker().is_none());
    assert_eq!(app.locate_state(), LocateState::Idle);
    assert!(app.drain_notifications().is_empty());
}

#[tokio::test]
async fn test_start_reports_fetch_failure() {
    let mut app = setup_test_app();
    let source = ScriptedSource::new().then_err(FetchError::Status { status: 502 });

    let err = app
        .start(&source, None::<&FixedGeolocation>)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Fetch(FetchError::Status { status: 502 })));
    assert!(!app.store().is_loaded());
    assert_eq!(app.on_filter_change("all"), Reaction::Ignored);
}

#[tokio::test]
async fn test_relocate_replaces_user_marker() {
    let mut app = setup_test_app();

    app.locate_user(&FixedGeolocation::at(32.0, 34.0)).await.unwrap();
    let first = app.user_marker().unwrap();
    app.locate_user(&FixedGeolocation::at(32.1, 34.1)).await.unwrap();
    let second = app.user_marker().unwrap();

    assert_ne!(first, second);
    assert!(!app.map().markers[&first].attached);
    assert_eq!(
        app.map().attached_titles(MarkerVariant::UserLocation),
        vec!["Your Location".to_string()]
    );
}

#[tokio::test]
async fn test_locate_failure_notifies_under_notify_policy() {
    let mut app = app_with(
        AppConfig::default()
            .with_locate_on_start(false)
            .with_locate_failure(LocateFailurePolicy::Notify),
    );

    let err = app
        .locate_user(&FixedGeolocation::failing(GeolocationError::Timeout))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Geolocation(GeolocationError::Timeout)));
    let notes = app.drain_notifications();
    assert_eq!(notes, vec![Notification::error("Error: The Geolocation service failed.")]);
    assert_eq!(app.locate_state(), LocateState::Idle);
}

#[tokio::test]
async fn test_locate_rejected_while_outstanding() {
    let mut app = setup_test_app();
    app.begin_locate().unwrap();

    let err = app
        .locate_user(&FixedGeolocation::at(1.0, 1.0))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Geolocation(GeolocationError::Busy)));
    assert_eq!(app.locate_state(), LocateState::Locating);
    assert!(app.user_marker().is_none());
}

#[tokio::test]
async fn test_accepted_submission_resets_draft_and_marks_stale() {
    let mut app = setup_test_app();
    app.apply_places(Ok(tel_aviv_places())).unwrap();
    app.submission_mut()
        .set_draft(SubmissionDraft::update_of("Bellboy"));
    let sink = RecordingSink::accepting();

    app.submit(&sink).await.unwrap();

    assert_eq!(sink.received_count(), 1);
    assert_eq!(sink.received.lock()[0].existing_place, "Bellboy");
    assert_eq!(app.submission().draft(), &SubmissionDraft::default());
    assert!(app.is_stale());
    let notes = app.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Success);
}

#[tokio::test]
async fn test_rejected_submission_keeps_draft() {
    let mut app = setup_test_app();
    app.submission_mut()
        .set_draft(SubmissionDraft::new_place("בר", ""));
    let sink = RecordingSink::default().then(Ok(SubmissionResponse { success: false }));

    let err = app.submit(&sink).await.unwrap_err();

    assert!(matches!(err, AppError::Submit(SubmitError::Rejected)));
    assert_eq!(app.submission().draft().place_name_he, "בר");
    assert!(!app.submission().is_in_flight());
    assert!(!app.is_stale());
    assert_eq!(app.drain_notifications()[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_network_failure_keeps_draft_for_retry() {
    let mut app = setup_test_app();
    app.submission_mut()
        .set_draft(SubmissionDraft::new_place("", "Bar"));
    let sink = RecordingSink::default()
        .then(Err(SubmitError::Network("connection reset".into())))
        .then(Ok(SubmissionResponse { success: true }));

    assert!(app.submit(&sink).await.is_err());
    assert_eq!(app.submission().draft().place_name_en, "Bar");

    app.submit(&sink).await.unwrap();
    assert_eq!(sink.received_count(), 2);
    assert_eq!(app.submission().draft(), &SubmissionDraft::default());
}

#[tokio::test]
async fn test_invalid_form_never_reaches_sink() {
    let mut app = setup_test_app();
    app.apply_places(Ok(tel_aviv_places())).unwrap();
    app.submission_mut()
        .set_draft(SubmissionDraft::update_of("Nowhere"));
    let sink = RecordingSink::accepting();

    let err = app.submit(&sink).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Form(FormError::UnknownExistingPlace(_))
    ));
    assert_eq!(sink.received_count(), 0);
    assert_eq!(app.drain_notifications().len(), 1);
}

#[tokio::test]
async fn test_submit_and_refresh_refetches_places() {
    let mut app = setup_test_app();
    let source = ScriptedSource::new()
        .then_ok(tel_aviv_places())
        .then_ok({
            let mut more = tel_aviv_places();
            more.push(hhmap_test_utils::record(
                "Kuli Alma",
                Some("After 20:00"),
                Some((32.0633, 34.7745)),
            ));
            more
        });
    app.load_places(&source).await.unwrap();
    app.submission_mut()
        .set_draft(SubmissionDraft::new_place("", "Kuli Alma"));

    app.submit_and_refresh(&RecordingSink::accepting(), &source)
        .await
        .unwrap();

    assert_eq!(source.fetch_count(), 2);
    assert!(!app.is_stale());
    assert!(app.store().contains("Kuli Alma"));
    assert_eq!(app.markers().len(), 8);
}

#[tokio::test]
async fn test_refresh_disabled_leaves_places_stale() {
    let mut app = app_with(
        AppConfig::default()
            .with_locate_on_start(false)
            .with_refresh_after_submit(false),
    );
    let source = ScriptedSource::new().then_ok(tel_aviv_places());
    app.load_places(&source).await.unwrap();
    app.submission_mut()
        .set_draft(SubmissionDraft::new_place("", "Bar"));

    app.submit_and_refresh(&RecordingSink::accepting(), &source)
        .await
        .unwrap();

    assert_eq!(source.fetch_count(), 1);
    assert!(app.is_stale());
}
