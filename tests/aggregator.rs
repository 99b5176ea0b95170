use std::sync::{Arc, Mutex};

use strata_input::controller::{
    AxisReadings, ControllerDevice, ControllerProbe, DeviceId, InputSource, MotionEvent,
};
use strata_input::error::HapticsError;
use strata_input::haptics::{HapticActuator, HapticCommand, HapticOutcome, HapticsRequest};
use strata_input::mapping::Action;
use strata_input::touch::{PointerSample, Position, TouchEvent, TouchPhase};
use strata_input::{Capabilities, InputAggregator, InputNotice, InputSettings};

#[derive(Default)]
struct RecordingActuator {
    played: Mutex<Vec<HapticCommand>>,
    fail: bool,
}

impl HapticActuator for RecordingActuator {
    fn has_actuator(&self) -> bool {
        true
    }

    fn play_waveform(&self, timings: &[u64]) -> Result<(), HapticsError> {
        if self.fail {
            return Err(HapticsError::Rejected("busy".to_string()));
        }
        self.played.lock().unwrap().push(HapticCommand::Waveform {
            timings: timings.to_vec(),
        });
        Ok(())
    }

    fn play_one_shot(&self, duration_ms: u64, amplitude: Option<u8>) -> Result<(), HapticsError> {
        if self.fail {
            return Err(HapticsError::Rejected("busy".to_string()));
        }
        self.played.lock().unwrap().push(HapticCommand::OneShot {
            duration_ms,
            amplitude,
        });
        Ok(())
    }
}

/// Roster that can change while the aggregator holds it
#[derive(Default)]
struct SwappableRoster {
    devices: Mutex<Vec<ControllerDevice>>,
}

impl ControllerProbe for SwappableRoster {
    fn controllers(&self) -> Vec<ControllerDevice> {
        self.devices.lock().unwrap().clone()
    }
}

fn with_controllers(controllers: Vec<ControllerDevice>) -> InputAggregator {
    InputAggregator::new(
        None,
        Capabilities {
            controllers: Arc::new(controllers),
            ..Default::default()
        },
    )
}

fn gamepad_event(axes: AxisReadings) -> MotionEvent {
    MotionEvent {
        source: InputSource::GAMEPAD,
        axes,
    }
}

fn begin(id: i32, x: f32, y: f32) -> TouchEvent {
    TouchEvent::Begin {
        id,
        position: Position::new(x, y),
    }
}

#[test]
fn snapshot_without_input_is_neutral() {
    let aggregator = InputAggregator::default();
    let snapshot = aggregator.query_snapshot();

    assert_eq!(snapshot.left_stick.x, 0.0);
    assert_eq!(snapshot.right_stick.y, 0.0);
    assert_eq!(snapshot.triggers.left, 0.0);
    assert!(!snapshot.buttons.jump && !snapshot.buttons.action && !snapshot.buttons.cancel);
    assert!(snapshot.touches.is_empty());
    assert!(snapshot.timestamp > 0);
}

#[test]
fn deadzone_and_sign_conventions() {
    let aggregator = InputAggregator::default();
    aggregator.ingest_motion(&gamepad_event(AxisReadings {
        x: 0.10,
        y: 0.30,
        z: 0.20,
        rz: -0.05,
        ..Default::default()
    }));

    let snapshot = aggregator.query_snapshot();
    assert_eq!(snapshot.left_stick.x, 0.0);
    assert_eq!(snapshot.left_stick.y, -0.30);
    assert_eq!(snapshot.right_stick.x, 0.20);
    assert_eq!(snapshot.right_stick.y, 0.0);
}

#[test]
fn triggers_pass_through_with_fallback() {
    let aggregator = InputAggregator::default();
    aggregator.ingest_motion(&gamepad_event(AxisReadings {
        rtrigger: 0.0,
        gas: 0.6,
        ltrigger: 0.05,
        ..Default::default()
    }));

    let snapshot = aggregator.query_snapshot();
    assert_eq!(snapshot.triggers.right, 0.6);
    // triggers are not deadzone-filtered
    assert_eq!(snapshot.triggers.left, 0.05);
}

#[test]
fn non_controller_motion_is_ignored() {
    let aggregator = InputAggregator::default();
    aggregator.ingest_motion(&MotionEvent {
        source: InputSource::TOUCHSCREEN,
        axes: AxisReadings {
            x: 0.9,
            ..Default::default()
        },
    });
    assert_eq!(aggregator.query_snapshot().left_stick.x, 0.0);
}

#[test]
fn touch_lifecycle() {
    let aggregator = InputAggregator::default();
    aggregator.ingest_touch(&begin(1, 10.0, 20.0));
    aggregator.ingest_touch(&begin(2, 30.0, 40.0));
    aggregator.ingest_touch(&TouchEvent::Move {
        pointers: vec![
            PointerSample {
                id: 1,
                position: Position::new(11.0, 21.0),
            },
            PointerSample {
                id: 9,
                position: Position::new(0.0, 0.0),
            },
        ],
    });

    let mut touches = aggregator.query_snapshot().touches;
    touches.sort_by_key(|t| t.id);
    assert_eq!(touches.len(), 2);
    assert_eq!(touches[0].phase, TouchPhase::Moved);
    assert_eq!(touches[0].position, Position::new(11.0, 21.0));
    assert_eq!(touches[1].phase, TouchPhase::Began);

    aggregator.ingest_touch(&TouchEvent::End { id: 2 });
    assert_eq!(aggregator.query_snapshot().touches.len(), 1);

    aggregator.ingest_touch(&TouchEvent::Cancel);
    assert!(aggregator.query_snapshot().touches.is_empty());
}

#[test]
fn move_after_end_does_not_resurrect_contact() {
    let aggregator = InputAggregator::default();
    aggregator.ingest_touch(&begin(4, 1.0, 1.0));
    aggregator.ingest_touch(&TouchEvent::End { id: 4 });
    aggregator.ingest_touch(&TouchEvent::Move {
        pointers: vec![PointerSample {
            id: 4,
            position: Position::new(2.0, 2.0),
        }],
    });
    assert!(aggregator.contact(4).is_none());
}

#[test]
fn repeated_queries_agree() {
    let aggregator = InputAggregator::default();
    aggregator.ingest_touch(&begin(1, 5.0, 5.0));
    aggregator.ingest_touch(&begin(2, 6.0, 6.0));
    aggregator.ingest_motion(&gamepad_event(AxisReadings {
        x: 0.7,
        y: -0.4,
        rtrigger: 0.3,
        ..Default::default()
    }));

    let first = aggregator.query_snapshot();
    let second = aggregator.query_snapshot();
    assert!(first.same_state(&second));
}

#[test]
fn bindings_are_bounded() {
    let aggregator = InputAggregator::default();
    aggregator.set_bindings("jump", &["a", "b", "c", "d", "e", "f"]);
    assert_eq!(
        aggregator.get_bindings(Action::Jump),
        vec!["a", "b", "c", "d", "e"]
    );

    let long = "x".repeat(40);
    aggregator.set_bindings("jump", &[long]);
    assert!(aggregator.get_bindings(Action::Jump).is_empty());
}

#[test]
fn partial_mapping_skips_unknown_keys() {
    let aggregator = InputAggregator::default();
    let forward = vec!["KeyI".to_string()];
    let bogus = vec!["KeyZ".to_string()];
    aggregator.set_input_mapping([
        ("moveForward", forward.as_slice()),
        ("teleport", bogus.as_slice()),
    ]);

    assert_eq!(aggregator.get_bindings(Action::MoveForward), vec!["KeyI"]);
    assert_eq!(aggregator.get_bindings(Action::Cancel), vec!["Escape"]);
}

#[test]
fn settings_bindings_are_validated_on_construction() {
    let mut settings = InputSettings::default();
    settings.bindings.insert(
        "action".to_string(),
        vec!["KeyF".to_string(), "y".repeat(50)],
    );
    settings
        .bindings
        .insert("dance".to_string(), vec!["KeyD".to_string()]);

    let aggregator = InputAggregator::new(Some(settings), Capabilities::default());
    assert_eq!(aggregator.get_bindings(Action::Action), vec!["KeyF"]);
}

#[test]
fn selecting_without_controllers_resets() {
    let aggregator = with_controllers(Vec::new());
    let result = aggregator.select_controller(0);

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("No controllers connected"));
    assert!(aggregator.selected_device().is_none());
}

#[test]
fn selecting_out_of_range_names_valid_range() {
    let aggregator = with_controllers(vec![
        ControllerDevice::new(3, "Pad A"),
        ControllerDevice::new(8, "Pad B"),
    ]);
    let result = aggregator.select_controller(5);

    assert!(!result.success);
    assert!(result.error.unwrap().contains("0-1"));
}

#[test]
fn listing_marks_selected_controller() {
    let aggregator = with_controllers(vec![
        ControllerDevice::new(3, "Pad A"),
        ControllerDevice::new(8, "Pad B"),
    ]);

    let list = aggregator.list_controllers();
    assert_eq!(list.selected_index, 0);
    assert!(list.controllers[0].is_selected);

    let result = aggregator.select_controller(1);
    assert!(result.success);
    assert_eq!(result.controller_id.as_deref(), Some("Pad B"));

    let list = aggregator.list_controllers();
    assert_eq!(list.selected_index, 1);
    assert_eq!(
        list.controllers.iter().filter(|c| c.is_selected).count(),
        1
    );
    assert!(list.controllers.iter().all(|c| c.has_extended_gamepad && !c.has_micro_gamepad));
}

#[test]
fn haptics_reach_the_actuator() {
    let actuator = Arc::new(RecordingActuator::default());
    let aggregator = InputAggregator::new(
        None,
        Capabilities {
            haptics: actuator.clone(),
            ..Default::default()
        },
    );

    aggregator.trigger_haptics(&HapticsRequest::custom(1.5, None));
    aggregator.haptics(&HapticsRequest::pattern([100, 50, 100]));
    aggregator.vibrate(Some(30));

    let played = actuator.played.lock().unwrap();
    assert_eq!(
        *played,
        vec![
            HapticCommand::OneShot {
                duration_ms: 50,
                amplitude: Some(255)
            },
            HapticCommand::Waveform {
                timings: vec![100, 50, 100]
            },
            HapticCommand::OneShot {
                duration_ms: 30,
                amplitude: None
            },
        ]
    );
}

#[test]
fn failing_actuator_still_resolves() {
    let actuator = Arc::new(RecordingActuator {
        fail: true,
        ..Default::default()
    });
    let aggregator = InputAggregator::new(
        None,
        Capabilities {
            haptics: actuator,
            ..Default::default()
        },
    );

    let outcome = aggregator.trigger_haptics(&HapticsRequest::intensity("light"));
    assert_eq!(
        outcome,
        HapticOutcome::ActuatorFailed(HapticCommand::OneShot {
            duration_ms: 10,
            amplitude: Some(50)
        })
    );
}

#[test]
fn teardown_clears_gamepad_and_touches() {
    let aggregator = InputAggregator::default();
    aggregator.ingest_touch(&begin(1, 1.0, 1.0));
    aggregator.ingest_motion(&gamepad_event(AxisReadings {
        x: 0.9,
        ..Default::default()
    }));

    aggregator.teardown();

    let snapshot = aggregator.query_snapshot();
    assert_eq!(snapshot.left_stick.x, 0.0);
    assert!(snapshot.touches.is_empty());
}

#[test]
fn control_hints_follow_attached_controllers() {
    let aggregator = with_controllers(vec![ControllerDevice::new(1, "Pad")]);
    assert_eq!(aggregator.control_hints().movement, "Left stick to move");
    assert!(aggregator.device_profile().has_gamepad);

    let aggregator = InputAggregator::default();
    assert_eq!(aggregator.control_hints().movement, "Drag to move");
}

#[tokio::test]
async fn notices_reach_subscribers() {
    let aggregator = with_controllers(vec![ControllerDevice::new(1, "Pad")]);
    let mut notices = aggregator.subscribe_notices();

    aggregator.notify_gamepad_connected(0, "Pad");
    aggregator.notify_gamepad_disconnected(0);
    aggregator.notify_device_change();

    assert_eq!(
        notices.recv().await.unwrap(),
        InputNotice::GamepadConnected {
            index: 0,
            id: "Pad".to_string()
        }
    );
    assert_eq!(
        notices.recv().await.unwrap(),
        InputNotice::GamepadDisconnected { index: 0 }
    );
    match notices.recv().await.unwrap() {
        InputNotice::DeviceChanged(profile) => assert!(profile.has_gamepad),
        other => panic!("unexpected notice: {other:?}"),
    }
}

#[tokio::test]
async fn gamepad_subscribers_wake_on_motion() {
    let aggregator = InputAggregator::default();
    let mut rx = aggregator.subscribe_gamepad();

    aggregator.ingest_motion(&gamepad_event(AxisReadings {
        z: 0.5,
        ..Default::default()
    }));

    rx.changed().await.unwrap();
    let latest = rx.borrow_and_update().clone();
    assert_eq!(latest.unwrap().right_stick_x, 0.5);
}

#[test]
fn notifying_without_subscribers_is_fine() {
    let aggregator = InputAggregator::default();
    aggregator.notify_gamepad_disconnected(3);
}

#[test]
fn unplugging_selected_pad_releases_motion_filter() {
    let roster = Arc::new(SwappableRoster::default());
    *roster.devices.lock().unwrap() = vec![
        ControllerDevice::new(3, "Pad A"),
        ControllerDevice::new(8, "Pad B"),
    ];
    let aggregator = InputAggregator::new(
        None,
        Capabilities {
            controllers: roster.clone(),
            ..Default::default()
        },
    );

    assert!(aggregator.select_controller(1).success);
    assert!(!aggregator.accepts_motion_from(DeviceId(3)));
    assert!(aggregator.accepts_motion_from(DeviceId(8)));

    *roster.devices.lock().unwrap() = vec![ControllerDevice::new(3, "Pad A")];

    let list = aggregator.list_controllers();
    assert_eq!(list.selected_index, 0);
    assert!(list.controllers[0].is_selected);
    assert!(aggregator.accepts_motion_from(DeviceId(3)));
}

#[tokio::test]
async fn snapshot_subscribers_get_normalized_state() {
    let aggregator = InputAggregator::default();
    let mut snapshots = aggregator.subscribe_snapshots();

    aggregator.ingest_motion(&gamepad_event(AxisReadings {
        x: 0.05,
        y: 0.5,
        ..Default::default()
    }));

    let snapshot = snapshots.changed().await.unwrap();
    assert_eq!(snapshot.left_stick.x, 0.0);
    assert_eq!(snapshot.left_stick.y, -0.5);

    aggregator.teardown();
    let snapshot = snapshots.changed().await.unwrap();
    assert_eq!(snapshot.left_stick.y, 0.0);
}
