// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Media player behavior against a scripted in-memory remote.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use samsungtv_lib::{
    Connector, DeviceConfig, DeviceError, DeviceEvent, Error, Key, MediaType, Method, PowerState,
    ProtocolError, Remote, SamsungTv, SupportedFeatures, TurnOnAction, TurnOnFuture, TurnOnStep,
    ValueError,
};
use tokio::time::Instant;

// ============================================================================
// Scripted remote
// ============================================================================

type Outcome = Box<dyn FnOnce() -> Result<(), ProtocolError> + Send>;

#[derive(Default)]
struct Script {
    connect_outcomes: VecDeque<Outcome>,
    control_outcomes: VecDeque<Outcome>,
    close_error: bool,
    connects: usize,
    closes: usize,
    keys: Vec<String>,
}

#[derive(Clone)]
struct FakeConnector {
    method: Method,
    script: Arc<Mutex<Script>>,
}

struct FakeRemote {
    script: Arc<Mutex<Script>>,
}

impl FakeConnector {
    fn new(method: Method) -> Self {
        Self {
            method,
            script: Arc::default(),
        }
    }

    fn on_connect(&self, outcome: impl FnOnce() -> Result<(), ProtocolError> + Send + 'static) {
        self.script
            .lock()
            .connect_outcomes
            .push_back(Box::new(outcome));
    }

    fn on_control(&self, outcome: impl FnOnce() -> Result<(), ProtocolError> + Send + 'static) {
        self.script
            .lock()
            .control_outcomes
            .push_back(Box::new(outcome));
    }

    fn fail_close(&self) {
        self.script.lock().close_error = true;
    }

    fn keys(&self) -> Vec<String> {
        self.script.lock().keys.clone()
    }

    fn connects(&self) -> usize {
        self.script.lock().connects
    }

    fn closes(&self) -> usize {
        self.script.lock().closes
    }
}

impl Connector for FakeConnector {
    type Remote = FakeRemote;

    async fn connect(&self) -> Result<FakeRemote, ProtocolError> {
        let outcome = {
            let mut script = self.script.lock();
            script.connects += 1;
            script.connect_outcomes.pop_front()
        };
        outcome.map_or(Ok(()), |f| f())?;
        Ok(FakeRemote {
            script: Arc::clone(&self.script),
        })
    }

    fn method(&self) -> Method {
        self.method
    }
}

impl Remote for FakeRemote {
    async fn control(&mut self, key: &Key) -> Result<(), ProtocolError> {
        let outcome = {
            let mut script = self.script.lock();
            script.keys.push(key.to_string());
            script.control_outcomes.pop_front()
        };
        outcome.map_or(Ok(()), |f| f())
    }

    async fn close(&mut self) -> Result<(), ProtocolError> {
        let mut script = self.script.lock();
        script.closes += 1;
        if script.close_error {
            return Err(ProtocolError::Io(io::ErrorKind::ConnectionReset.into()));
        }
        Ok(())
    }
}

fn io_error(kind: io::ErrorKind) -> impl FnOnce() -> Result<(), ProtocolError> + Send {
    move || Err(ProtocolError::Io(kind.into()))
}

fn tv(method: Method) -> (SamsungTv<FakeConnector>, FakeConnector) {
    let connector = FakeConnector::new(method);
    let config = DeviceConfig::new("fake").with_name("fake");
    (SamsungTv::new(connector.clone(), &config), connector)
}

/// Drives the TV to the off state through a failed poll.
async fn switch_off(tv: &SamsungTv<FakeConnector>, connector: &FakeConnector) {
    connector.on_connect(io_error(io::ErrorKind::ConnectionRefused));
    assert_eq!(tv.update().await, PowerState::Off);
}

#[derive(Debug, Default)]
struct CountingAction {
    runs: Arc<AtomicUsize>,
}

impl TurnOnAction for CountingAction {
    fn run(&self) -> TurnOnFuture<'_> {
        Box::pin(async move {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

#[derive(Debug)]
struct FailingAction;

impl TurnOnAction for FailingAction {
    fn run(&self) -> TurnOnFuture<'_> {
        Box::pin(async { Err(DeviceError::TurnOnFailed("plug offline".to_string())) })
    }
}

// ============================================================================
// Key delivery
// ============================================================================

mod send_key {
    use super::*;

    #[tokio::test]
    async fn sends_and_closes() {
        let (tv, connector) = tv(Method::WebSocket);

        tv.volume_up().await.unwrap();

        assert_eq!(connector.keys(), ["KEY_VOLUP"]);
        assert_eq!(connector.connects(), 1);
        assert_eq!(connector.closes(), 1);
        assert_eq!(tv.power_state(), PowerState::On);
    }

    #[tokio::test]
    async fn successful_key_turns_state_on() {
        let (tv, connector) = tv(Method::Legacy);
        switch_off(&tv, &connector).await;

        tv.volume_down().await.unwrap();

        assert_eq!(connector.keys(), ["KEY_VOLDOWN"]);
        assert_eq!(tv.power_state(), PowerState::On);
    }

    #[tokio::test]
    async fn connection_closed_is_retried_once() {
        let (tv, connector) = tv(Method::Legacy);
        connector.on_control(|| Err(ProtocolError::ConnectionClosed));

        tv.mute_volume(true).await.unwrap();

        assert_eq!(connector.keys(), ["KEY_MUTE", "KEY_MUTE"]);
        assert_eq!(connector.connects(), 2);
        // The dropped connection is discarded without closing it.
        assert_eq!(connector.closes(), 1);
        assert_eq!(tv.power_state(), PowerState::On);
    }

    #[tokio::test]
    async fn broken_pipe_exhausts_retries_and_stays_on() {
        let (tv, connector) = tv(Method::Legacy);
        switch_off(&tv, &connector).await;
        connector.on_control(io_error(io::ErrorKind::BrokenPipe));
        connector.on_control(io_error(io::ErrorKind::BrokenPipe));

        tv.volume_up().await.unwrap();

        assert_eq!(connector.keys().len(), 2);
        assert_eq!(connector.connects(), 3);
        assert_eq!(connector.closes(), 0);
        assert_eq!(tv.power_state(), PowerState::On);
    }

    #[tokio::test]
    async fn unhandled_response_reports_on() {
        let (tv, connector) = tv(Method::Legacy);
        switch_off(&tv, &connector).await;
        connector.on_control(|| Err(ProtocolError::UnhandledResponse("0b".to_string())));

        tv.volume_up().await.unwrap();

        assert_eq!(connector.keys(), ["KEY_VOLUP"]);
        assert_eq!(connector.closes(), 0);
        assert_eq!(tv.power_state(), PowerState::On);
    }

    #[tokio::test]
    async fn access_denied_reports_on() {
        let (tv, connector) = tv(Method::WebSocket);
        switch_off(&tv, &connector).await;
        connector.on_connect(|| Err(ProtocolError::AccessDenied));

        tv.volume_up().await.unwrap();

        assert!(connector.keys().is_empty());
        assert_eq!(tv.power_state(), PowerState::On);
    }

    #[tokio::test]
    async fn other_io_error_is_swallowed() {
        let (tv, connector) = tv(Method::Legacy);
        connector.on_connect(io_error(io::ErrorKind::HostUnreachable));

        tv.volume_up().await.unwrap();

        assert!(connector.keys().is_empty());
        assert_eq!(connector.connects(), 1);
        assert_eq!(connector.closes(), 0);
        assert_eq!(tv.power_state(), PowerState::On);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_abandons_remaining_keys() {
        let (tv, connector) = tv(Method::Legacy);
        connector.on_control(io_error(io::ErrorKind::TimedOut));

        tv.play_media(&MediaType::Channel, "576").await.unwrap();

        assert_eq!(connector.keys(), ["KEY_5"]);
    }
}

// ============================================================================
// Service calls
// ============================================================================

mod services {
    use super::*;

    #[tokio::test]
    async fn volume_and_mute_keys() {
        let (tv, connector) = tv(Method::WebSocket);

        tv.volume_up().await.unwrap();
        tv.volume_down().await.unwrap();
        tv.mute_volume(false).await.unwrap();

        assert_eq!(connector.keys(), ["KEY_VOLUP", "KEY_VOLDOWN", "KEY_MUTE"]);
        assert_eq!(connector.closes(), 3);
    }

    #[tokio::test]
    async fn playback_keys() {
        let (tv, connector) = tv(Method::WebSocket);

        tv.media_play().await.unwrap();
        assert!(tv.state().is_playing);
        tv.media_pause().await.unwrap();
        assert!(!tv.state().is_playing);
        tv.media_next_track().await.unwrap();
        tv.media_previous_track().await.unwrap();

        assert_eq!(
            connector.keys(),
            ["KEY_PLAY", "KEY_PAUSE", "KEY_CHUP", "KEY_CHDOWN"]
        );
    }

    #[tokio::test]
    async fn play_pause_toggles() {
        let (tv, connector) = tv(Method::WebSocket);

        tv.media_play_pause().await.unwrap();
        tv.media_play_pause().await.unwrap();

        assert_eq!(connector.keys(), ["KEY_PLAY", "KEY_PAUSE"]);
    }

    #[tokio::test]
    async fn select_source() {
        let (tv, connector) = tv(Method::WebSocket);

        tv.select_source("HDMI").await.unwrap();
        tv.select_source("TV").await.unwrap();

        assert_eq!(connector.keys(), ["KEY_HDMI", "KEY_TV"]);
    }

    #[tokio::test]
    async fn select_unknown_source_does_not_connect() {
        let (tv, connector) = tv(Method::WebSocket);

        let result = tv.select_source("INVALID").await;

        assert!(matches!(
            result,
            Err(Error::Value(ValueError::UnknownSource(s))) if s == "INVALID"
        ));
        assert_eq!(connector.connects(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn play_channel() {
        let (tv, connector) = tv(Method::WebSocket);
        let start = Instant::now();

        tv.play_media(&MediaType::Channel, "576").await.unwrap();

        assert_eq!(connector.keys(), ["KEY_5", "KEY_7", "KEY_6", "KEY_ENTER"]);
        assert_eq!(connector.connects(), 1);
        assert_eq!(connector.closes(), 1);
        // Three pauses between four keys, none after the last.
        assert_eq!(start.elapsed(), Duration::from_millis(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn play_sub_channel() {
        let (tv, connector) = tv(Method::Legacy);
        let start = Instant::now();

        tv.play_media(&"channel".into(), "2-4").await.unwrap();

        assert_eq!(
            connector.keys(),
            ["KEY_2", "KEY_PLUS100", "KEY_4", "KEY_ENTER"]
        );
        assert_eq!(connector.closes(), 1);
        assert_eq!(start.elapsed(), Duration::from_millis(3600));
    }

    #[tokio::test]
    async fn play_media_rejects_other_types() {
        let (tv, connector) = tv(Method::WebSocket);

        let result = tv.play_media(&MediaType::Url, "https://example.com").await;

        assert!(matches!(
            result,
            Err(Error::Value(ValueError::UnsupportedMediaType(t))) if t == "url"
        ));
        assert_eq!(connector.connects(), 0);
        assert_eq!(connector.closes(), 0);
    }

    #[tokio::test]
    async fn play_media_rejects_invalid_channels() {
        let (tv, connector) = tv(Method::WebSocket);

        for media_id in ["", "-4", "2-", "https://example.com", "4-2-1", "a1"] {
            let result = tv.play_media(&MediaType::Channel, media_id).await;
            assert!(
                matches!(result, Err(Error::Value(ValueError::InvalidChannel(_)))),
                "{media_id:?} should be rejected"
            );
        }

        assert!(connector.keys().is_empty());
        assert_eq!(connector.connects(), 0);
        assert_eq!(connector.closes(), 0);
    }
}

// ============================================================================
// Power
// ============================================================================

mod power {
    use super::*;

    #[tokio::test]
    async fn turn_off_websocket_sends_power() {
        let (tv, connector) = tv(Method::WebSocket);

        tv.turn_off().await.unwrap();

        assert_eq!(connector.keys(), ["KEY_POWER"]);
        assert_eq!(connector.closes(), 1);
        assert_eq!(tv.power_state(), PowerState::Off);
    }

    #[tokio::test]
    async fn turn_off_legacy_sends_power_off() {
        let (tv, connector) = tv(Method::Legacy);

        tv.turn_off().await.unwrap();

        assert_eq!(connector.keys(), ["KEY_POWEROFF"]);
        assert_eq!(tv.power_state(), PowerState::Off);
    }

    #[tokio::test]
    async fn turn_off_ignores_close_error() {
        let (tv, connector) = tv(Method::Legacy);
        connector.fail_close();

        tv.turn_off().await.unwrap();

        assert_eq!(connector.closes(), 1);
        assert_eq!(tv.power_state(), PowerState::Off);
    }

    #[tokio::test(start_paused = true)]
    async fn cooldown_suppresses_keys_and_polls() {
        let (tv, connector) = tv(Method::WebSocket);
        tv.turn_off().await.unwrap();
        let connects = connector.connects();

        tv.volume_up().await.unwrap();
        assert_eq!(tv.update().await, PowerState::Off);

        assert_eq!(connector.keys(), ["KEY_POWER"]);
        assert_eq!(connector.connects(), connects);

        tokio::time::advance(Duration::from_secs(16)).await;
        assert_eq!(tv.update().await, PowerState::On);
    }

    #[tokio::test]
    async fn turn_on_without_action_is_noop() {
        let (tv, connector) = tv(Method::WebSocket);
        switch_off(&tv, &connector).await;

        tv.turn_on().await.unwrap();

        assert_eq!(tv.supported_features(), SupportedFeatures::SAMSUNGTV);
        assert_eq!(tv.power_state(), PowerState::Off);
        assert!(connector.keys().is_empty());
    }

    #[tokio::test]
    async fn turn_on_runs_action_and_ends_cooldown() {
        let runs = Arc::new(AtomicUsize::new(0));
        let (tv, connector) = tv(Method::WebSocket);
        let tv = tv.with_turn_on_action(CountingAction {
            runs: Arc::clone(&runs),
        });
        tv.turn_off().await.unwrap();

        tv.turn_on().await.unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(tv.update().await, PowerState::On);
        assert_eq!(connector.keys(), ["KEY_POWER"]);
    }

    #[tokio::test]
    async fn turn_on_failure_is_reported() {
        let (tv, _connector) = tv(Method::WebSocket);
        let tv = tv.with_turn_on_action(FailingAction);

        assert!(matches!(
            tv.turn_on().await,
            Err(Error::Device(DeviceError::TurnOnFailed(_)))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn configured_on_action_adds_turn_on_feature() {
        let connector = FakeConnector::new(Method::WebSocket);
        let config = DeviceConfig::new("fake")
            .with_on_action(vec![TurnOnStep::Delay(Duration::from_millis(100))]);
        let tv = SamsungTv::new(connector, &config);

        assert_eq!(
            tv.supported_features(),
            SupportedFeatures::SAMSUNGTV | SupportedFeatures::TURN_ON
        );
        tv.turn_on().await.unwrap();
    }
}

// ============================================================================
// Polling
// ============================================================================

mod update {
    use super::*;

    #[tokio::test]
    async fn reachable_tv_is_on() {
        let (tv, connector) = tv(Method::WebSocket);

        assert_eq!(tv.update().await, PowerState::On);
        assert_eq!(connector.connects(), 1);
        assert_eq!(connector.closes(), 1);
    }

    #[tokio::test]
    async fn unreachable_tv_is_off_and_notifies() {
        let (tv, connector) = tv(Method::Legacy);
        let mut events = tv.subscribe();

        switch_off(&tv, &connector).await;

        assert_eq!(
            events.try_recv().unwrap(),
            DeviceEvent::StateChanged {
                host: "fake".to_string(),
                old: PowerState::On,
                new: PowerState::Off,
            }
        );
    }

    #[tokio::test]
    async fn timeout_is_off() {
        let (tv, connector) = tv(Method::Legacy);
        connector.on_connect(|| Err(ProtocolError::Timeout(1000)));

        assert_eq!(tv.update().await, PowerState::Off);
    }

    #[tokio::test]
    async fn unhandled_response_is_on() {
        let (tv, connector) = tv(Method::Legacy);
        switch_off(&tv, &connector).await;
        connector.on_connect(|| Err(ProtocolError::UnhandledResponse("0b".to_string())));

        assert_eq!(tv.update().await, PowerState::On);
    }

    #[tokio::test]
    async fn access_denied_requests_reauth_once() {
        let (tv, connector) = tv(Method::WebSocket);
        let mut events = tv.subscribe();
        connector.on_connect(|| Err(ProtocolError::AccessDenied));
        connector.on_connect(|| Err(ProtocolError::AccessDenied));

        assert_eq!(tv.update().await, PowerState::On);
        assert_eq!(tv.update().await, PowerState::On);

        assert_eq!(
            events.try_recv().unwrap(),
            DeviceEvent::ReauthRequired {
                host: "fake".to_string()
            }
        );
        assert!(events.try_recv().is_err());

        // A successful connection re-arms the request.
        assert_eq!(tv.update().await, PowerState::On);
        connector.on_connect(|| Err(ProtocolError::AccessDenied));
        tv.update().await;
        assert!(matches!(
            events.try_recv(),
            Ok(DeviceEvent::ReauthRequired { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn polling_task_updates_and_stops() {
        let (tv, connector) = tv(Method::Legacy);
        connector.on_connect(io_error(io::ErrorKind::ConnectionRefused));
        let tv = Arc::new(tv);

        let handle = tv.spawn_polling(Duration::from_secs(10)).unwrap();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(tv.power_state(), PowerState::Off);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(tv.power_state(), PowerState::On);
        assert_eq!(connector.connects(), 2);

        drop(tv);
        tokio::time::sleep(Duration::from_secs(10)).await;
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn polling_rejects_zero_interval() {
        let (tv, connector) = tv(Method::Legacy);
        let tv = Arc::new(tv);

        let result = tv.spawn_polling(Duration::ZERO);

        assert!(matches!(result, Err(Error::Value(ValueError::ZeroInterval))));
        tokio::task::yield_now().await;
        assert_eq!(connector.connects(), 0);
    }
}

// ============================================================================
// Entity state
// ============================================================================

#[tokio::test]
async fn state_snapshot() {
    let (tv, _connector) = tv(Method::WebSocket);

    let state = tv.state();

    assert_eq!(state.state, PowerState::On);
    assert_eq!(state.friendly_name, "fake");
    assert_eq!(state.device_class, "tv");
    assert_eq!(state.source_list, ["TV", "HDMI"]);
    assert_eq!(state.supported_features.bits(), 20281);
    assert_eq!(tv.name(), "fake");
    assert_eq!(tv.method(), Method::WebSocket);
}
