//! Tests for waveform streaming and power limiting

mod common;

use common::*;
use std::time::Duration;
use tokio::time::Instant;

fn player() -> Player<RecordingTransport> {
    Player::new(RecordingTransport::new(), PowerConfig::default())
}

#[tokio::test(start_paused = true)]
async fn test_default_session_streams_both_channels() {
    let library = WaveformLibrary::builtin();
    let audio = library.lookup(DGLABS, "AudioBase").unwrap();
    let grain = library.lookup(DGLABS, "GrainTouch").unwrap();

    let mut player = player();
    let started = Instant::now();
    let ticks = player.play(Some(audio), Some(grain), Playback::Once).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(ticks, 12);
    // first tick fires immediately
    assert!(elapsed >= Duration::from_millis(1100), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(1200), "elapsed {:?}", elapsed);

    let transport = player.into_transport();
    assert_eq!(transport.writes().len(), 24);
    assert_eq!(transport.frames_for(Characteristic::WaveformA), vec![frame("210108"); 12]);
    let expected: Vec<[u8; 3]> = GRAIN_TOUCH_CAPTURE.iter().map(|h| frame(h)).collect();
    assert_eq!(transport.frames_for(Characteristic::WaveformB), expected);
    // A then B within each tick
    assert_eq!(transport.writes()[0].characteristic, Characteristic::WaveformA);
    assert_eq!(transport.writes()[1].characteristic, Characteristic::WaveformB);
}

#[tokio::test(start_paused = true)]
async fn test_cycles_loop_each_channel_independently() {
    let short = Waveform::from_params(&[(1, 1, 1), (1, 2, 2)]);
    let long = Waveform::from_params(&[(1, 10, 1), (1, 20, 1), (1, 30, 1)]);

    let mut player = player();
    let ticks = player.play(Some(&short), Some(&long), Playback::Cycles(2)).await.unwrap();
    assert_eq!(ticks, 6);

    let a: Vec<u16> = player
        .transport()
        .frames_for(Characteristic::WaveformA)
        .iter()
        .map(|f| WaveformStep::decode_from_bytes(f).y())
        .collect();
    assert_eq!(a, vec![1, 2, 1, 2, 1, 2]);
    let b: Vec<u16> = player
        .transport()
        .frames_for(Characteristic::WaveformB)
        .iter()
        .map(|f| WaveformStep::decode_from_bytes(f).y())
        .collect();
    assert_eq!(b, vec![10, 20, 30, 10, 20, 30]);
}

#[tokio::test(start_paused = true)]
async fn test_clear_between_sessions() {
    let library = WaveformLibrary::builtin();
    let audio = library.lookup(DGLABS, "AudioBase").unwrap();
    let medium = library.lookup(LTX4JAY, "MediumWave").unwrap();

    let mut transport = RecordingTransport::new();
    transport.write(Characteristic::Power, frame("af7805")).await.unwrap();
    transport.clear();
    assert!(transport.writes().is_empty());

    let mut player = Player::new(transport, PowerConfig::default());
    player.play(Some(audio), None, Playback::Once).await.unwrap();
    assert_eq!(player.transport().writes().len(), 1);

    let mut transport = player.into_transport();
    transport.clear();
    let mut player = Player::new(transport, PowerConfig::default());
    player.play(None, Some(medium), Playback::Once).await.unwrap();
    let transport = player.into_transport();
    assert!(transport.frames_for(Characteristic::WaveformA).is_empty());
    assert_eq!(transport.frames_for(Characteristic::WaveformB).len(), 15);
}

#[tokio::test]
async fn test_clear_resets_failure_limit() {
    let mut transport = RecordingTransport::failing_after(1);
    transport.write(Characteristic::Power, frame("000000")).await.unwrap();
    assert!(transport.write(Characteristic::Power, frame("000000")).await.is_err());
    transport.clear();
    transport.write(Characteristic::Power, frame("af7805")).await.unwrap();
    assert_eq!(transport.frames_for(Characteristic::Power), vec![frame("af7805")]);
}

#[tokio::test(start_paused = true)]
async fn test_single_channel_playback() {
    let library = WaveformLibrary::builtin();
    let medium = library.lookup(LTX4JAY, "MediumWave").unwrap();
    let mut player = player();
    let ticks = player.play(None, Some(medium), Playback::Once).await.unwrap();
    assert_eq!(ticks, 15);
    assert!(player.transport().frames_for(Characteristic::WaveformA).is_empty());
    assert_eq!(player.transport().frames_for(Characteristic::WaveformB).len(), 15);
}

#[tokio::test(start_paused = true)]
async fn test_forever_runs_until_dropped() {
    let library = WaveformLibrary::builtin();
    let audio = library.lookup(DGLABS, "AudioBase").unwrap();
    let mut player = player();

    let result = tokio::time::timeout(
        Duration::from_millis(1050),
        player.play(Some(audio), None, Playback::Forever),
    )
    .await;
    assert!(result.is_err(), "Forever playback should not finish on its own");
    assert_eq!(player.transport().frames_for(Characteristic::WaveformA).len(), 11);
}

#[tokio::test(start_paused = true)]
async fn test_custom_tick() {
    let library = WaveformLibrary::builtin();
    let slow = library.lookup(LTX4JAY, "SlowWave").unwrap();
    let mut player = player().with_tick(Duration::from_millis(50));
    let started = Instant::now();
    player.play(Some(slow), None, Playback::Once).await.unwrap();
    assert_eq!(started.elapsed(), Duration::from_millis(17 * 50));
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_stops_playback() {
    let library = WaveformLibrary::builtin();
    let grain = library.lookup(DGLABS, "GrainTouch").unwrap();
    let mut player = Player::new(RecordingTransport::failing_after(3), PowerConfig::default());

    let result = player.play(Some(grain), None, Playback::Forever).await;
    assert!(matches!(result, Err(CoyoteError::Transport(_))), "got {:?}", result);
    assert_eq!(player.transport().writes().len(), 3);
}

#[tokio::test]
async fn test_set_power_writes_power_characteristic() {
    let mut player = player();
    let sent = player.set_power(25, 25).await.unwrap();
    assert_eq!(sent.channel_a(), 175);
    assert_eq!(sent.channel_b(), 175);
    assert_eq!(player.transport().frames_for(Characteristic::Power), vec![frame("af7805")]);
}

#[tokio::test]
async fn test_ceiling_clamps_power() {
    init_tracing();
    let mut player = player().with_ceiling(30);
    let sent = player.set_power(80, 10).await.unwrap();
    assert_eq!(sent.levels(player.config()), (30, 10));

    player.set_ceiling(100);
    let sent = player.set_power(200, 100).await.unwrap();
    assert_eq!(sent.levels(player.config()), (100, 100));
    assert_eq!(sent.channel_a(), 700);
}

#[test]
fn test_battery_level() {
    assert_eq!(battery_level(&[87]).unwrap(), 87);
    assert_eq!(battery_level(&[0xFF, 0x00]).unwrap(), MAX_BATTERY_PERCENT);
    assert_eq!(battery_level(&[101]).unwrap(), 100);
    assert!(matches!(
        battery_level(&[]),
        Err(CoyoteError::InsufficientData { expected: 1, actual: 0 })
    ));
}
