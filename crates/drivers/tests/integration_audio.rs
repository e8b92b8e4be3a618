//! Audio integration tests: speaker amplifier and PA reset working together.
// Integration test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
//!
//! Drives the amplifier through the same call order the sound core uses
//! around a playback stream, both against the mock amplifier and against the
//! real FS1599 sequences over an I2C register file.
//!
//! Run with: cargo test -p drivers --test integration_audio

use drivers::audio::amp::fs1599::{registers, AmpConfig};
use drivers::audio::amp::AmpDriver;
use drivers::audio::{Fs1599, MockAmp, RegEntry, Scene, SceneTables, SpeakerPaReset};
use drivers::DriverError;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use platform::config::I2cAddresses;
use platform::mocks::{MockDelay, MockPinctrl, MockRegisterFile, MockRegmap};
use platform::{DeviceNode, I2cRegmap, PinctrlHandle, PinctrlState, Property};

type PaReset = SpeakerPaReset<NoopRawMutex, MockPinctrl>;

/// Stream start as the sound core does it: PA out of reset, then amp on.
async fn stream_start<A: AmpDriver, P: PinctrlHandle>(
    amp: &mut A,
    pa: &SpeakerPaReset<NoopRawMutex, P>,
) -> Result<(), DriverError>
where
    A::Error: Into<DriverError>,
{
    pa.set(true).await?;
    amp.start_up().await.map_err(Into::into)
}

/// Stream stop: mute, amp off, PA back into reset.
async fn stream_stop<A: AmpDriver, P: PinctrlHandle>(
    amp: &mut A,
    pa: &SpeakerPaReset<NoopRawMutex, P>,
) -> Result<(), DriverError>
where
    A::Error: Into<DriverError>,
{
    amp.set_mute(true).await.map_err(Into::into)?;
    amp.shut_down().await.map_err(Into::into)?;
    pa.set(false).await
}

static PA_PROPS: [Property<'static>; 1] = [Property::new("audio-reset-pin", &[0x7])];

async fn probed_pa() -> (PaReset, MockPinctrl) {
    let pa = PaReset::new();
    let pin = MockPinctrl::new();
    let handle = pin.clone();
    let node = DeviceNode::new("lct_pinctrl", "longcheer,lct_pinctrl", &PA_PROPS);
    pa.probe(&node, |_| Ok(handle)).await.expect("PA probe");
    (pa, pin)
}

fn tables() -> SceneTables {
    let mut t = SceneTables::new();
    t.add(Scene::Common, &[RegEntry::new(registers::GAINCTRL, 0x0100)])
        .unwrap();
    t.add(Scene::Music, &[RegEntry::new(registers::BSGCTRL, 0x0005)])
        .unwrap();
    t
}

#[tokio::test]
async fn test_stream_cycle_with_mock_amp() {
    let (pa, pin) = probed_pa().await;
    let mut amp = MockAmp::new();
    amp.reg_init().await.unwrap();

    stream_start(&mut amp, &pa).await.unwrap();
    assert!(amp.is_enabled());
    assert_eq!(pin.current(), Some(PinctrlState::Active));

    stream_stop(&mut amp, &pa).await.unwrap();
    assert!(!amp.is_enabled());
    assert!(amp.muted);
    assert_eq!(pin.current(), Some(PinctrlState::Sleep));
}

#[tokio::test]
async fn test_amp_failure_leaves_pa_enabled_for_caller_to_handle() {
    let (pa, pin) = probed_pa().await;
    let mut amp = MockAmp::new();
    amp.fail_next = Some(DriverError::Io);
    assert_eq!(stream_start(&mut amp, &pa).await, Err(DriverError::Io));
    assert_eq!(pin.current(), Some(PinctrlState::Active));
}

#[tokio::test]
async fn test_stream_before_pa_probe_is_rejected() {
    let pa = PaReset::new();
    let mut amp = MockAmp::new();
    assert_eq!(
        stream_start(&mut amp, &pa).await,
        Err(DriverError::InvalidArgument)
    );
    assert_eq!(amp.start_count, 0, "amp must not start without the PA");
}

#[tokio::test]
async fn test_fs1599_full_cycle_on_register_map() {
    let (pa, _) = probed_pa().await;
    let mut map = MockRegmap::new();
    map.set(registers::CHIPINI, 0x0003);
    let mut amp = Fs1599::new(map, MockDelay::new(), AmpConfig::with_tables(tables()));

    amp.reg_init().await.unwrap();
    stream_start(&mut amp, &pa).await.unwrap();
    assert_eq!(amp.regmap().get(registers::SYSCTRL), registers::SYSCTRL_AMP_ON);
    assert_eq!(amp.regmap().get(registers::BSGCTRL), 0x0005);
    // firmware switched low-noise mode on during playback
    amp.regmap_mut().set(registers::LNMCTRL, 0x8005);

    stream_stop(&mut amp, &pa).await.unwrap();
    let regs = amp.regmap();
    assert_eq!(regs.get(registers::SYSCTRL), 0);
    assert_eq!(regs.get(registers::PWRCTRL), registers::PWRCTRL_POWER_DOWN);
    assert_eq!(regs.get(registers::LNMCTRL), 0x0005);
    assert!(!amp.is_enabled());
    assert_eq!(regs.get(registers::ACCKEY), registers::ACCKEY_LOCK);
    assert_eq!(amp.state().cur_scene, None);
}

#[tokio::test]
async fn test_fs1599_registers_are_big_endian_on_the_wire() {
    let bus = MockRegisterFile::new(I2cAddresses::FS1599_AMP);
    // CHIPINI reads 0x0003 as [0x00, 0x03]
    bus.set(registers::CHIPINI, 0x00);
    bus.set(registers::CHIPINI + 1, 0x03);
    let regmap = I2cRegmap::new(bus.clone(), I2cAddresses::FS1599_AMP);
    let mut amp = Fs1599::new(regmap, MockDelay::new(), AmpConfig::default());

    amp.i2c_reset().await.unwrap();
    let writes = bus.writes();
    // reset (0x0002) then release (0x0001), each as reg, hi, lo
    assert_eq!(
        writes,
        vec![
            (registers::PWRCTRL, 0x00),
            (registers::PWRCTRL + 1, 0x02),
            (registers::PWRCTRL, 0x00),
            (registers::PWRCTRL + 1, 0x01),
        ]
    );
}

#[tokio::test]
async fn test_fs1599_absent_chip_times_out() {
    let bus = MockRegisterFile::new(I2cAddresses::FS1599_AMP);
    bus.set_present(false);
    let regmap = I2cRegmap::new(bus, I2cAddresses::FS1599_AMP);
    let mut amp = Fs1599::new(regmap, MockDelay::new(), AmpConfig::default());

    assert_eq!(amp.reg_init().await, Err(DriverError::Timeout));
    assert!(!amp.state().initialized);
    let (_regmap, delay) = amp.release();
    assert_eq!(delay.waits_ms(), vec![15; 5]);
    assert_eq!(delay.total_ms(), 75);
}
