//! Plays a pulse train through the horn on the default output device.
//!
//! Every two seconds the control thread swaps to the next factory patch.
//! Run with `cargo run --example live_horn --features cpal-demo`.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use horn_resonator::{
    control::{control_queue, HornMessage},
    patch::factory_patches,
    BufferLayout, HornResonator, MAX_BLOCK_SIZE, MAX_CHANNELS,
};
use std::{thread, time::Duration};

const PULSE_HZ: f32 = 110.0;
const PATCH_SECONDS: u64 = 2;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    let sample_rate = config.sample_rate().0 as f32;
    let device_channels = config.channels() as usize;
    let horn_channels = device_channels.min(MAX_CHANNELS);

    let patches = factory_patches();
    let (mut msg_tx, mut msg_rx) = control_queue(16);

    let mut horn = HornResonator::with_layout(BufferLayout::Interleaved);
    let report = horn.configure(
        sample_rate,
        horn_channels,
        MAX_BLOCK_SIZE,
        patches[0].geometry,
    );
    if report.any() {
        eprintln!("clamped on startup: {report}");
    }

    let mut phase = 0.0f32;
    let phase_inc = PULSE_HZ / sample_rate;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                horn.drain_messages(&mut msg_rx);

                let total_frames = data.len() / device_channels;
                let mut frames_written = 0;
                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    // One-sample clicks at PULSE_HZ
                    let buf = horn.host_buffer_mut().as_mut_slice();
                    for i in 0..frames {
                        phase += phase_inc;
                        let s = if phase >= 1.0 {
                            phase -= 1.0;
                            0.5
                        } else {
                            0.0
                        };
                        for ch in 0..horn_channels {
                            buf[i * horn_channels + ch] = s;
                        }
                    }

                    if horn.process_host_buffer(frames).is_err() {
                        data.fill(0.0);
                        return;
                    }

                    let out_off = frames_written * device_channels;
                    let buf = horn.host_buffer().as_slice();
                    for i in 0..frames {
                        for ch in 0..device_channels {
                            let src = ch.min(horn_channels - 1);
                            data[out_off + i * device_channels + ch] =
                                buf[i * horn_channels + src].clamp(-1.0, 1.0);
                        }
                    }
                    frames_written += frames;
                }
            },
            move |err| eprintln!("stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start stream")?;

    for patch in patches.iter().cycle().skip(1).take(patches.len() * 2) {
        thread::sleep(Duration::from_secs(PATCH_SECONDS));
        println!("-> {}", patch.name);
        if msg_tx.push(HornMessage::SetGeometry(patch.geometry)).is_err() {
            eprintln!("control queue full, skipping {}", patch.name);
        }
    }
    thread::sleep(Duration::from_secs(PATCH_SECONDS));

    Ok(())
}
