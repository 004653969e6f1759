/// Microphone capture via cpal
///
/// Opens a mono input stream at the first sample rate the device accepts,
/// preferring i16 and falling back to f32 with conversion. The stream
/// callback pushes straight into the shared sample queue and never blocks
/// on anything but the queue mutex.

use crate::chunk::Sample;
use crate::sample_queue::SampleQueue;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Sample rates tried in order when opening the device.
pub const CANDIDATE_RATES: [u32; 3] = [16_000, 44_100, 48_000];

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No input device available")]
    NoInputDevice,

    #[error("Input device index {0} out of range ({1} devices)")]
    BadDeviceIndex(usize, usize),

    #[error("Failed to enumerate input devices: {0}")]
    Enumeration(String),

    #[error("Device accepted none of the candidate sample rates {0:?}")]
    DeviceUnavailable(Vec<u32>),
}

/// One row of `--list-devices` output.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub default: bool,
}

/// Enumerate input devices in host order.
pub fn list_input_devices() -> Result<Vec<DeviceInfo>, CaptureError> {
    let host = cpal::default_host();
    let default_name = host
        .default_input_device()
        .and_then(|d| d.name().ok());

    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::Enumeration(e.to_string()))?;

    let mut out = Vec::new();
    for (index, device) in devices.enumerate() {
        let name = device
            .name()
            .unwrap_or_else(|_| format!("<unnamed device {index}>"));
        let default = default_name.as_deref() == Some(name.as_str());
        out.push(DeviceInfo {
            index,
            name,
            default,
        });
    }
    Ok(out)
}

/// A running microphone stream feeding the shared sample queue.
///
/// cpal streams are not `Send`, so the capture handle stays on the thread
/// that created it; only the queue crosses threads.
pub struct MicCapture {
    stream: Option<cpal::Stream>,
    sample_rate: u32,
    queue: Arc<SampleQueue>,
}

impl MicCapture {
    /// Open the selected (or default) input device, trying each candidate
    /// rate until one sticks, and start capturing.
    pub fn start(
        device_index: Option<usize>,
        rates: &[u32],
        queue: Arc<SampleQueue>,
    ) -> Result<Self, CaptureError> {
        let host = cpal::default_host();

        let device = match device_index {
            Some(index) => {
                let devices: Vec<_> = host
                    .input_devices()
                    .map_err(|e| CaptureError::Enumeration(e.to_string()))?
                    .collect();
                let count = devices.len();
                devices
                    .into_iter()
                    .nth(index)
                    .ok_or(CaptureError::BadDeviceIndex(index, count))?
            }
            None => host
                .default_input_device()
                .ok_or(CaptureError::NoInputDevice)?,
        };

        let device_name = device.name().unwrap_or_else(|_| "<unnamed>".to_string());
        debug!(device = %device_name, "opening input device");

        for &rate in rates {
            let config = StreamConfig {
                channels: 1,
                sample_rate: SampleRate(rate),
                buffer_size: BufferSize::Default,
            };

            match Self::build_stream(&device, &config, Arc::clone(&queue)) {
                Ok(stream) => {
                    if let Err(e) = stream.play() {
                        warn!(rate, error = %e, "stream refused to start, trying next rate");
                        continue;
                    }
                    info!(device = %device_name, rate, "microphone capture started");
                    return Ok(Self {
                        stream: Some(stream),
                        sample_rate: rate,
                        queue,
                    });
                }
                Err(e) => {
                    debug!(rate, error = %e, "sample rate rejected");
                }
            }
        }

        Err(CaptureError::DeviceUnavailable(rates.to_vec()))
    }

    /// Build an i16 stream, falling back to f32 with conversion when the
    /// device will not do i16 natively.
    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        queue: Arc<SampleQueue>,
    ) -> Result<cpal::Stream, cpal::BuildStreamError> {
        let err_fn = |e| error!(error = %e, "input stream error");

        let i16_queue = Arc::clone(&queue);
        let i16_attempt = device.build_input_stream(
            config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                i16_queue.push(data);
            },
            err_fn,
            None,
        );

        match i16_attempt {
            Ok(stream) => Ok(stream),
            Err(cpal::BuildStreamError::StreamConfigNotSupported) => {
                debug!("i16 format not supported, converting from f32");
                let mut scratch: Vec<Sample> = Vec::new();
                device.build_input_stream(
                    config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        scratch.clear();
                        scratch.extend(
                            data.iter()
                                .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as Sample),
                        );
                        queue.push(&scratch);
                    },
                    err_fn,
                    None,
                )
            }
            Err(e) => Err(e),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn queue(&self) -> &Arc<SampleQueue> {
        &self.queue
    }

    /// Stop capturing. Idempotent; dropping the stream closes the device.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("microphone capture stopped");
        }
    }
}

impl Drop for MicCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
