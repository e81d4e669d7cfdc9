use anyhow::{Context, Result};
use log::info;
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};

use float_overlay::Frame;
use float_overlay::pipeline::FrameSource;

/// Blocking camera capture via nokhwa. One frame per `grab`; the device is
/// torn down and re-created on `reopen`.
pub struct CameraSource {
    camera: Camera,
    device_index: u32,
    width: u32,
    height: u32,
}

impl CameraSource {
    pub fn open(device_index: u32, width: u32, height: u32) -> Result<Self> {
        let camera = open_camera(device_index, width, height)?;
        Ok(CameraSource {
            camera,
            device_index,
            width,
            height,
        })
    }
}

fn open_camera(device_index: u32, width: u32, height: u32) -> Result<Camera> {
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
        CameraFormat::new(Resolution::new(width, height), FrameFormat::MJPEG, 30),
    ));

    let mut camera = Camera::new(CameraIndex::Index(device_index), requested)
        .with_context(|| format!("failed to open camera {}", device_index))?;
    camera
        .open_stream()
        .context("failed to open camera stream")?;

    info!(
        "Camera opened: {} ({}x{})",
        camera.info().human_name(),
        camera.resolution().width(),
        camera.resolution().height()
    );

    Ok(camera)
}

impl FrameSource for CameraSource {
    fn grab(&mut self) -> Result<Frame> {
        let buffer = self.camera.frame().context("failed to capture frame")?;
        let frame = buffer
            .decode_image::<RgbFormat>()
            .context("failed to decode captured frame")?;
        Ok(frame)
    }

    fn reopen(&mut self) -> Result<()> {
        let _ = self.camera.stop_stream();
        self.camera = open_camera(self.device_index, self.width, self.height)?;
        Ok(())
    }
}
