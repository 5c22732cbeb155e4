//! MediaPipe face mesh landmark detector on ONNX Runtime.
//!
//! The model takes a 192x192 RGB crop normalized to [-1, 1] in NCHW layout
//! and returns 468 `(x, y, z)` points in crop pixel units. A face-presence
//! logit, when the graph exports one, gates the result.

use std::path::Path;
use std::sync::Mutex;

use image::imageops::{self, FilterType};
use image::RgbImage;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};
use tracing::{debug, info};

use facepaint_models::{Landmark, LandmarkSet, LANDMARK_COUNT};

use crate::detector::LandmarkDetector;
use crate::error::{MediaError, MediaResult};

/// Model input side in pixels.
pub const INPUT_SIZE: u32 = 192;

const LANDMARK_OUTPUT: &str = "output";
const PRESENCE_THRESHOLD: f32 = 0.5;

/// Square region of the source image fed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CropRect {
    /// Largest centered square inside a `width x height` image.
    pub fn centered(width: u32, height: u32) -> Self {
        let size = width.min(height);
        Self {
            x: (width - size) / 2,
            y: (height - size) / 2,
            size,
        }
    }
}

/// ONNX Runtime wrapper for the face mesh model.
///
/// There is no face detection stage in front of the mesh: the model sees
/// the largest centered square of the frame. Landmarks are only reliable
/// for roughly centered portraits; faces near the frame edge or small in
/// a wide shot come back misplaced or as no face.
pub struct FaceMeshDetector {
    session: Mutex<Session>,
}

impl FaceMeshDetector {
    pub fn load(model_path: &Path) -> MediaResult<Self> {
        if !model_path.exists() {
            return Err(MediaError::model_not_found(model_path.display().to_string()));
        }

        let model_bytes = std::fs::read(model_path)
            .map_err(|e| MediaError::detection_failed(format!("ORT read model file: {e}")))?;

        let session = Session::builder()
            .map_err(|e| MediaError::detection_failed(format!("ORT session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| MediaError::detection_failed(format!("ORT opt level: {e}")))?
            .commit_from_memory(model_bytes.as_slice())
            .map_err(|e| MediaError::detection_failed(format!("ORT load model: {e}")))?;

        info!(model_path = %model_path.display(), "Face mesh detector initialized");

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    fn run(&self, image: &RgbImage) -> MediaResult<Option<LandmarkSet>> {
        let (width, height) = image.dimensions();
        if width < 8 || height < 8 {
            return Ok(None);
        }

        let crop = CropRect::centered(width, height);
        let tensor = to_chw_tensor(image, &crop)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| MediaError::detection_failed("ORT session poisoned"))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| MediaError::detection_failed(format!("ORT run failed: {e}")))?;

        for (name, value) in outputs.iter() {
            if name == LANDMARK_OUTPUT {
                continue;
            }
            if let Ok((_, data)) = value.try_extract_tensor::<f32>() {
                if let [logit] = data {
                    let presence = sigmoid(*logit);
                    if presence < PRESENCE_THRESHOLD {
                        debug!(presence, "Face mesh reports no face");
                        return Ok(None);
                    }
                }
            }
        }

        let output = outputs
            .get(LANDMARK_OUTPUT)
            .ok_or_else(|| MediaError::detection_failed("ORT returned no landmark output"))?;
        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| MediaError::detection_failed(format!("ORT extract: {e}")))?;

        let dims: Vec<i64> = shape.iter().copied().collect();
        let points = extract_landmarks(&dims, data, &crop, width, height)?;
        let set = LandmarkSet::new(points)
            .map_err(|e| MediaError::detection_failed(format!("Invalid mesh output: {e}")))?;
        Ok(Some(set))
    }
}

impl LandmarkDetector for FaceMeshDetector {
    fn detect(&self, image: &RgbImage) -> MediaResult<Option<LandmarkSet>> {
        self.run(image)
    }

    fn name(&self) -> &str {
        "face-mesh"
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Crop, resize to the model input and normalize to [-1, 1] NCHW.
fn to_chw_tensor(image: &RgbImage, crop: &CropRect) -> MediaResult<Value> {
    let cropped = imageops::crop_imm(image, crop.x, crop.y, crop.size, crop.size).to_image();
    let resized = imageops::resize(&cropped, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let side = INPUT_SIZE as usize;
    let mut chw = Vec::with_capacity(3 * side * side);
    for c in 0..3 {
        for px in resized.pixels() {
            chw.push(px.0[c] as f32 / 255.0 * 2.0 - 1.0);
        }
    }

    let shape = vec![1usize, 3, side, side];
    Tensor::from_array((shape, chw.into_boxed_slice()))
        .map(Value::from)
        .map_err(|e| MediaError::detection_failed(format!("ORT tensor: {e}")))
}

/// Turn raw model output into landmarks normalized to the full image.
///
/// Accepts `[1, 468, 3]`, `[468, 3]` and the flat `[1, 1404]` layout.
pub fn extract_landmarks(
    shape: &[i64],
    data: &[f32],
    crop: &CropRect,
    width: u32,
    height: u32,
) -> MediaResult<Vec<Landmark>> {
    let stride = match shape {
        [1, n, d] | [n, d] if *n as usize == LANDMARK_COUNT => *d as usize,
        [1, flat] if *flat as usize == LANDMARK_COUNT * 3 => 3,
        _ => {
            return Err(MediaError::detection_failed(format!(
                "Unexpected face mesh output shape: {shape:?}"
            )))
        }
    };

    if stride < 3 || data.len() < LANDMARK_COUNT * stride {
        return Err(MediaError::detection_failed(
            "Face mesh output missing Z channel",
        ));
    }

    let scale = crop.size as f32 / INPUT_SIZE as f32;
    let points = data
        .chunks(stride)
        .take(LANDMARK_COUNT)
        .map(|p| {
            let x = crop.x as f32 + p[0] * scale;
            let y = crop.y as f32 + p[1] * scale;
            Landmark::new(x / width as f32, y / height as f32, p[2] / INPUT_SIZE as f32)
        })
        .collect();

    Ok(points)
}
