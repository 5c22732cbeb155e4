//! Makeup handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, info};
use validator::Validate;

use facepaint_media::{codec, MediaError};
use facepaint_models::{
    ApplyBase64Request, ColorInfo, EffectConfig, Landmark, LandmarkSet, ProcessResponse,
};

use crate::error::{ApiError, ApiResult};
use crate::middleware::PROCESSING_TIME_HEADER;
use crate::state::AppState;

/// Available lipstick colors, blush colors and foundation presets.
pub async fn get_colors(State(state): State<AppState>) -> Json<ColorInfo> {
    Json(ColorInfo::from_catalog(&state.catalog))
}

/// Where the request image comes from.
enum ImageInput {
    Bytes(Vec<u8>),
    Base64(String),
}

/// How the processed image goes back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    DataUri,
    Png,
}

enum Encoded {
    DataUri(String),
    Png(Vec<u8>),
}

/// Result of a blocking makeup job.
struct Processed {
    status: String,
    image: Option<Encoded>,
}

/// Decode, detect and composite on the blocking pool.
async fn process(
    state: &AppState,
    input: ImageInput,
    landmarks: Option<Vec<Landmark>>,
    config: EffectConfig,
    delivery: Delivery,
) -> ApiResult<Processed> {
    let detector = match (&landmarks, &state.detector) {
        (Some(_), _) => None,
        (None, Some(detector)) => Some(Arc::clone(detector)),
        (None, None) => {
            return Err(ApiError::DetectorUnavailable(
                "no landmarks supplied and no server-side detector is configured".to_string(),
            ))
        }
    };
    let pipeline = Arc::clone(&state.pipeline);

    let job = move || -> ApiResult<Processed> {
        let image = match input {
            ImageInput::Bytes(bytes) => codec::decode_image(&bytes)?,
            ImageInput::Base64(payload) => codec::decode_base64_image(&payload)?,
        };
        debug!(width = image.width(), height = image.height(), "Decoded image");

        let outcome = match (landmarks, detector) {
            (Some(points), _) => {
                let set = LandmarkSet::new(points).map_err(MediaError::from)?;
                pipeline.apply_effects(&image, Some(&set), &config)?
            }
            (None, Some(detector)) => pipeline.process(&image, detector.as_ref(), &config)?,
            (None, None) => return Err(ApiError::internal("detector disappeared")),
        };

        if !outcome.face_found() {
            return Ok(Processed {
                status: outcome.summary(),
                image: None,
            });
        }

        let encoded = match delivery {
            Delivery::DataUri => Encoded::DataUri(codec::encode_png_data_uri(&outcome.image)?),
            Delivery::Png => Encoded::Png(codec::encode_png(&outcome.image)?),
        };

        Ok(Processed {
            status: outcome.summary(),
            image: Some(encoded),
        })
    };

    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ApiError::internal(format!("Makeup task failed: {e}")))?
}

fn respond(processed: Processed, started: Instant) -> Response {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(status = %processed.status, elapsed_ms, "Makeup request processed");

    match processed.image {
        None => Json(ProcessResponse::no_face(elapsed_ms)).into_response(),
        Some(Encoded::DataUri(uri)) => {
            Json(ProcessResponse::applied(uri, processed.status, elapsed_ms)).into_response()
        }
        Some(Encoded::Png(png)) => {
            let mut response = (StatusCode::OK, png).into_response();
            let headers = response.headers_mut();
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
            headers.insert(
                HeaderName::from_static(PROCESSING_TIME_HEADER),
                HeaderValue::from(elapsed_ms),
            );
            response
        }
    }
}

/// Multipart form of `POST /api/makeup/apply`.
#[derive(Default)]
struct MakeupForm {
    file: Option<Vec<u8>>,
    config: EffectConfig,
    landmarks: Option<Vec<Landmark>>,
    return_base64: Option<bool>,
}

impl MakeupForm {
    async fn parse(multipart: &mut Multipart) -> ApiResult<Self> {
        let mut form = MakeupForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    form.file = Some(bytes.to_vec());
                }
                "apply_lipstick" => form.config.apply_lipstick = parse_bool(&name, field).await?,
                "apply_blush" => form.config.apply_blush = parse_bool(&name, field).await?,
                "apply_foundation" => {
                    form.config.apply_foundation = parse_bool(&name, field).await?
                }
                "return_base64" => form.return_base64 = Some(parse_bool(&name, field).await?),
                "lipstick_color" => form.config.lipstick_color = text(field).await?,
                "blush_color" => form.config.blush_color = text(field).await?,
                "foundation_preset" => form.config.foundation_preset = text(field).await?,
                "blush_intensity" => {
                    let value = text(field).await?;
                    form.config.blush_intensity = value.trim().parse().map_err(|_| {
                        ApiError::Validation(format!(
                            "blush_intensity must be an integer between 0 and 100, got {value:?}"
                        ))
                    })?;
                }
                "landmarks" => {
                    let value = text(field).await?;
                    let points: Vec<Landmark> = serde_json::from_str(&value)
                        .map_err(|e| ApiError::bad_request(format!("Invalid landmarks: {e}")))?;
                    form.landmarks = Some(points);
                }
                other => debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::bad_request(e.body_text())
    }
}

async fn text(field: Field<'_>) -> ApiResult<String> {
    field.text().await.map_err(multipart_error)
}

async fn parse_bool(name: &str, field: Field<'_>) -> ApiResult<bool> {
    let value = text(field).await?;
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ApiError::Validation(format!(
            "{name} must be a boolean, got {value:?}"
        ))),
    }
}

/// Apply makeup to an uploaded image.
///
/// Returns a `ProcessResponse` with a PNG data URI, or the raw PNG when
/// `return_base64` is false.
pub async fn apply_makeup(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let started = Instant::now();
    let form = MakeupForm::parse(&mut multipart).await?;
    form.config.validate()?;

    let file = form
        .file
        .ok_or_else(|| ApiError::bad_request("Missing image file"))?;
    let delivery = if form.return_base64.unwrap_or(true) {
        Delivery::DataUri
    } else {
        Delivery::Png
    };

    let processed = process(
        &state,
        ImageInput::Bytes(file),
        form.landmarks,
        form.config,
        delivery,
    )
    .await?;

    Ok(respond(processed, started))
}

/// Apply makeup to a base64 encoded image.
pub async fn apply_makeup_base64(
    State(state): State<AppState>,
    Json(request): Json<ApplyBase64Request>,
) -> ApiResult<Response> {
    let started = Instant::now();
    request.config.validate()?;

    let processed = process(
        &state,
        ImageInput::Base64(request.image_base64),
        request.landmarks,
        request.config,
        Delivery::DataUri,
    )
    .await?;

    Ok(respond(processed, started))
}
