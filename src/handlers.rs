use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use uuid::Uuid;

use crate::classifier;
use crate::error::PredictError;
use crate::models::{ErrorBody, PredictionResponse, StatusMessage};
use crate::preprocess;
use crate::AppContext;

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(StatusMessage {
        message: "BiteCheck backend running".to_string(),
    })
}

/// Classify one uploaded food photo and enrich it with nutrition facts.
///
/// Always answers HTTP 200; failures are reported in-body as
/// `{"error": <message>}` so callers only ever parse one shape.
pub async fn predict(ctx: web::Data<AppContext>, mut payload: Multipart) -> HttpResponse {
    let request_id = Uuid::new_v4();

    match run_pipeline(&ctx, &mut payload, request_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("[{}] prediction failed: {}", request_id, e);
            HttpResponse::Ok().json(ErrorBody {
                error: e.to_string(),
            })
        }
    }
}

async fn run_pipeline(
    ctx: &AppContext,
    payload: &mut Multipart,
    request_id: Uuid,
) -> Result<PredictionResponse, PredictError> {
    let bytes = collect_upload(payload).await?;
    log::debug!("[{}] received upload ({} bytes)", request_id, bytes.len());

    let tensor = preprocess::image_to_tensor(&bytes)?;
    let scores = ctx.classifier.infer(&tensor)?;

    let (index, confidence) = classifier::top_prediction(&scores)
        .ok_or_else(|| PredictError::Inference("model produced no scores".to_string()))?;

    let predicted_food = ctx.labels.resolve(index).to_string();
    log::info!(
        "[{}] predicted {} (class {}, confidence {:.4})",
        request_id,
        predicted_food,
        index,
        confidence
    );

    let nutrition = ctx.nutrition.lookup(&predicted_food).await;

    Ok(PredictionResponse {
        predicted_food,
        confidence: round_percent(confidence),
        nutrition,
    })
}

/// Drain every multipart field into one buffer. The upload carries a single
/// image file; concatenating all chunks mirrors reading the file whole.
async fn collect_upload(payload: &mut Multipart) -> Result<Vec<u8>, PredictError> {
    let mut bytes = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| PredictError::Upload(e.to_string()))?;

        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| PredictError::Upload(e.to_string()))?;
            bytes.extend_from_slice(&data);
        }
    }

    if bytes.is_empty() {
        return Err(PredictError::Upload("no file uploaded".to_string()));
    }

    Ok(bytes)
}

/// `[0, 1]` confidence as a percentage, rounded to two decimal places.
fn round_percent(confidence: f32) -> f32 {
    (confidence * 10_000.0).round() / 100.0
}
