use std::path::Path;

use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::{PredictError, StartupError};
use crate::preprocess::INPUT_SIZE;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Preloaded ONNX classifier. Built once at startup and shared read-only
/// across requests; `run` takes `&self`, so no locking is needed.
pub struct Classifier {
    plan: OnnxPlan,
}

impl Classifier {
    pub fn load(path: &Path) -> Result<Self, StartupError> {
        if !path.exists() {
            return Err(StartupError::ResourceMissing(path.to_path_buf()));
        }

        let side = INPUT_SIZE as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| StartupError::ModelLoad(e.to_string()))?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, side, side, 3)))
            .map_err(|e| StartupError::ModelLoad(e.to_string()))?
            .into_optimized()
            .map_err(|e| StartupError::ModelLoad(e.to_string()))?
            .into_runnable()
            .map_err(|e| StartupError::ModelLoad(e.to_string()))?;

        Ok(Self { plan })
    }

    /// Single synchronous forward pass over one preprocessed image. Returns
    /// the raw score vector, one entry per class.
    pub fn infer(&self, input: &Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let flat = input
            .as_slice()
            .ok_or_else(|| PredictError::Inference("input tensor is not contiguous".to_string()))?;

        let side = INPUT_SIZE as usize;
        let tensor = tract_ndarray::Array::from_shape_vec((1, side, side, 3), flat.to_vec())
            .map_err(|e| PredictError::Inference(e.to_string()))?
            .into_tensor();

        let result = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        let scores = result[0]
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(e.to_string()))?;

        Ok(scores.iter().copied().collect())
    }
}

/// Arg-max over the score vector: index of the best class and its value.
pub fn top_prediction(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
}
