use crate::config::ModelInputType;
use crate::{InferenceError, Result};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{DynValue, Tensor};
use parking_lot::Mutex;
use std::path::Path;

/// Binary sentiment classifier over a padded token sequence.
pub trait SentimentModel: Send + Sync {
    /// Probability in `[0, 1]` that the sequence is positive.
    fn predict(&self, sequence: &[i64]) -> Result<f64>;
}

/// Classifier exported to ONNX with a single `[1, sequence_length]` input and a
/// sigmoid output.
pub struct OnnxSentimentModel {
    // `Session::run` needs exclusive access.
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    input_type: ModelInputType,
}

impl OnnxSentimentModel {
    pub fn new(model_path: &Path, input_type: ModelInputType) -> Result<Self> {
        tracing::info!("Loading sentiment model from: {:?}", model_path);

        if !model_path.exists() {
            return Err(InferenceError::ModelLoad(format!(
                "Model file not found: {:?}",
                model_path
            )));
        }

        let session = Session::builder()
            .map_err(|e| {
                InferenceError::ModelLoad(format!("Failed to create session builder: {}", e))
            })?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| {
                InferenceError::ModelLoad(format!("Failed to set optimization level: {}", e))
            })?
            .with_intra_threads(1)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to set thread count: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to load model: {}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| InferenceError::ModelLoad("Model declares no inputs".to_string()))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| InferenceError::ModelLoad("Model declares no outputs".to_string()))?;

        tracing::info!(
            "Successfully loaded sentiment model (input: {}, output: {}, type: {:?})",
            input_name,
            output_name,
            input_type
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            input_type,
        })
    }

    fn input_tensor(&self, sequence: &[i64]) -> Result<DynValue> {
        let shape = (1, sequence.len());
        let tensor = match self.input_type {
            ModelInputType::Float32 => {
                let data: Vec<f32> = sequence.iter().map(|&id| id as f32).collect();
                Tensor::from_array(array(shape, data)?).map(|t| t.into_dyn())
            }
            ModelInputType::Int32 => {
                let data: Vec<i32> = sequence.iter().map(|&id| id as i32).collect();
                Tensor::from_array(array(shape, data)?).map(|t| t.into_dyn())
            }
            ModelInputType::Int64 => {
                Tensor::from_array(array(shape, sequence.to_vec())?).map(|t| t.into_dyn())
            }
        };

        tensor.map_err(|e| {
            InferenceError::OnnxInference(format!("Failed to create input tensor: {}", e))
        })
    }
}

impl SentimentModel for OnnxSentimentModel {
    fn predict(&self, sequence: &[i64]) -> Result<f64> {
        use ort::inputs;

        let input = self.input_tensor(sequence)?;

        let mut session = self.session.lock();
        let outputs = session
            .run(inputs![self.input_name.as_str() => input])
            .map_err(|e| InferenceError::OnnxInference(format!("Inference failed: {}", e)))?;

        let (_shape, data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                InferenceError::OnnxInference(format!("Failed to extract output: {}", e))
            })?;

        let probability = data
            .first()
            .map(|&p| p as f64)
            .ok_or_else(|| {
                InferenceError::OnnxInference("Model returned an empty output".to_string())
            })?;

        check_probability(probability)
    }
}

fn array<T>(shape: (usize, usize), data: Vec<T>) -> Result<ndarray::Array2<T>> {
    ndarray::Array2::from_shape_vec(shape, data)
        .map_err(|e| InferenceError::OnnxInference(format!("Failed to create input array: {}", e)))
}

pub(crate) fn check_probability(probability: f64) -> Result<f64> {
    if probability.is_finite() && (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(InferenceError::OnnxInference(format!(
            "Model output {} is not a probability",
            probability
        )))
    }
}
