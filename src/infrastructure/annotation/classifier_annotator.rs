use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;

use crate::application::ports::{Annotator, AnnotatorError, RawAnnotation};
use crate::domain::Unit;

/// Annotation backend running a local BERT token-classification pass with
/// Candle. Per-token label predictions are decoded into entity spans using
/// the tokenizer's offset mapping, so the returned positions are exact
/// character offsets into the unit's content.
pub struct ClassifierAnnotator {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
}

impl ClassifierAnnotator {
    pub fn new(model_id: &str) -> Result<Self, AnnotatorError> {
        let device = Self::select_device();

        tracing::info!(
            device = ?device,
            model = model_id,
            "Initializing local token-classification model"
        );

        let api = Api::new().map_err(|e| AnnotatorError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("config.json: {e}")))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("tokenizer.json: {e}")))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("model.safetensors: {e}")))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("read config: {e}")))?;
        let config: BertConfig = serde_json::from_str(&config_contents)
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("parse config: {e}")))?;
        let labels = Self::parse_labels(&config_contents)?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("tokenizer: {e}")))?;

        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: config.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("truncation config: {e}")))?;

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| AnnotatorError::ModelLoadFailed(format!("weights: {e}")))?
        };

        // Token-classification checkpoints carry the encoder under a "bert"
        // prefix; some exports drop it.
        let model = BertModel::load(vb.pp("bert"), &config)
            .or_else(|_| BertModel::load(vb.clone(), &config))
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("model: {e}")))?;

        let classifier = candle_nn::linear(config.hidden_size, labels.len(), vb.pp("classifier"))
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("classifier head: {e}")))?;

        tracing::info!(label_count = labels.len(), "Token-classification model loaded");

        Ok(Self {
            model,
            classifier,
            tokenizer,
            labels,
            device,
        })
    }

    fn select_device() -> Device {
        Device::new_metal(0).unwrap_or(Device::Cpu)
    }

    fn parse_labels(config_contents: &str) -> Result<Vec<String>, AnnotatorError> {
        let raw: serde_json::Value = serde_json::from_str(config_contents)
            .map_err(|e| AnnotatorError::ModelLoadFailed(format!("parse config: {e}")))?;

        let id2label = raw
            .get("id2label")
            .and_then(|v| v.as_object())
            .ok_or_else(|| {
                AnnotatorError::ModelLoadFailed("config.json carries no id2label map".to_string())
            })?;

        let mut labels = vec![String::new(); id2label.len()];
        for (id, label) in id2label {
            let index: usize = id.parse().map_err(|_| {
                AnnotatorError::ModelLoadFailed(format!("non-numeric label id: {id}"))
            })?;
            let name = label.as_str().ok_or_else(|| {
                AnnotatorError::ModelLoadFailed(format!("non-string label for id {id}"))
            })?;
            if index >= labels.len() {
                return Err(AnnotatorError::ModelLoadFailed(format!(
                    "label id {index} out of range"
                )));
            }
            labels[index] = name.to_string();
        }

        Ok(labels)
    }

    fn predict_label_ids(&self, content: &str) -> Result<(Vec<u32>, Encoded), AnnotatorError> {
        let encoding = self
            .tokenizer
            .encode(content, true)
            .map_err(|e| AnnotatorError::InferenceFailed(format!("tokenization: {e}")))?;

        let seq_len = encoding.get_ids().len();

        let input_ids = Tensor::from_vec(encoding.get_ids().to_vec(), (1, seq_len), &self.device)
            .map_err(|e| AnnotatorError::InferenceFailed(e.to_string()))?;
        let token_type_ids =
            Tensor::from_vec(encoding.get_type_ids().to_vec(), (1, seq_len), &self.device)
                .map_err(|e| AnnotatorError::InferenceFailed(e.to_string()))?;
        let attention_mask = Tensor::from_vec(
            encoding.get_attention_mask().to_vec(),
            (1, seq_len),
            &self.device,
        )
        .map_err(|e| AnnotatorError::InferenceFailed(e.to_string()))?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| AnnotatorError::InferenceFailed(e.to_string()))?;

        let logits = self
            .classifier
            .forward(&hidden)
            .map_err(|e| AnnotatorError::InferenceFailed(e.to_string()))?;

        let label_ids = logits
            .argmax(candle_core::D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1::<u32>())
            .map_err(|e| AnnotatorError::InferenceFailed(e.to_string()))?;

        let encoded = Encoded {
            offsets: encoding.get_offsets().to_vec(),
            special_tokens: encoding.get_special_tokens_mask().to_vec(),
        };

        Ok((label_ids, encoded))
    }
}

struct Encoded {
    offsets: Vec<(usize, usize)>,
    special_tokens: Vec<u32>,
}

#[async_trait]
impl Annotator for ClassifierAnnotator {
    #[tracing::instrument(skip(self, unit), fields(unit_offset = unit.start_offset))]
    async fn annotate(&self, unit: &Unit) -> Result<Vec<RawAnnotation>, AnnotatorError> {
        let (label_ids, encoded) = self.predict_label_ids(&unit.content)?;

        let token_labels: Vec<&str> = label_ids
            .iter()
            .map(|&id| self.labels.get(id as usize).map(String::as_str).unwrap_or("O"))
            .collect();

        let spans = label_runs_to_spans(&token_labels, &encoded.offsets, &encoded.special_tokens);

        let annotations = spans
            .into_iter()
            .filter_map(|(byte_start, byte_end)| {
                let entity = unit.content.get(byte_start..byte_end)?;
                let start = byte_to_char(&unit.content, byte_start)?;
                let end = byte_to_char(&unit.content, byte_end)?;
                Some(RawAnnotation {
                    entity: entity.to_string(),
                    context: None,
                    start: Some(start as i64),
                    end: Some(end as i64),
                })
            })
            .collect();

        Ok(annotations)
    }
}

/// Merges per-token BIO labels into byte spans over the original text.
///
/// A `B-` label opens a span, an `I-` label of the same type extends it, and
/// anything else closes it. A dangling `I-` without a preceding `B-` still
/// opens a span, which tolerates the boundary slips these models make.
pub fn label_runs_to_spans(
    labels: &[&str],
    offsets: &[(usize, usize)],
    special_tokens: &[u32],
) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut open: Option<(usize, usize, String)> = None;

    for (index, label) in labels.iter().enumerate() {
        let is_special = special_tokens.get(index).copied().unwrap_or(0) == 1;
        let (token_start, token_end) = offsets.get(index).copied().unwrap_or((0, 0));

        if is_special || token_start == token_end {
            continue;
        }

        let (prefix, kind) = match label.split_once('-') {
            Some((p, k)) if p == "B" || p == "I" => (p, k),
            _ => {
                if let Some((start, end, _)) = open.take() {
                    spans.push((start, end));
                }
                continue;
            }
        };

        match &mut open {
            Some((_, end, open_kind)) if prefix == "I" && open_kind.as_str() == kind => {
                *end = token_end;
            }
            _ => {
                if let Some((start, end, _)) = open.take() {
                    spans.push((start, end));
                }
                open = Some((token_start, token_end, kind.to_string()));
            }
        }
    }

    if let Some((start, end, _)) = open {
        spans.push((start, end));
    }

    spans
}

fn byte_to_char(text: &str, byte: usize) -> Option<usize> {
    if byte == text.len() {
        return Some(text.chars().count());
    }
    text.char_indices().position(|(index, _)| index == byte)
}
