//! Text-to-image job-graph construction.
//!
//! The graph is a fixed Stable Diffusion 1.5 pipeline in ComfyUI's API
//! format: a map of node IDs to `{ class_type, inputs }`, where inputs that
//! reference another node are `[node_id, output_index]` pairs.

use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};

/// Node ID of the `SaveImage` stage whose output is the artifact.
pub const OUTPUT_NODE_ID: &str = "9";

/// Checkpoint loaded by the graph.
pub const CHECKPOINT_NAME: &str = "v1-5-pruned-emaonly-fp16.safetensors";

/// Filename prefix ComfyUI uses when saving outputs.
pub const FILENAME_PREFIX: &str = "generated";

/// Negative prompt used when the caller does not provide one.
pub const DEFAULT_NEGATIVE_PROMPT: &str = "bad quality, blurry, distorted, low resolution";

/// Default output edge length in pixels.
pub const DEFAULT_SIZE: u32 = 512;

/// Seeds are drawn from `0..MAX_SEED`.
pub const MAX_SEED: u64 = 1_000_000;

const SAMPLER_STEPS: u32 = 20;
const SAMPLER_CFG: f64 = 8.0;
const SAMPLER_NAME: &str = "dpmpp_2m";
const SCHEDULER: &str = "karras";

/// Parameters for one image. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
}

impl GenerationRequest {
    /// A square [`DEFAULT_SIZE`] request with the default negative prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = negative_prompt.into();
        self
    }
}

/// Draw a fresh sampler seed.
pub fn random_seed() -> u64 {
    rand::rng().random_range(0..MAX_SEED)
}

/// Build the API-format job-graph for a request with the given seed.
pub fn build_workflow(request: &GenerationRequest, seed: u64) -> Value {
    json!({
        "3": {
            "inputs": {
                "seed": seed,
                "steps": SAMPLER_STEPS,
                "cfg": SAMPLER_CFG,
                "sampler_name": SAMPLER_NAME,
                "scheduler": SCHEDULER,
                "denoise": 1,
                "model": ["4", 0],
                "positive": ["6", 0],
                "negative": ["7", 0],
                "latent_image": ["5", 0]
            },
            "class_type": "KSampler"
        },
        "4": {
            "inputs": { "ckpt_name": CHECKPOINT_NAME },
            "class_type": "CheckpointLoaderSimple"
        },
        "5": {
            "inputs": {
                "width": request.width,
                "height": request.height,
                "batch_size": 1
            },
            "class_type": "EmptyLatentImage"
        },
        "6": {
            "inputs": { "text": request.prompt, "clip": ["4", 1] },
            "class_type": "CLIPTextEncode"
        },
        "7": {
            "inputs": { "text": request.negative_prompt, "clip": ["4", 1] },
            "class_type": "CLIPTextEncode"
        },
        "8": {
            "inputs": { "samples": ["3", 0], "vae": ["4", 2] },
            "class_type": "VAEDecode"
        },
        OUTPUT_NODE_ID: {
            "inputs": { "filename_prefix": FILENAME_PREFIX, "images": ["8", 0] },
            "class_type": "SaveImage"
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = GenerationRequest::new("a cat");
        assert_eq!(req.width, 512);
        assert_eq!(req.height, 512);
        assert_eq!(req.negative_prompt, DEFAULT_NEGATIVE_PROMPT);
    }

    #[test]
    fn builder_overrides() {
        let req = GenerationRequest::new("a cat")
            .with_size(1024, 512)
            .with_negative_prompt("dogs");
        assert_eq!((req.width, req.height), (1024, 512));
        assert_eq!(req.negative_prompt, "dogs");
    }

    #[test]
    fn request_parameters_are_substituted() {
        let req = GenerationRequest::new("sunset over docks").with_size(1024, 512);
        let graph = build_workflow(&req, 42);

        assert_eq!(graph["3"]["inputs"]["seed"], 42);
        assert_eq!(graph["5"]["inputs"]["width"], 1024);
        assert_eq!(graph["5"]["inputs"]["height"], 512);
        assert_eq!(graph["6"]["inputs"]["text"], "sunset over docks");
        assert_eq!(graph["7"]["inputs"]["text"], DEFAULT_NEGATIVE_PROMPT);
    }

    #[test]
    fn output_stage_is_save_image() {
        let graph = build_workflow(&GenerationRequest::new("x"), 0);
        assert_eq!(graph[OUTPUT_NODE_ID]["class_type"], "SaveImage");
        assert_eq!(graph[OUTPUT_NODE_ID]["inputs"]["filename_prefix"], FILENAME_PREFIX);
        assert_eq!(graph[OUTPUT_NODE_ID]["inputs"]["images"], json!(["8", 0]));
    }

    #[test]
    fn node_links_reference_existing_nodes() {
        let graph = build_workflow(&GenerationRequest::new("x"), 0);
        let nodes = graph.as_object().unwrap();
        for node in nodes.values() {
            for input in node["inputs"].as_object().unwrap().values() {
                if let Some([Value::String(target), Value::Number(_)]) =
                    input.as_array().map(|a| a.as_slice())
                {
                    assert!(nodes.contains_key(target), "dangling link to node {target}");
                }
            }
        }
    }

    #[test]
    fn random_seed_in_range() {
        for _ in 0..100 {
            assert!(random_seed() < MAX_SEED);
        }
    }
}
