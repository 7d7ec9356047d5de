//! Pipeline configuration and orchestration.

mod config;
mod processor;

pub use config::{
    DitherConfig, EdgeOverlayConfig, PipelineConfig, PostFilterConfig, PreFilterConfig,
    SharpenConfig,
};
pub use processor::{PipelineOutput, Processor};
