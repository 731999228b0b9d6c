// End-to-end validation harness for compressed-format support
pub mod decode_path;
pub mod prober;
pub mod publisher;
pub mod report;
pub mod runner;
pub mod scope;
pub mod synth;
pub mod tool;
pub mod validator;
pub mod workflow;

use mastercheck_core::config::Config;
use mastercheck_core::media::TargetFormat;
use mastercheck_pipeline::{MasteringPipeline, Pipeline};
use std::sync::Arc;
use tracing::info;

pub use report::Guidance;
pub use runner::{RunReport, Runner, TestUnit};
pub use tool::CodecTool;

/// Shared, read-only state every unit runs against.
pub struct HarnessContext {
    pub config: Config,
    pub tool: CodecTool,
    pub pipeline: Arc<dyn Pipeline>,
    pub format: TargetFormat,
}

pub struct Harness {
    ctx: Arc<HarnessContext>,
}

impl Harness {
    pub fn new(config: Config, pipeline: Arc<dyn Pipeline>) -> Self {
        let tool = CodecTool::resolve(&config.codec);
        Self::with_tool(config, tool, pipeline)
    }

    pub fn with_tool(config: Config, tool: CodecTool, pipeline: Arc<dyn Pipeline>) -> Self {
        let format = TargetFormat::new(&config.codec.extension, &config.codec.encoder);
        Self {
            ctx: Arc::new(HarnessContext {
                config,
                tool,
                pipeline,
                format,
            }),
        }
    }

    /// Harness over the bundled mastering pipeline, sharing the resolved codec tool.
    pub fn with_default_pipeline(config: Config) -> Self {
        let tool = CodecTool::resolve(&config.codec);
        let pipeline = MasteringPipeline::new(tool.program(), config.pipeline.sample_rate);
        Self::with_tool(config, tool, Arc::new(pipeline))
    }

    pub fn context(&self) -> &HarnessContext {
        &self.ctx
    }

    /// Capability, decode and workflow units, in that order.
    pub fn runner(&self) -> Runner {
        Runner::new()
            .with_unit(prober::unit(self.ctx.clone()))
            .with_unit(decode_path::unit(self.ctx.clone()))
            .with_unit(workflow::unit(self.ctx.clone()))
    }

    /// Runs every unit, then publishes samples regardless of their outcomes.
    pub async fn run(&self) -> RunReport {
        let outcomes = self.runner().run().await;

        let published = if self.ctx.config.publish.enabled {
            let config = &self.ctx.config;
            publisher::publish_defaults(
                &self.ctx.tool,
                &config.publish,
                &config.fixtures,
                &self.ctx.format,
            )
            .await
            .created
        } else {
            info!("Sample publishing disabled");
            Vec::new()
        };

        RunReport {
            outcomes,
            published,
        }
    }

    pub fn guidance(&self) -> Guidance {
        let publish = &self.ctx.config.publish;
        Guidance {
            interface_url: self.ctx.config.report.interface_url.clone(),
            format_name: self.ctx.format.display_name(),
            publish_dir: publish
                .enabled
                .then(|| publish.directory.as_std_path().to_path_buf()),
        }
    }
}
