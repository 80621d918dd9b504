use std::io::Write;

use labelchipper::{
    LabelConfig,
    metrics::{
        ClassificationMetric,
        MetricConfig,
        MetricOptions,
        MetricResults,
        ModelOutputs,
        ReferenceLabels,
        compute_metrics,
    },
};

use crate::{
    input_output::{OutputArgs, read_lines},
    label_config::LabelConfigArgs,
    logging::LogArgs,
};

/// Args for the score command.
#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    config: LabelConfigArgs,

    /// Resolved label surface forms, one per line.
    #[arg(long)]
    predictions: String,

    /// Reference labels, one per line.
    #[arg(long)]
    references: String,

    /// Metrics to compute; defaults to all of them.
    #[arg(long = "metric")]
    metrics: Vec<ClassificationMetric>,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    logging: LogArgs,
}

impl ScoreArgs {
    /// Run the score command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let config = self.config.load()?;
        let predictions = read_lines(&self.predictions)?;
        let references = read_lines(&self.references)?;
        log::info!(
            "scoring {} predictions against {} references",
            predictions.len(),
            references.len()
        );

        let results = score_labels(&config, predictions, references, &self.metrics)?;

        let mut writer = self.output.open_writer()?;
        serde_json::to_writer_pretty(&mut writer, &results)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn score_labels(
    config: &LabelConfig,
    predictions: Vec<String>,
    references: Vec<String>,
    metrics: &[ClassificationMetric],
) -> Result<MetricResults, Box<dyn std::error::Error>> {
    let all = ClassificationMetric::ALL;
    let metrics: &[ClassificationMetric] = if metrics.is_empty() {
        &all
    } else {
        metrics
    };
    let metrics: Vec<MetricConfig> = metrics.iter().copied().map(Into::into).collect();

    Ok(compute_metrics(
        &ModelOutputs::Labels(predictions),
        &ReferenceLabels::Labels(references),
        &config.build_vocab()?,
        &metrics,
        MetricOptions::default(),
    )?)
}
