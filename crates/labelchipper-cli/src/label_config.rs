use labelchipper::LabelConfig;

/// Label config arg group.
#[derive(clap::Args, Debug)]
pub struct LabelConfigArgs {
    /// Path to the dataset's JSON label config.
    #[arg(long)]
    config: String,
}

impl LabelConfigArgs {
    /// Load the label config.
    pub fn load(&self) -> Result<LabelConfig, Box<dyn std::error::Error>> {
        let config = LabelConfig::from_path(&self.config)?;
        log::info!(
            "loaded {} labels from {:?}",
            config.labels.len(),
            self.config
        );
        Ok(config)
    }
}
