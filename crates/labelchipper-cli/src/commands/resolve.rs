use std::io::{BufRead, Write};

use labelchipper::{
    DiagnosticLog,
    GenerationOutput,
    LCResult,
    LabelExtractor,
    LogprobSample,
    ResolverOptions,
};
use serde::Deserialize;

use crate::{
    input_output::{InputArgs, OutputArgs},
    label_config::LabelConfigArgs,
    logging::LogArgs,
};

/// One line of JSONL resolve input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct GenerationRecord {
    /// The decoded sequence.
    sequence: String,

    /// Ranked per-step `[token, logprob]` pairs, if the model returned them.
    #[serde(default)]
    scores: Option<LogprobSample>,
}

/// Args for the resolve command.
#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    config: LabelConfigArgs,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Records per resolution batch.
    #[arg(long, default_value_t = 32)]
    batch_size: usize,

    /// Resolve each batch in parallel.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    parallel: bool,

    #[command(flatten)]
    logging: LogArgs,
}

impl ResolveArgs {
    /// Run the resolve command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let extractor = self
            .config
            .load()?
            .build_extractor(ResolverOptions::default().with_parallel(self.parallel))?;
        log::debug!("{extractor:?}");

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;
        let diagnostics = DiagnosticLog::new();

        let count = run_resolve(
            &mut reader,
            &mut writer,
            &extractor,
            self.batch_size.max(1),
            &diagnostics,
        )?;

        log::info!(
            "resolved {count} records with {} distinct diagnostics",
            diagnostics.len()
        );
        Ok(())
    }
}

fn run_resolve(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    extractor: &LabelExtractor,
    batch_size: usize,
    diagnostics: &DiagnosticLog,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut batch = Vec::with_capacity(batch_size);
    let mut count = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: GenerationRecord =
            serde_json::from_str(&line).map_err(|e| format!("input line {}: {e}", idx + 1))?;
        batch.push(record);

        if batch.len() == batch_size {
            count += write_batch(writer, extractor, std::mem::take(&mut batch), diagnostics)?;
        }
    }
    if !batch.is_empty() {
        count += write_batch(writer, extractor, batch, diagnostics)?;
    }

    writer.flush()?;
    Ok(count)
}

fn write_batch(
    writer: &mut dyn Write,
    extractor: &LabelExtractor,
    batch: Vec<GenerationRecord>,
    diagnostics: &DiagnosticLog,
) -> Result<usize, Box<dyn std::error::Error>> {
    let expected = batch.len();
    let output = generation_output(batch)?;
    let labels = extractor.extract_batch_labels(&output, expected, diagnostics)?;
    for &id in &labels {
        writeln!(
            writer,
            "{}",
            extractor.vocab().surface_form(id).unwrap_or_default()
        )?;
    }
    Ok(labels.len())
}

/// A batch is scored only when every record carries scores.
fn generation_output(batch: Vec<GenerationRecord>) -> LCResult<GenerationOutput> {
    let scored = batch.iter().filter(|r| r.scores.is_some()).count();
    if scored == batch.len() {
        let (sequences, scores) = batch
            .into_iter()
            .map(|r| (r.sequence, r.scores.unwrap_or_default()))
            .unzip();
        return GenerationOutput::scored(sequences, scores);
    }

    if scored > 0 {
        log::debug!(
            "{scored} of {} records carry scores; resolving the batch by edit distance",
            batch.len()
        );
    }
    Ok(GenerationOutput::text_only(
        batch.into_iter().map(|r| r.sequence),
    ))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use labelchipper::LabelConfig;

    use super::*;

    fn extractor() -> LabelExtractor {
        LabelConfig::from_json_str(
            r#"{
                "labels": ["positive", "neutral", "negative"],
                "prompt_label_mapping": {"positive": "positiv", "negative": "negativ"}
            }"#,
        )
        .unwrap()
        .build_extractor(ResolverOptions::default())
        .unwrap()
    }

    fn resolve(
        input: &str,
        batch_size: usize,
    ) -> (usize, String) {
        let mut reader = Cursor::new(input.to_string());
        let mut writer = Vec::new();
        let diagnostics = DiagnosticLog::new();
        let count = run_resolve(
            &mut reader,
            &mut writer,
            &extractor(),
            batch_size,
            &diagnostics,
        )
        .unwrap();
        (count, String::from_utf8(writer).unwrap())
    }

    #[test]
    fn test_scored_and_text_batches() {
        let input = [
            r#"{"sequence": "Neg", "scores": [[["Neg", -0.1], ["Pos", -2.0]]]}"#,
            r#"{"sequence": "positiv", "scores": [[["pos", -0.2]]]}"#,
            "",
            r#"{"sequence": "neutrl"}"#,
        ]
        .join("\n");

        // One batch mixing text-only and scored records: edit distance.
        assert_eq!(resolve(&input, 8), (3, "negativ\npositiv\nneutral\n".to_string()));

        // Batches of two: the first is scored, the second is text-only.
        assert_eq!(resolve(&input, 2), (3, "negativ\npositiv\nneutral\n".to_string()));
    }

    #[test]
    fn test_scores_take_precedence_over_sequences() {
        let input = r#"{"sequence": "negativ", "scores": [[["neu", -0.1]]]}"#;
        assert_eq!(resolve(input, 1), (1, "neutral\n".to_string()));
    }

    #[test]
    fn test_malformed_record() {
        let mut reader = Cursor::new("{\"sequence\": 3}\n".to_string());
        let mut writer = Vec::new();
        let err = run_resolve(
            &mut reader,
            &mut writer,
            &extractor(),
            4,
            &DiagnosticLog::new(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("input line 1:"));
    }
}
