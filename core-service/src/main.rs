//! X-Detect CLI
//!
//! Scores network flows from the command line.
//!
//! # Usage
//!
//! ```bash
//! xdetect predict --source-ip 10.0.0.5 --destination-ip 8.8.8.8 --protocol UDP
//! xdetect batch flows.jsonl --output scores.jsonl
//! xdetect --config xdetect.json info
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use xdetect_core::constants::{APP_NAME, APP_VERSION};
use xdetect_core::{CodecMode, DetectorConfig, FlowRecord, LayoutInfo, PredictionPipeline};

#[derive(Parser)]
#[command(name = "xdetect")]
#[command(version)]
#[command(about = "X-Detect network flow threat scoring", long_about = None)]
struct Cli {
    /// JSON configuration file (defaults come from XDETECT_* variables)
    #[arg(long, short, env = "XDETECT_CONFIG")]
    config: Option<PathBuf>,

    /// Model artifact path
    #[arg(long)]
    model: Option<PathBuf>,

    /// Scaler artifact path
    #[arg(long)]
    scaler: Option<PathBuf>,

    /// Audit log CSV path
    #[arg(long)]
    audit_log: Option<PathBuf>,

    /// Do not write the audit log
    #[arg(long)]
    no_audit: bool,

    /// Reject malformed IPs and unknown protocols instead of encoding them as 0
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single flow
    Predict {
        #[arg(long, default_value = "192.168.1.10")]
        source_ip: String,
        #[arg(long, default_value = "8.8.8.8")]
        destination_ip: String,
        #[arg(long, default_value = "TCP")]
        protocol: String,
        /// Seconds
        #[arg(long, default_value_t = 10.0)]
        duration: f64,
        /// Total bytes
        #[arg(long, default_value_t = 500)]
        packet_size: u64,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score a JSONL file of flow records
    Batch {
        /// Input file, one FlowRecord JSON object per line
        input: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show feature layout and engine status
    Info,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Predict {
            source_ip,
            destination_ip,
            protocol,
            duration,
            packet_size,
            json,
        } => {
            let pipeline = PredictionPipeline::from_config(&config)?;
            let record =
                FlowRecord::new(source_ip, destination_ip, protocol, duration, packet_size);
            let result = pipeline.predict(&record)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let verdict = if result.prediction { "Malicious" } else { "Benign" };
                println!("Prediction:   {}", verdict);
                println!("Probability:  {:.4}", result.probability);
                println!("Threat level: {}", result.threat_level);
                println!("              {}", result.description);
            }
        }
        Commands::Batch { input, output } => {
            let pipeline = PredictionPipeline::from_config(&config)?;
            let reader = BufReader::new(
                File::open(&input).with_context(|| format!("cannot open {}", input.display()))?,
            );
            let mut writer: Box<dyn Write> = match &output {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    Box::new(BufWriter::new(file))
                }
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };

            let (scored, failed) = run_batch(&pipeline, reader, &mut writer)?;
            writer.flush()?;
            log::info!("Batch finished: {} scored, {} failed", scored, failed);
        }
        Commands::Info => {
            println!("{} v{}", APP_NAME, APP_VERSION);
            println!("{}", serde_json::to_string_pretty(&LayoutInfo::current())?);

            let pipeline = PredictionPipeline::from_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&pipeline.status())?);
        }
    }

    Ok(())
}

/// File config (or env defaults), then command line overrides
fn load_config(cli: &Cli) -> anyhow::Result<DetectorConfig> {
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::from_file(path)?,
        None => DetectorConfig::from_env()?,
    };

    if let Some(model) = &cli.model {
        config.model_path = model.clone();
    }
    if let Some(scaler) = &cli.scaler {
        config.scaler_path = scaler.clone();
    }
    if let Some(audit_log) = &cli.audit_log {
        config.audit_log_path = Some(audit_log.clone());
    }
    if cli.no_audit {
        config.audit_log_path = None;
    }
    if cli.strict {
        config.codec_mode = CodecMode::Strict;
    }

    config.validate()?;
    Ok(config)
}

/// One output line per non-empty input line; bad lines are reported, not fatal
fn run_batch<R: BufRead, W: Write>(
    pipeline: &PredictionPipeline,
    reader: R,
    writer: &mut W,
) -> anyhow::Result<(usize, usize)> {
    let mut scored = 0;
    let mut failed = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;

        let outcome = serde_json::from_str::<FlowRecord>(&line)
            .map_err(|e| format!("invalid record: {}", e))
            .and_then(|record| pipeline.predict(&record).map_err(|e| e.to_string()));

        let value = match outcome {
            Ok(result) => {
                scored += 1;
                json!({ "line": line_no, "result": result })
            }
            Err(error) => {
                failed += 1;
                log::warn!("Line {}: {}", line_no, error);
                json!({ "line": line_no, "error": error })
            }
        };
        writeln!(writer, "{}", value)?;
    }

    Ok((scored, failed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xdetect_core::logic::features::NormalizedVector;
    use xdetect_core::logic::model::FittedScalerParams;
    use xdetect_core::{Classifier, DetectResult, Normalizer};

    struct Fixed;

    impl Classifier for Fixed {
        fn predict_probability(&self, _input: &NormalizedVector) -> DetectResult<f64> {
            Ok(0.8)
        }
        fn input_width(&self) -> usize {
            6
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn pipeline() -> PredictionPipeline {
        let config = DetectorConfig {
            audit_log_path: None,
            ..Default::default()
        };
        let normalizer = Normalizer::new(FittedScalerParams::identity()).unwrap();
        PredictionPipeline::new(&config, normalizer, Arc::new(Fixed)).unwrap()
    }

    #[test]
    fn test_run_batch() {
        let input = concat!(
            r#"{"source_ip":"10.0.0.1","destination_ip":"8.8.8.8","protocol":"TCP","duration":1.5,"packet_size_total":900}"#,
            "\n\n",
            r#"{"source_ip":"10.0.0.1"}"#,
            "\n",
            r#"{"source_ip":"10.0.0.2","destination_ip":"1.1.1.1","protocol":"UDP","duration":-3.0,"packet_size_total":10}"#,
            "\n",
        );
        let mut output = Vec::new();

        let (scored, failed) = run_batch(&pipeline(), input.as_bytes(), &mut output).unwrap();
        assert_eq!((scored, failed), (1, 2));

        let lines: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["line"], 1);
        assert_eq!(lines[0]["result"]["threat_level"], "High");
        assert_eq!(lines[1]["line"], 3);
        assert!(lines[1]["error"].as_str().unwrap().starts_with("invalid record"));
        assert_eq!(lines[2]["line"], 4);
        assert!(lines[2].get("error").is_some());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["xdetect", "--no-audit", "predict"]).unwrap();
        assert!(cli.no_audit);
        match cli.command {
            Commands::Predict { source_ip, protocol, duration, packet_size, .. } => {
                assert_eq!(source_ip, "192.168.1.10");
                assert_eq!(protocol, "TCP");
                assert_eq!(duration, 10.0);
                assert_eq!(packet_size, 500);
            }
            _ => panic!("expected predict"),
        }
    }
}
