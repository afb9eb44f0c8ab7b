use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use speech_risk::{
    init_logging, load_wav, AnalysisConfig, FeatureAssembler, FeatureVector, FittedScaler,
    FixedTranscriber, IsolationForest, RiskAnalyzer, Transcriber, TranscriptFile,
};

const NO_SPEECH_MESSAGE: &str = "No speech detected in the audio.";

#[derive(Parser, Debug)]
#[command(
    name = "speech_risk_cli",
    about = "Cognitive-decline risk screening for speech recordings"
)]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a recording and print a JSON report
    Analyze {
        #[command(flatten)]
        input: RecordingArgs,
        /// Isolation forest artifact (JSON)
        #[arg(long)]
        model: PathBuf,
        /// Fitted scaler artifact (JSON)
        #[arg(long)]
        scaler: PathBuf,
        /// Override the configured decision threshold
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the named feature vector without scoring
    Features {
        #[command(flatten)]
        input: RecordingArgs,
    },
    /// Print the default configuration
    DumpConfig,
}

#[derive(Args, Debug)]
struct RecordingArgs {
    /// WAV recording
    #[arg(long)]
    audio: PathBuf,
    /// Transcript text
    #[arg(long, conflicts_with = "transcript_file", required_unless_present = "transcript_file")]
    transcript: Option<String>,
    /// File holding the transcript text
    #[arg(long)]
    transcript_file: Option<PathBuf>,
    /// Analysis configuration (JSON); missing or invalid files use defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

impl RecordingArgs {
    fn load_config(&self) -> AnalysisConfig {
        self.config
            .as_ref()
            .map(AnalysisConfig::load_from_file)
            .unwrap_or_default()
    }

    fn transcriber(&self) -> Box<dyn Transcriber> {
        match (&self.transcript, &self.transcript_file) {
            (Some(text), _) => Box::new(FixedTranscriber::new(text.clone())),
            (None, Some(path)) => Box::new(TranscriptFile::new(path.clone())),
            (None, None) => Box::new(FixedTranscriber::new("")),
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    // Usage errors exit 1 like every other failure; --help/--version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print()?;
            return Ok(ExitCode::from(code));
        }
    };
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            input,
            model,
            scaler,
            threshold,
            output,
        } => run_analyze(&input, model, scaler, threshold, output),
        Commands::Features { input } => run_features(&input),
        Commands::DumpConfig => run_dump_config(),
    }
}

fn run_analyze(
    input: &RecordingArgs,
    model_path: PathBuf,
    scaler_path: PathBuf,
    threshold: Option<f64>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let mut config = input.load_config();
    if let Some(threshold) = threshold {
        config = config.with_threshold(threshold);
    }

    let model = IsolationForest::load(&model_path)
        .with_context(|| format!("loading model {}", model_path.display()))?;
    let scaler = FittedScaler::load(&scaler_path)
        .with_context(|| format!("loading scaler {}", scaler_path.display()))?;
    let waveform = load_wav(&input.audio)
        .with_context(|| format!("loading audio {}", input.audio.display()))?;

    let analyzer = RiskAnalyzer::new(config, model, scaler);
    let transcriber = input.transcriber();
    let result = analyzer
        .analyze_recording(transcriber.as_ref(), &waveform)
        .context("analyzing recording")?;

    let transcription = result.transcript.as_str();
    let report = AnalyzeReportPayload {
        transcription,
        transcription_display: if result.transcript.is_blank() {
            NO_SPEECH_MESSAGE
        } else {
            transcription
        },
        features: &result.report.features,
        raw_score: result.report.raw_score,
        normalized_score: result.report.normalized_score,
        risk_level: result.report.label.as_str(),
        risk_style: result.report.label.style_class(),
    };
    emit_json(&report, output_path)?;

    Ok(ExitCode::from(0))
}

fn run_features(input: &RecordingArgs) -> Result<ExitCode> {
    let config = input.load_config();
    let waveform = load_wav(&input.audio)
        .with_context(|| format!("loading audio {}", input.audio.display()))?;
    let transcript = input
        .transcriber()
        .transcribe(&waveform)
        .context("reading transcript")?;

    let assembler = FeatureAssembler::new(&config);
    let features = assembler.assemble(&waveform, &transcript);
    emit_json(&features, None)?;

    Ok(ExitCode::from(0))
}

fn run_dump_config() -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(&AnalysisConfig::default())?);
    Ok(ExitCode::from(0))
}

fn emit_json<T: Serialize>(value: &T, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

#[derive(Serialize)]
struct AnalyzeReportPayload<'a> {
    transcription: &'a str,
    transcription_display: &'a str,
    features: &'a FeatureVector,
    raw_score: f64,
    normalized_score: f64,
    risk_level: &'static str,
    risk_style: &'static str,
}
