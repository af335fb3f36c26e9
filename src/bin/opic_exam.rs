use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use opic_exam::bank::{open_bank, BankSource};
use opic_exam::config::ExamConfig;
use opic_exam::export::FileSink;
use opic_exam::survey::SurveyData;
use opic_exam::{ExamAssembler, ExamSession, TopicCatalog, TopicMap};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Assemble a 15-question OPIc mock exam from survey answers", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    OPIC_TOPIC_MAP     Survey answer -> topic JSON file
    OPIC_BANK_SOURCE   Question bank source (file|store)
    OPIC_BANK_PATH     Question bank JSON or store seed file
    OPIC_SEED          Seed for reproducible exams
    OPIC_EXPAND        Expand pools with OpenAI-generated questions (true|false)
    OPENAI_API_KEY     API key used when expansion is enabled
    OPENAI_MODEL       Model id used for expansion (default gpt-4o-mini)

EXAMPLES:
    opic_exam --answer dormitory --answer yoga --answer \"international travel\" --seed 42
    opic_exam --survey survey.json --source store --bank seed_contexts.json --json")]
struct Args {
    /// Survey answer label (repeatable)
    #[arg(short, long = "answer")]
    answers: Vec<String>,

    /// JSON file holding full survey data; its answers come before --answer values
    #[arg(long)]
    survey: Option<PathBuf>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Survey answer -> topic map
    #[arg(long)]
    topic_map: Option<PathBuf>,

    /// Question bank file (JSON bank or store seed)
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Question bank source: file or store
    #[arg(long)]
    source: Option<String>,

    /// Expand pools with OpenAI-generated questions
    #[arg(long)]
    expand: bool,

    /// Print the exam as a JSON array
    #[arg(long)]
    json: bool,

    /// Also save the exam as Markdown under this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = ExamConfig::from_env()?;
    if let Some(path) = args.topic_map {
        config.topic_map_path = path;
    }
    if let Some(path) = args.bank {
        config.bank_path = path;
    }
    if let Some(source) = &args.source {
        config.bank_source = source.parse::<BankSource>().map_err(anyhow::Error::msg)?;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.expand |= args.expand;

    let survey = match &args.survey {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading survey file {}", path.display()))?;
            serde_json::from_str::<SurveyData>(&raw)
                .with_context(|| format!("parsing survey file {}", path.display()))?
        }
        None => SurveyData::default(),
    };
    let mut answers = survey.selected_answers();
    answers.extend(args.answers);

    let topic_map = TopicMap::load(&config.topic_map_path).await?;
    let bank = open_bank(&config).await?;
    let mut assembler = ExamAssembler::new(topic_map, bank, TopicCatalog::default());
    if config.expand {
        assembler = assembler.with_expander(expander()?);
    }

    let exam = assembler.assemble(&answers, config.seed).await?;
    let session = ExamSession::new(survey, exam);

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.exam())?);
    } else {
        println!("{}", session.exam());
    }

    if let Some(dir) = args.out_dir {
        let path = FileSink::new(dir).write(&session).await?;
        eprintln!("Saved exam to {}", path.display());
    }

    Ok(())
}

#[cfg(feature = "openai")]
fn expander() -> anyhow::Result<opic_exam::expander::QuestionExpander<opic_exam::clients::OpenAIClient>> {
    let client = opic_exam::clients::OpenAIClient::from_env()?;
    Ok(opic_exam::expander::QuestionExpander::new(client))
}

#[cfg(not(feature = "openai"))]
fn expander() -> anyhow::Result<opic_exam::expander::QuestionExpander<opic_exam::clients::MockClient>> {
    anyhow::bail!("question expansion requires the `openai` feature")
}
