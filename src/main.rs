use anyhow::{bail, Context, Result};
use docgenome::config::traits::ConfigManifest;
use docgenome::collaborators::{LinearSuccessPredictor, StaticKeywordOracle, StaticSeedCorpus};
use docgenome::engines::expression::TemplateRenderer;
use docgenome::engines::generation::ConsoleProgressCallback;
use docgenome::{AppConfig, CancellationToken, Collaborators, EvolutionEngine, SeedExample, TargetProfile};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_DOMAIN: &str = "smb-subsidy";

const USAGE: &str = "usage: docgenome [--config <path>] [--domain <id>] <industry> [need ...]\n       docgenome [--config <path>] --print-config-schema";

struct Args {
    config: Option<PathBuf>,
    print_schema: bool,
    domain: String,
    profile: TargetProfile,
}

fn parse_args() -> Result<Args> {
    let mut config = None;
    let mut domain = DEFAULT_DOMAIN.to_string();
    let mut print_schema = false;
    let mut positional = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(args.next().context("--config needs a path")?)),
            "--domain" => domain = args.next().context("--domain needs an id")?,
            "--print-config-schema" => print_schema = true,
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(arg),
        }
    }

    if positional.is_empty() && !print_schema {
        bail!(USAGE);
    }
    let industry = if positional.is_empty() {
        String::new()
    } else {
        positional.remove(0)
    };

    Ok(Args {
        config,
        print_schema,
        domain,
        profile: TargetProfile::new(industry, positional),
    })
}

fn sample_corpus(domain: &str) -> StaticSeedCorpus {
    StaticSeedCorpus::new().with_examples(
        domain,
        vec![
            SeedExample::new(
                "Introduction: we are a family business with twelve employees.\n\n\
                 The problem is that manual ordering limits our productivity and growth.\n\n\
                 Our solution is a digitalization project for inventory and sales.\n\n\
                 The benefit is higher efficiency and new employment.\n\n\
                 The plan runs for six months with a clear budget and schedule.",
                0.85,
            ),
            SeedExample::new(
                "We want to grow! Our team believes in innovation for the local market.\n\n\
                 The challenge today is rising costs and slow processes.\n\n\
                 We will introduce a new system that improves competitiveness.",
                0.7,
            ),
        ],
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let config = AppConfig::load_layered(args.config.as_ref())
        .context("failed to load configuration")?;

    if args.print_schema {
        let schema: BTreeMap<&str, ConfigManifest> = config.manifests().into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let collaborators = Collaborators::new(
        Arc::new(sample_corpus(&args.domain)),
        Arc::new(StaticKeywordOracle::new()),
        Arc::new(TemplateRenderer::new()),
    )
    .with_predictor(Arc::new(LinearSuccessPredictor::default()));

    let mut engine = EvolutionEngine::new(config, collaborators)?;
    let outcome = engine.run(
        &args.profile,
        &args.domain,
        ConsoleProgressCallback,
        &CancellationToken::new(),
    );

    println!("{}", outcome.artifact.to_text());

    let provenance = json!({
        "genotype": outcome.best.id,
        "fitness": outcome.fitness,
        "breakdown": outcome.breakdown,
        "generations": outcome.generations,
        "termination": outcome.termination,
        "lineage": outcome.lineage,
        "adaptations": outcome
            .adaptations
            .iter()
            .map(|a| a.describe())
            .collect::<Vec<_>>(),
        "completed_at": outcome.completed_at.to_rfc3339(),
    });
    println!("{}", serde_json::to_string_pretty(&provenance)?);

    Ok(())
}
