use anyhow::Context;
use clap::{Arg, Command};
use edguard::{AnalysisResult, AssessmentEngine, PageSignals, RuleConfig};
use log::LevelFilter;
use std::io::Read;
use std::process;

fn main() {
    let matches = Command::new("edguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Privacy risk assessment for educational websites")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Rule configuration file (YAML); defaults to the built-in rule set"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default rule configuration to FILE and exit")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate the rule configuration and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .value_name("FILE")
                .help("Analyze a page signals JSON file ('-' reads stdin)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit the analysis result as JSON instead of a report")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        if let Err(e) = generate_config(path) {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
        println!("Default rule configuration written to {path}");
        return;
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match RuleConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e:#}");
                process::exit(1);
            }
        },
        None => RuleConfig::default(),
    };

    if matches.get_flag("test-config") {
        // from_file already validated; this re-checks the built-in path too.
        match config.validate() {
            Ok(()) => {
                println!("Rule configuration is valid");
                println!("  categories: {}", config.categories.len());
                println!("  site rules: {}", config.site_rules.len());
                println!("  sensitive patterns: {}", config.form_rules.patterns.len());
                return;
            }
            Err(e) => {
                eprintln!("Rule configuration is invalid: {e:#}");
                process::exit(1);
            }
        }
    }

    let Some(input) = matches.get_one::<String>("analyze") else {
        eprintln!("Nothing to do. Use --analyze FILE (or '-' for stdin); see --help.");
        process::exit(2);
    };

    let engine = match AssessmentEngine::with_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    match analyze(&engine, input) {
        Ok(result) => {
            if matches.get_flag("json") {
                match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        process::exit(1);
                    }
                }
            } else {
                print_report(&result);
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn generate_config(path: &str) -> anyhow::Result<()> {
    let yaml = RuleConfig::default().to_yaml()?;
    std::fs::write(path, yaml)
        .with_context(|| format!("failed to write configuration to {path}"))
}

fn load_signals(input: &str) -> anyhow::Result<PageSignals> {
    let content = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read page signals from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read page signals from {input}"))?
    };
    serde_json::from_str(&content).context("failed to parse page signals JSON")
}

fn analyze(engine: &AssessmentEngine, input: &str) -> anyhow::Result<AnalysisResult> {
    let signals = load_signals(input)?;
    log::info!("analyzing {}", signals.url);
    Ok(engine.assess(&signals))
}

fn print_report(result: &AnalysisResult) {
    println!("Risk score:     {}/10", result.risk_score);
    println!(
        "Recommendation: {} ({})",
        result.recommendation.as_str(),
        result.recommendation_reason
    );
    println!("Website type:   {}", result.website_type.as_str());
    if let Some(kind) = result.document_type {
        println!("Document type:  {}", kind.as_str());
    }
    println!("{}", result.summary);

    if !result.privacy_threats.is_empty() {
        println!();
        println!("Privacy threats:");
        for threat in &result.privacy_threats {
            println!("  - {threat}");
        }
    }

    if !result.brand_impersonation.is_empty() {
        println!();
        println!("Brand claims to verify:");
        for claim in &result.brand_impersonation {
            println!("  - {claim}");
        }
    }

    let flagged: Vec<&str> = result
        .forms
        .iter()
        .flat_map(|form| form.fields.iter())
        .filter(|field| field.sensitive)
        .map(|field| field.name.as_str())
        .collect();
    if !flagged.is_empty() {
        println!();
        println!("Sensitive form fields: {}", flagged.join(", "));
    }

    println!();
    println!("{}", result.student_summary);
}
