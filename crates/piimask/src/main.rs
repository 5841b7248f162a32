//! `piimask` - CLI for the PII masking engine
//!
//! Masks text given on the command line, in a file or on stdin, and can
//! classify the masked result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use piimask::cli::{Cli, Command, ConfigCommand, MaskCommand, OutputFormat, RulesCommand};
use piimask::masking::RuleTable;
use piimask::service::ensure_within_limit;
use piimask::{
    init_logging, BatchMasker, ClassificationService, Config, KeywordClassifier, LineFormat,
    PiiMasker,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Mask(mask_cmd) => handle_mask(&config, &mask_cmd),
        Command::Classify(classify_cmd) => {
            let text = read_input(classify_cmd.text, classify_cmd.input.as_deref())?;
            handle_classify(&config, &text)
        }
        Command::Rules(rules_cmd) => handle_rules(&rules_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

/// Resolve the text argument, an input file, or stdin, in that order.
fn read_input(text: Option<String>, input: Option<&Path>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = input {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn handle_mask(config: &Config, cmd: &MaskCommand) -> anyhow::Result<()> {
    if cmd.lines {
        return handle_mask_lines(config, cmd);
    }

    let text = read_input(cmd.text.clone(), cmd.input.as_deref())?;
    ensure_within_limit(&text, config.max_input_bytes())?;

    let result = PiiMasker::new().mask(&text);
    match cmd.format {
        OutputFormat::Plain => print!("{}", result.masked_text),
        OutputFormat::Json => print_json(&result, config.output.pretty_json)?,
    }
    Ok(())
}

/// Stream the input through the masker one line at a time. The size limit
/// applies to each line, not to the whole input.
fn handle_mask_lines(config: &Config, cmd: &MaskCommand) -> anyhow::Result<()> {
    let format = match cmd.format {
        OutputFormat::Plain => LineFormat::Plain,
        OutputFormat::Json => LineFormat::Json,
    };
    let batch = BatchMasker::from_config(config);
    let stdout = std::io::stdout().lock();

    let reader: Box<dyn BufRead + '_> = match (&cmd.text, cmd.input.as_deref()) {
        (Some(text), _) => Box::new(text.as_bytes()),
        (None, Some(path)) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        (None, None) => Box::new(std::io::stdin().lock()),
    };

    batch.mask_lines(reader, stdout, format)?;
    Ok(())
}

fn handle_classify(config: &Config, text: &str) -> anyhow::Result<()> {
    let classifier = KeywordClassifier::from_config(&config.classifier);
    let service = ClassificationService::from_config(config, classifier);
    let report = service.process(text)?;
    print_json(&report, config.output.pretty_json)
}

fn handle_rules(cmd: &RulesCommand) -> anyhow::Result<()> {
    let table = RuleTable::builtin();

    if cmd.json {
        let rules: Vec<_> = table
            .rules()
            .iter()
            .map(|rule| {
                serde_json::json!({
                    "category": rule.category,
                    "priority": rule.priority,
                    "description": rule.description,
                    "pattern": rule.pattern(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
    } else {
        println!("{:<16} {:>8}  DESCRIPTION", "CATEGORY", "PRIORITY");
        for rule in table.rules() {
            println!(
                "{:<16} {:>8}  {}",
                rule.category, rule.priority, rule.description
            );
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Masking]");
                match config.max_input_bytes() {
                    Some(limit) => println!("  Max input bytes:    {limit}"),
                    None => println!("  Max input bytes:    unlimited"),
                }
                println!();
                println!("[Classifier]");
                println!("  Default label:      {}", config.classifier.default_label);
                println!("  Case sensitive:     {}", config.classifier.case_sensitive);
                println!("  Labels:             {}", config.classifier.keywords.len());
                println!();
                println!("[Output]");
                println!("  Pretty JSON:        {}", config.output.pretty_json);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path: PathBuf = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
