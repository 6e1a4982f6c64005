use std::fs;

use anyhow::{Context, Result};
use clap::Parser;

use form_validation_engine::config::{Args, EngineConfig};
use form_validation_engine::form::{Form, FormFile};
use form_validation_engine::presentation::ClassPresenter;
use form_validation_engine::submit::{BodyFormat, DryRunTransport, SubmitStatus};
use form_validation_engine::validation::{FormEngine, Outcome};

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    let source = fs::read_to_string(&args.definition)
        .with_context(|| format!("reading form definition {:?}", args.definition))?;
    let file: FormFile = toml::from_str(&source)
        .with_context(|| format!("parsing form definition {:?}", args.definition))?;
    let form = Form::from_file(file)?;

    let config = EngineConfig::default();
    let mut engine = FormEngine::new(form, config);

    for (key, value) in args.parsed_overrides()? {
        match engine.form.get_mut(&key) {
            Some(field) => field.value = value,
            None => log::warn!("override for unknown field `{key}`"),
        }
    }

    let mut presenter = ClassPresenter::from_config(&engine.config);
    let report = engine.validate_all(&mut presenter);

    for outcome in &report.outcomes {
        let label = match outcome.outcome {
            Outcome::Valid => "valid",
            Outcome::Invalid => "invalid",
            Outcome::NotApplicable => "n/a",
        };
        println!("{:<24} {label}", outcome.key);
    }
    println!(
        "form `{}`: {}",
        engine.form.name,
        if report.overall_valid { "valid" } else { "invalid" }
    );

    if args.submit {
        let format = if args.json {
            BodyFormat::Json
        } else {
            BodyFormat::UrlEncoded
        };
        let status = engine.submit(&mut DryRunTransport, &mut presenter, format)?;
        match status {
            SubmitStatus::Completed { outcome, .. } => {
                println!("submission: {outcome:?}");
            }
            SubmitStatus::Rejected(_) => println!("submission rejected"),
            SubmitStatus::AlreadyInFlight => println!("submission already in flight"),
        }
    }

    if !report.overall_valid {
        std::process::exit(1);
    }
    Ok(())
}
