//! oa-autoreplace -- try a rule file against one keystroke.
//!
//! Usage: oa-autoreplace --rules <file.json> --text <text> [--cursor <n>]
//!        [--block <type>] (--key <key> | --insert <text>)
//!
//! Builds a one-block document with the cursor at `--cursor` (default: end of
//! text), dispatches the keystroke through the rules and prints a diff.

use anyhow::{Context, Result, bail};
use oa_autoreplace::host::diff::document_diff;
use oa_autoreplace::{
    Document, EditorState, InputData, InputEvent, Outcome, RulesFile, Transform,
};

fn arg(name: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != name).nth(1)
}

fn main() -> Result<()> {
    // Initialize tracing to stderr so it does not mix with the diff on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(rules_path) = arg("--rules") else {
        bail!("usage: oa-autoreplace --rules <file.json> --text <text> (--key <key> | --insert <text>)");
    };
    let text = arg("--text").unwrap_or_default();
    let block = arg("--block").unwrap_or_else(|| "paragraph".to_owned());
    let cursor = match arg("--cursor") {
        Some(n) => n.parse().with_context(|| format!("invalid --cursor value: {n}"))?,
        None => text.chars().count(),
    };

    let rules = RulesFile::load(std::path::Path::new(&rules_path))?.build::<Document>()?;
    let state = Document::single(&block, &text, cursor);

    let (outcome, typed) = if let Some(key) = arg("--key") {
        let mut event = InputEvent::default();
        let outcome = rules.on_key_down(&mut event, &InputData::key(key.clone()), &state)?;
        (outcome, key)
    } else if let Some(inserted) = arg("--insert") {
        let mut event = InputEvent::insert(inserted.clone());
        let outcome = rules.on_before_input(&mut event, &InputData::default(), &state)?;
        (outcome, inserted)
    } else {
        bail!("one of --key or --insert is required");
    };

    let next = match outcome {
        Outcome::Replaced(next) => next,
        Outcome::Unchanged => {
            // No rule claimed the event; emulate the host's default insertion.
            let mut transform = state.transform();
            transform.insert_text(&typed);
            println!("no rule applied");
            transform.apply()
        }
    };

    print!("{}", document_diff(&state, &next));
    Ok(())
}
