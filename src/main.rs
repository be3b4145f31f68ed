//! Headless front end.
//!
//! Builds a settings screen through the in-memory [`RecordingFactory`],
//! prints every element and diagnostic, replays `--click` interactions by
//! label text and prints the resulting settings store as JSON.
//!
//! # Usage
//!
//! ```text
//! settings-panel settings.xml --options panel.toml --store store.json \
//!     --click Music --click Credits
//! ```
//!
//! # Built-in Actions
//!
//! - `close`: reports that the screen asked to close
//! - `open(target…)`: reports the navigation target
//!
//! Both print to stdout and leave the store untouched.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use settings_panel::observability::init_tracing;
use settings_panel::ui::RecordingFactory;
use settings_panel::{
    ActionContext, ActionRegistry, BuildReport, MemoryStore, Result, RuntimeConfig,
    SettingsScreen,
};
use std::collections::HashMap;
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = RuntimeConfig::parse();
    init_tracing(&config);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, fatal = err.is_fatal(), "settings panel failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &RuntimeConfig) -> Result<()> {
    let options = config.panel_options()?;
    let xml = fs::read_to_string(&config.schema_file)?;
    let source = HashMap::from([(options.xml_key.clone(), xml)]);

    let mut store = match &config.store_file {
        Some(path) => MemoryStore::from_file(path)?,
        None => MemoryStore::new(),
    };
    let registry = builtin_actions();
    let mut factory = RecordingFactory::new();

    let mut screen = SettingsScreen::new();
    screen.configure(&options, &config.viewport())?;
    let report = screen.build(&source, &mut factory, &store, &registry)?;
    print_report(&report, &factory);

    for label in &config.clicks {
        let Some(label_id) = factory.find_label(label).map(|element| element.id) else {
            println!("click {label:?}: no such label");
            continue;
        };
        let Some(control) = report.control_for_label(label_id) else {
            println!("click {label:?}: label has no control");
            continue;
        };

        let interaction = screen.interact(control, &mut factory, &mut store)?;
        match interaction.toggled {
            Some(value) => println!("click {label:?}: toggled to {value}"),
            None => println!("click {label:?}: done"),
        }
        for diagnostic in &interaction.diagnostics {
            println!("  ! {diagnostic}");
        }
    }

    println!("{}", store.to_json_pretty()?);
    screen.teardown(&mut factory)?;
    Ok(())
}

fn builtin_actions() -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    registry
        .register("close", |ctx: &mut ActionContext<'_>| {
            println!("  -> close (from {})", ctx.element);
            Ok(())
        })
        .register("open", |ctx: &mut ActionContext<'_>| {
            let targets: Vec<String> = ctx.args.iter().map(ToString::to_string).collect();
            println!("  -> open {} (from {})", targets.join(", "), ctx.element);
            Ok(())
        });
    registry
}

fn print_report(report: &BuildReport, factory: &RecordingFactory) {
    if let Some(background) = factory.background() {
        println!("background {background}");
    }
    for element in factory.elements() {
        println!("{element}");
    }
    for row in &report.rows {
        match row.multiplier {
            Some(multiplier) => {
                println!("row {} {} {:?} slot {multiplier}", row.ordinal, row.kind, row.text);
            }
            None => println!("row {} {} {:?} hidden", row.ordinal, row.kind, row.text),
        }
    }
    for diagnostic in &report.diagnostics {
        println!("! {diagnostic}");
    }
}
