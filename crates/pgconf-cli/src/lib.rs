use clap::Parser as _;

use pgconf::{reload, Change, Context, InMemoryRegistry, ReloadOptions, ReloadReport};
use pgconf_core::registry::{ChangeClass, Setting, SettingKind};

use crate::commands::{Cli, Commands, ReloadArgs};

mod commands;
mod logger;

/// The handful of representative settings spec.md §1 puts out of scope for
/// this demonstration surface (real callers register their own).
fn demo_registry() -> InMemoryRegistry {
    let registry = InMemoryRegistry::new();
    registry.register(Setting::new("work_mem", SettingKind::String, ChangeClass::RuntimeByAny, "4MB"));
    registry.register(Setting::new(
        "shared_buffers",
        SettingKind::String,
        ChangeClass::OnlyAtBoot,
        "16MB",
    ));
    registry.register(Setting::new(
        "max_connections",
        SettingKind::Integer,
        ChangeClass::OnlyAtBoot,
        "100",
    ));
    registry.register(Setting::new(
        "custom_variable_classes",
        SettingKind::String,
        ChangeClass::OnlyBySignalOrBoot,
        "",
    ));
    registry
}

pub fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let _ = logger::init(cli.log_level);

    let (context, ReloadArgs { config_file }) = match cli.command {
        Commands::Boot(args) => (Context::Boot, args),
        Commands::Reload(args) => (Context::Reload, args),
    };

    let registry = demo_registry();
    let options = match context {
        Context::Boot => ReloadOptions::boot(),
        Context::Reload => ReloadOptions::reload(),
    };

    match reload(&registry, &config_file, options).map_err(anyhow::Error::from) {
        Ok(report) => {
            print_report(&report);
            0
        }
        Err(err) => {
            eprintln!("pgconf-cli: {err:#}");
            1
        }
    }
}

fn print_report(report: &ReloadReport) {
    if report.is_noop() {
        println!("no changes");
        return;
    }
    for change in &report.changes {
        match change {
            Change::Applied { name, old, new } => {
                println!(
                    "applied: {name} = \"{new}\" (was {})",
                    old.as_deref().unwrap_or("<unset>")
                );
            }
            Change::Removed { name } => {
                println!("removed: {name} reset to default");
            }
            Change::PlaceholderCreated { name, value } => {
                println!("placeholder created: {name} = \"{value}\"");
            }
            Change::Warned { name, reason } => {
                println!("warning: {name}: {reason}");
            }
        }
    }
}
