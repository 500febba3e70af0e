//! The Reload Engine (spec §4.5): parse, resolve the class whitelist,
//! validate every assignment against the registry, detect removed lines,
//! and commit. Each phase's failure aborts every later phase and leaves
//! the registry untouched — that is the atomicity guarantee.

use std::path::Path;

use itertools::Itertools;
use pgconf_core::assignment::WHITELIST_SETTING;
use pgconf_core::error::{ConfigError, ConfigResult};
use pgconf_core::registry::{Context, Source};
use pgconf_core::{parser, AssignmentList, Registry};

use crate::outcome::{Change, ReloadReport, ReloadRole};
use crate::registry::InMemoryRegistry;

/// A hook for Phase E: re-reading environment-derived and dynamic defaults.
/// Deliberately skipped at boot (spec §4.5 Phase E, §9) since some of the
/// subsystems it reaches into are not initialized yet that early.
pub type ReseedHook<'a> = &'a (dyn Fn(&dyn Registry) + Sync);

pub struct ReloadOptions<'a> {
    pub context: Context,
    pub role: ReloadRole,
    pub data_dir: Option<&'a Path>,
    pub reseed: Option<ReseedHook<'a>>,
}

impl<'a> ReloadOptions<'a> {
    pub fn boot() -> Self {
        Self {
            context: Context::Boot,
            role: ReloadRole::Postmaster,
            data_dir: None,
            reseed: None,
        }
    }

    pub fn reload() -> Self {
        Self {
            context: Context::Reload,
            role: ReloadRole::Postmaster,
            data_dir: None,
            reseed: None,
        }
    }
}

/// Runs one reload attempt against `registry`, reading `file` as the root
/// configuration file. Rejects a concurrent reload attempt outright (spec
/// §5: only one reload is ever in flight; here that is enforced rather than
/// merely assumed of the caller).
pub fn run(registry: &InMemoryRegistry, file: &Path, options: ReloadOptions<'_>) -> ConfigResult<ReloadReport> {
    let _guard = registry.begin_reload()?;
    run_phases(registry, file, &options)
}

fn run_phases(registry: &InMemoryRegistry, file: &Path, options: &ReloadOptions<'_>) -> ConfigResult<ReloadReport> {
    let mut report = ReloadReport::new(options.context);

    // Phase P — Parse.
    let list = match parser::parse_file(file, options.data_dir) {
        Ok(list) => list,
        Err(err) => {
            tracing::error!(error = %err, "configuration file parse failed, reload aborted");
            return Err(err);
        }
    };

    // Phase W — Resolve class whitelist before anything else is validated.
    let whitelist_value = resolve_whitelist(registry, &list)?;

    // Phase C — Clear in_file_flag on every registered setting.
    registry.clear_in_file_flags();

    // Phase V — Validate (dry run). Any failure aborts before Phase R/A run,
    // so the registry is left exactly as it was.
    for assignment in list.iter() {
        if let Some((prefix, _local)) = assignment.name.split_once('.') {
            if !pgconf_core::registry::is_custom_class(prefix, &whitelist_value) {
                return Err(ConfigError::SemanticUnknown {
                    name: assignment.name.clone(),
                    file: assignment.filename.clone(),
                    line: assignment.sourceline,
                });
            }
            if registry.find(&assignment.name).is_none() {
                // A future module registration may supply this entry; a
                // placeholder is created only at commit time (spec §9).
                tracing::debug!(name = %assignment.name, "qualified setting not yet registered, deferring to commit");
                continue;
            }
        }

        registry.set_config_option(
            &assignment.name,
            Some(&assignment.value),
            options.context,
            Source::File,
            false,
        )?;
    }

    // Phase R — Detect removals: any setting last set from the file that no
    // longer appears is reverted to its boot default, unless its
    // change_class forbids change in this context. Sorted by name so the
    // report and its log records come out in a stable order regardless of
    // the registry's internal hash-map iteration order.
    for setting in registry.settings().into_iter().sorted_by(|a, b| a.name.cmp(&b.name)) {
        if setting.reset_source != Source::File || setting.in_file_flag {
            continue;
        }

        if !setting.change_class.allows(options.context) {
            // The source tags are demoted unconditionally, same as the
            // PostgreSQL original: only the running value is left alone,
            // gated on change_class below.
            registry.demote_file_sourced(&setting.name);
            let reason = ConfigError::SemanticImmutable {
                name: setting.name.clone(),
            }
            .to_string();
            tracing::warn!(name = %setting.name, "{reason}");
            report.push(Change::Warned {
                name: setting.name.clone(),
                reason,
            });
            continue;
        }

        registry.demote_file_sourced(&setting.name);
        registry.set_config_option(&setting.name, None, options.context, Source::Default, true)?;
        if options.context == Context::Reload {
            tracing::info!(
                name = %setting.name,
                "parameter \"{}\" removed from configuration file, reset to default",
                setting.name
            );
        }
        report.push(Change::Removed {
            name: setting.name.clone(),
        });
    }

    // Phase E — Re-seed environment/dynamic defaults, reload only. This is
    // the documented asymmetry with boot: some of these subsystems are not
    // yet initialized that early (spec §4.5, §9).
    if options.context == Context::Reload {
        if let Some(reseed) = options.reseed {
            reseed(registry);
        }
    }

    // Phase A — Apply. Walking the list again means a duplicate name's last
    // occurrence is what actually lands, with no separate dedup step.
    for assignment in list.iter() {
        let is_qualified = assignment.name.contains('.');
        let existing = registry.find(&assignment.name);

        if is_qualified && existing.is_none() {
            registry.register_placeholder(&assignment.name, &assignment.value, Source::File)?;
            registry.set_config_sourcefile(&assignment.name, &assignment.filename, assignment.sourceline);
            report.push(Change::PlaceholderCreated {
                name: assignment.name.clone(),
                value: assignment.value.clone(),
            });
            continue;
        }

        let entry = existing.expect("non-qualified names were validated to exist in Phase V");

        if options.context == Context::Reload && !entry.change_class.allows(Context::Reload) {
            let reason = ConfigError::SemanticImmutable {
                name: assignment.name.clone(),
            }
            .to_string();
            tracing::warn!(name = %assignment.name, "{reason}");
            report.push(Change::Warned {
                name: assignment.name.clone(),
                reason,
            });
            continue;
        }

        let pre = registry.get_config_option(&assignment.name);
        registry.set_config_option(
            &assignment.name,
            Some(&assignment.value),
            options.context,
            Source::File,
            true,
        )?;
        registry.set_config_sourcefile(&assignment.name, &assignment.filename, assignment.sourceline);
        let post = registry.get_config_option(&assignment.name);

        if pre != post {
            let new = post.clone().unwrap_or_default();
            if options.role == ReloadRole::Postmaster {
                tracing::info!(
                    "parameter \"{}\" changed to \"{}\"",
                    assignment.name,
                    new
                );
            } else {
                tracing::debug!(
                    "parameter \"{}\" changed to \"{}\"",
                    assignment.name,
                    new
                );
            }
            report.push(Change::Applied {
                name: assignment.name.clone(),
                old: pre,
                new,
            });
        }
    }

    // Phase T — Stamp. Timestamp acquisition is an external collaborator
    // per spec §1; callers that need the moment of a successful reload can
    // stamp it themselves using this return.
    // Phase F — Free. `list` is dropped here automatically; there is no
    // separate free step in a language with ownership-based memory.

    Ok(report)
}

fn resolve_whitelist(registry: &InMemoryRegistry, list: &AssignmentList) -> ConfigResult<String> {
    if let Some(entry) = registry.find(WHITELIST_SETTING) {
        if entry.reset_source > Source::File {
            return Ok(entry.reset_value);
        }
    }

    if let Some(head) = list.whitelist() {
        return registry.check_value(WHITELIST_SETTING, &head.value);
    }

    Ok(registry.get_config_option(WHITELIST_SETTING).unwrap_or_default())
}
