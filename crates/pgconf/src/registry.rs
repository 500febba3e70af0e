//! A process-wide, in-memory implementation of [`pgconf_core::Registry`].
//!
//! Modeled on the teacher's singleton `FluffConfig`/rule-registry pattern:
//! a process-lifetime store behind a mutex, initialized once at startup and
//! never torn down, with reload serialized by a simple flag rather than a
//! richer lock since spec §5 guarantees only one reload is ever in flight.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use pgconf_core::error::{ConfigError, ConfigResult};
use pgconf_core::registry::{Context, Setting, SettingKind, Source};
use pgconf_core::Registry;

pub struct InMemoryRegistry {
    settings: Mutex<HashMap<String, Setting>>,
    reloading: AtomicBool,
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            settings: Mutex::new(HashMap::new()),
            reloading: AtomicBool::new(false),
        }
    }

    /// Registers a setting at process start. Boot registration is not
    /// itself part of a reload and bypasses the reload-in-progress guard.
    pub fn register(&self, setting: Setting) {
        let key = setting.name.to_lowercase();
        self.settings.lock().unwrap().insert(key, setting);
    }

    /// Acquires the single-reload-at-a-time guard. Dropped automatically
    /// when the returned guard goes out of scope.
    pub(crate) fn begin_reload(&self) -> ConfigResult<ReloadGuard<'_>> {
        if self
            .reloading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConfigError::ReloadInProgress);
        }
        Ok(ReloadGuard { registry: self })
    }
}

pub(crate) struct ReloadGuard<'a> {
    registry: &'a InMemoryRegistry,
}

impl Drop for ReloadGuard<'_> {
    fn drop(&mut self) {
        self.registry.reloading.store(false, Ordering::SeqCst);
    }
}

impl Registry for InMemoryRegistry {
    fn find(&self, name: &str) -> Option<Setting> {
        self.settings
            .lock()
            .unwrap()
            .get(&name.to_lowercase())
            .cloned()
    }

    fn get_config_option(&self, name: &str) -> Option<String> {
        self.settings
            .lock()
            .unwrap()
            .get(&name.to_lowercase())
            .map(|s| s.value.clone())
    }

    fn check_value(&self, name: &str, value: &str) -> ConfigResult<String> {
        let map = self.settings.lock().unwrap();
        let Some(entry) = map.get(&name.to_lowercase()) else {
            return Err(ConfigError::SemanticReject {
                name: name.to_string(),
                message: format!("unrecognized configuration parameter \"{name}\""),
            });
        };
        match &entry.check {
            Some(check) => check(value).map_err(|message| ConfigError::SemanticReject {
                name: name.to_string(),
                message,
            }),
            None => Ok(value.to_string()),
        }
    }

    fn set_config_option(
        &self,
        name: &str,
        value: Option<&str>,
        _context: Context,
        source: Source,
        apply: bool,
    ) -> ConfigResult<()> {
        let mut map = self.settings.lock().unwrap();
        let key = name.to_lowercase();
        let Some(entry) = map.get_mut(&key) else {
            return Err(ConfigError::SemanticReject {
                name: name.to_string(),
                message: format!("unrecognized configuration parameter \"{name}\""),
            });
        };

        let candidate = value.unwrap_or(&entry.boot_default).to_string();
        let canonical = match &entry.check {
            Some(check) => check(&candidate).map_err(|message| ConfigError::SemanticReject {
                name: name.to_string(),
                message,
            })?,
            None => candidate,
        };

        entry.in_file_flag = true;

        if apply {
            if let Some(assign) = &entry.assign {
                assign(&canonical);
            }
            entry.stack.push(pgconf_core::registry::StackEntry {
                value: entry.value.clone(),
                source: entry.source,
            });
            entry.value = canonical.clone();
            entry.source = source;
            if value.is_some() {
                entry.reset_value = canonical;
                entry.reset_source = source;
            } else {
                entry.reset_value = entry.boot_default.clone();
                entry.reset_source = Source::Default;
            }
        }

        Ok(())
    }

    fn set_config_sourcefile(&self, name: &str, filename: &Path, line: usize) {
        let mut map = self.settings.lock().unwrap();
        if let Some(entry) = map.get_mut(&name.to_lowercase()) {
            entry.source_file = Some(filename.to_path_buf());
            entry.source_line = Some(line);
        }
    }

    fn register_placeholder(&self, name: &str, value: &str, source: Source) -> ConfigResult<()> {
        let mut map = self.settings.lock().unwrap();
        let key = name.to_lowercase();
        if map.contains_key(&key) {
            return Ok(());
        }
        let mut setting = Setting::new(name, SettingKind::String, pgconf_core::registry::ChangeClass::RuntimeByAny, "");
        setting.value = value.to_string();
        setting.source = source;
        setting.reset_value = value.to_string();
        setting.reset_source = source;
        setting.in_file_flag = true;
        map.insert(key, setting);
        Ok(())
    }

    fn clear_in_file_flags(&self) {
        for setting in self.settings.lock().unwrap().values_mut() {
            setting.in_file_flag = false;
        }
    }

    fn settings(&self) -> Vec<Setting> {
        self.settings.lock().unwrap().values().cloned().collect()
    }

    fn demote_file_sourced(&self, name: &str) {
        let mut map = self.settings.lock().unwrap();
        if let Some(entry) = map.get_mut(&name.to_lowercase()) {
            if entry.source == Source::File {
                entry.source = Source::Default;
            }
            if entry.reset_source == Source::File {
                entry.reset_source = Source::Default;
            }
            for frame in &mut entry.stack {
                if frame.source == Source::File {
                    frame.source = Source::Default;
                }
            }
        }
    }
}
