//! The Setting Registry Interface the reload engine is built against
//! (spec §4.4). This crate defines only the contract and the shared data
//! types; a concrete, process-wide implementation lives in `pgconf`.

use std::path::Path;

use crate::error::ConfigResult;

/// Provenance of a value, totally ordered by trust (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Source {
    Default,
    Environment,
    DynamicDefault,
    File,
    Argv,
    Client,
}

/// When a setting may legally change (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeClass {
    OnlyAtBoot,
    OnlyBySignalOrBoot,
    RuntimeByAny,
}

/// The context a reload is running in (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Boot,
    Reload,
}

impl ChangeClass {
    /// Whether a change is legal in `context`.
    pub fn allows(self, context: Context) -> bool {
        match (self, context) {
            (ChangeClass::OnlyAtBoot, Context::Boot) => true,
            (ChangeClass::OnlyAtBoot, Context::Reload) => false,
            (ChangeClass::OnlyBySignalOrBoot, _) => true,
            (ChangeClass::RuntimeByAny, _) => true,
        }
    }
}

/// The typed kind of a setting. Per-kind parsing rules live with the
/// setting's `check` hook rather than here; the kind exists so a registry
/// can report what shape of value it expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKind {
    Boolean,
    Integer,
    Real,
    String,
    Enum,
}

/// One entry pushed onto a setting's value stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub value: String,
    pub source: Source,
}

/// A hook that validates and canonicalizes a proposed value, returning the
/// canonical form on success or a human-readable rejection message.
pub type CheckHook = Box<dyn Fn(&str) -> Result<String, String> + Send + Sync>;

/// A hook invoked only on commit, to apply the side effect a real setting
/// would have (writing to a global, reconfiguring a subsystem, ...). Out of
/// scope per spec §1; callers may leave this a no-op.
pub type AssignHook = Box<dyn Fn(&str) + Send + Sync>;

/// One registry entry (spec §3 "Setting").
pub struct Setting {
    pub name: String,
    pub kind: SettingKind,
    pub change_class: ChangeClass,
    pub source: Source,
    pub reset_source: Source,
    pub reset_value: String,
    pub boot_default: String,
    pub value: String,
    pub in_file_flag: bool,
    pub stack: Vec<StackEntry>,
    pub source_file: Option<std::path::PathBuf>,
    pub source_line: Option<usize>,
    pub check: Option<CheckHook>,
    pub assign: Option<AssignHook>,
}

impl std::fmt::Debug for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("change_class", &self.change_class)
            .field("source", &self.source)
            .field("reset_source", &self.reset_source)
            .field("reset_value", &self.reset_value)
            .field("boot_default", &self.boot_default)
            .field("value", &self.value)
            .field("in_file_flag", &self.in_file_flag)
            .field("stack", &self.stack)
            .field("source_file", &self.source_file)
            .field("source_line", &self.source_line)
            .finish()
    }
}

impl Clone for Setting {
    /// Hooks are not clonable; a cloned snapshot carries no hooks. Only the
    /// registry's own copy of a `Setting` is ever invoked with its hooks.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            change_class: self.change_class,
            source: self.source,
            reset_source: self.reset_source,
            reset_value: self.reset_value.clone(),
            boot_default: self.boot_default.clone(),
            value: self.value.clone(),
            in_file_flag: self.in_file_flag,
            stack: self.stack.clone(),
            source_file: self.source_file.clone(),
            source_line: self.source_line,
            check: None,
            assign: None,
        }
    }
}

impl Setting {
    pub fn new(name: impl Into<String>, kind: SettingKind, change_class: ChangeClass, boot_default: impl Into<String>) -> Self {
        let boot_default = boot_default.into();
        Self {
            name: name.into(),
            kind,
            change_class,
            source: Source::Default,
            reset_source: Source::Default,
            reset_value: boot_default.clone(),
            boot_default,
            value: String::new(),
            in_file_flag: false,
            stack: Vec::new(),
            source_file: None,
            source_line: None,
            check: None,
            assign: None,
        }
        .with_value_from_default()
    }

    fn with_value_from_default(mut self) -> Self {
        self.value = self.boot_default.clone();
        self
    }

    pub fn with_check(mut self, check: CheckHook) -> Self {
        self.check = Some(check);
        self
    }

    pub fn with_assign(mut self, assign: AssignHook) -> Self {
        self.assign = Some(assign);
        self
    }
}

/// Returns true iff `prefix` appears (case-insensitively, comma-separated)
/// in `whitelist_value`.
pub fn is_custom_class(prefix: &str, whitelist_value: &str) -> bool {
    whitelist_value
        .split(',')
        .map(str::trim)
        .any(|class| class.eq_ignore_ascii_case(prefix))
}

/// The contract the reload engine depends on (spec §4.4). A concrete
/// process-wide store implements this in `pgconf::registry`.
pub trait Registry: Send + Sync {
    /// Looks up a setting by case-insensitive name.
    fn find(&self, name: &str) -> Option<Setting>;

    /// Reads the currently effective value, for change-detection logging.
    fn get_config_option(&self, name: &str) -> Option<String>;

    /// Validates (and, with `check`, canonicalizes) a proposed value
    /// without touching the registry.
    fn check_value(&self, name: &str, value: &str) -> ConfigResult<String>;

    /// The atomic validate-or-apply primitive. `value = None` resets to the
    /// setting's boot default. When `apply` is false this is a dry run: it
    /// still marks `in_file_flag` on success, but changes nothing else.
    fn set_config_option(
        &self,
        name: &str,
        value: Option<&str>,
        context: Context,
        source: Source,
        apply: bool,
    ) -> ConfigResult<()>;

    /// Records provenance after a successful commit.
    fn set_config_sourcefile(&self, name: &str, filename: &Path, line: usize);

    /// Creates a `String`-kind placeholder entry for a qualified name with
    /// no prior registration, at commit time only.
    fn register_placeholder(&self, name: &str, value: &str, source: Source) -> ConfigResult<()>;

    /// Clears `in_file_flag` on every registered setting (Phase C).
    fn clear_in_file_flags(&self);

    /// A snapshot of every registered setting, for removal detection
    /// (Phase R) and for the environment re-seed pass (Phase E).
    fn settings(&self) -> Vec<Setting>;

    /// Demotes any `source`, `reset_source`, and stack entries tagged
    /// `Source::File` down to `Source::Default` (Phase R, before the
    /// setting is reset to its boot default).
    fn demote_file_sourced(&self, name: &str);
}
