use pgconf::InMemoryRegistry;
use pgconf_core::registry::{ChangeClass, Setting, SettingKind};

/// A handful of representative settings standing in for the external
/// "setting definitions" spec.md §1 puts out of scope.
pub fn demo_registry() -> InMemoryRegistry {
    let registry = InMemoryRegistry::new();

    registry.register(Setting::new(
        "work_mem",
        SettingKind::String,
        ChangeClass::RuntimeByAny,
        "4MB",
    ));

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
