//! Embedded built-in effect catalog, keyed by full `Type::Member(Param,Param)`
//! signature. Process-global and immutable after construction — the
//! built-in effect catalog is presented as process-global read-only.

use crate::features::effect_model::{Effect, EffectKind, EffectSet};
use crate::features::effect_resolver::domain::BuiltinCatalog;
use lazy_static::lazy_static;
use std::collections::HashMap;

pub struct StaticBuiltinCatalog {
    specs: HashMap<&'static str, EffectSet>,
}

impl StaticBuiltinCatalog {
    fn new() -> Self {
        let mut specs = HashMap::new();
        macro_rules! pure {
            ($sig:expr) => {
                specs.insert($sig, EffectSet::empty());
            };
        }
        macro_rules! effect {
            ($sig:expr, $kind:expr, $value:expr) => {
                specs.insert($sig, EffectSet::single(Effect::new($kind, $value)));
            };
        }

        // Console
        effect!("Console::WriteLine(string)", EffectKind::Io, "console_write");
        effect!("Console::Write(string)", EffectKind::Io, "console_write");
        effect!("Console::ReadLine()", EffectKind::Io, "console_read");

        // Pure math / collection helpers, mirroring a trusted-library allowlist.
        pure!("Math::Abs(int)");
        pure!("Math::Max(int,int)");
        pure!("Math::Min(int,int)");
        pure!("string::Length()");
        pure!("List::Count()");

        // Filesystem
        effect!(
            "File::ReadAllText(string)",
            EffectKind::Io,
            "filesystem_read"
        );
        effect!(
            "File::WriteAllText(string,string)",
            EffectKind::Io,
            "filesystem_write"
        );
        effect!("File::Delete(string)", EffectKind::Io, "file_delete");

        // Network / HTTP
        effect!(
            "HttpClient::GetAsync(string)",
            EffectKind::Io,
            "network_http"
        );

        // Database
        effect!(
            "db::execute(string)",
            EffectKind::Io,
            "database_readwrite"
        );
        effect!(
            "db::execute_param(string,string)",
            EffectKind::Io,
            "database_readwrite"
        );

        // Randomness / time
        effect!("Random::Next()", EffectKind::Nondeterminism, "random");
        effect!("DateTime::Now()", EffectKind::Nondeterminism, "time");

        Self { specs }
    }

    pub fn known_signatures(&self) -> Vec<&str> {
        self.specs.keys().copied().collect()
    }
}

impl BuiltinCatalog for StaticBuiltinCatalog {
    fn lookup(&self, signature: &str) -> Option<EffectSet> {
        self.specs.get(signature).cloned()
    }
}

lazy_static! {
    pub static ref BUILTIN_CATALOG: StaticBuiltinCatalog = StaticBuiltinCatalog::new();
}

impl BuiltinCatalog for &'static StaticBuiltinCatalog {
    fn lookup(&self, signature: &str) -> Option<EffectSet> {
        (**self).lookup(signature)
    }
}

/// The process-global catalog behind the `Arc<dyn BuiltinCatalog>` the
/// resolver's constructor takes, built once per process via [`BUILTIN_CATALOG`].
pub fn shared_catalog() -> std::sync::Arc<dyn BuiltinCatalog> {
    std::sync::Arc::new(&*BUILTIN_CATALOG)
}
