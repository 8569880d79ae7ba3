/// Log tags identifying the subsystem a message comes from
///
/// Each tag has a debug key used by the `--debug-<key>` command-line flags.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Config,
    Import,
    Export,
    Decode,
    Reconcile,
    Store,
}

impl LogTag {
    /// All tags, in display order
    pub const ALL: [LogTag; 7] = [
        LogTag::System,
        LogTag::Config,
        LogTag::Import,
        LogTag::Export,
        LogTag::Decode,
        LogTag::Reconcile,
        LogTag::Store,
    ];

    /// Key used by `--debug-<key>` / `--verbose-<key>` flags
    pub fn to_debug_key(&self) -> String {
        self.to_plain_string().to_lowercase()
    }

    /// Uncolored tag label
    pub fn to_plain_string(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Config => "CONFIG",
            LogTag::Import => "IMPORT",
            LogTag::Export => "EXPORT",
            LogTag::Decode => "DECODE",
            LogTag::Reconcile => "RECONCILE",
            LogTag::Store => "STORE",
        }
    }

    /// Resolve a tag from its debug key
    pub fn from_debug_key(key: &str) -> Option<LogTag> {
        LogTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.to_debug_key() == key.to_lowercase())
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
