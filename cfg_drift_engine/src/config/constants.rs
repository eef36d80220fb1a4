//! Fixed layout and format constants

pub mod fragments {
    /// Extension shared by fragment files and device snapshots
    pub const CONFIG_EXTENSION: &str = "cfg";

    /// Category whose templates are compared as banner blocks
    pub const BANNER_CATEGORY: &str = "banners";
}

pub mod snapshots {
    /// Entries under the snapshot root that are never snapshots
    pub const RESERVED_NAMES: &[&str] = &["examples", "README.md"];
}

pub mod report {
    /// Column header written once per report file
    pub const CSV_HEADER: [&str; 7] = [
        "Timestamp",
        "Device",
        "Category",
        "Template_Used",
        "Status",
        "Mode",
        "Details",
    ];

    /// Report file name stamp, minute precision so one run shares a file
    pub const FILE_STAMP_FORMAT: &str = "%Y-%m-%dT%H-%M";

    /// Per-row timestamp format
    pub const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub const FILE_PREFIX: &str = "compliance_";

    /// Template column value when no template applies
    pub const NO_TEMPLATE: &str = "N/A";

    /// Template column value for verdicts against the whole template set
    pub const ANY_TEMPLATE: &str = "any template";
}

pub mod drift {
    /// Upper bound for a single external diff invocation
    pub const DIFF_TIMEOUT_SECS: u64 = 30;

    pub const DIFF_PROGRAM: &str = "diff";
    pub const COLOR_DIFF_PROGRAM: &str = "colordiff";

    /// Search path handed to external tools
    pub const TOOL_PATH: &str = "/usr/local/bin:/usr/bin:/bin:/usr/sbin:/sbin";
}
