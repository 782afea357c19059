use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append a value to a namespace at the current time
    Put {
        /// The namespace to write to
        namespace: String,

        /// The value to store (optional; reads from stdin if not provided)
        value: Option<String>,
    },

    /// Print the latest value of a namespace
    Current {
        /// The namespace to read
        namespace: String,
    },

    /// List entries whose timestamps fall inside an inclusive interval
    Range {
        /// The namespace to read
        namespace: String,

        /// Lower bound: epoch millis, `now`, or `now-<n><ms|s|m|h|d>` (default: 0)
        #[arg(short = 'b', long = "begin", value_name = "TIME")]
        begin: Option<String>,

        /// Upper bound, same formats as --begin (default: no upper bound)
        #[arg(short = 'e', long = "end", value_name = "TIME")]
        end: Option<String>,

        /// Maximum number of entries to print
        #[arg(short = 'n', long = "limit", value_name = "COUNT")]
        limit: Option<usize>,

        /// Newest entries first
        #[arg(short = 'd', long = "desc")]
        desc: bool,
    },

    /// Collapse a namespace's history at or below a boundary into one checkpoint
    Trim {
        /// The namespace to trim
        namespace: String,

        /// Boundary: epoch millis, `now`, or `now-<n><ms|s|m|h|d>`
        boundary: String,
    },

    /// Trim every namespace at the same boundary in one atomic write
    TrimAll {
        /// Boundary: epoch millis, `now`, or `now-<n><ms|s|m|h|d>`
        boundary: String,
    },

    /// List every namespace that has received a value
    Namespaces,

    /// Compact the storage file to drop deleted and overwritten records
    Compact,

    /// Get current state of storage file
    Info,
}
