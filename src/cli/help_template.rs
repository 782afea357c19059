use indoc::indoc;

// Help text template with placeholder
pub const HELP_TEMPLATE: &str = indoc! {r#"
    Examples:
      # Appending a value explicitly
      %BINARY_NAME% data.bin put cpu "0.42"

      # Appending a value from stdin
      echo "0.42" | %BINARY_NAME% data.bin put cpu

      # Reading the latest value
      %BINARY_NAME% data.bin current cpu

      # Reading the last hour, newest first, at most 10 entries
      %BINARY_NAME% data.bin range cpu --begin now-1h --desc --limit 10

      # Collapsing everything older than a day into a checkpoint
      %BINARY_NAME% data.bin trim cpu now-1d
      %BINARY_NAME% data.bin trim-all now-1d

      # Listing namespaces
      %BINARY_NAME% data.bin namespaces

      # Compacting the storage file
      %BINARY_NAME% data.bin compact

      # Displaying storage file info
      %BINARY_NAME% data.bin info

    Set RUST_LOG (e.g. RUST_LOG=debug) to change log verbosity.
"#};
