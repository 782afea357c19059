use crate::cli::{Cli, Commands};
use std::fmt::Display;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;
use tidemark::utils::{format_bytes, parse_timestamp};
use tidemark::{Clock, DataStore, Entry, ScanDirection, SystemClock, TimeSeriesStore};

/// Executes a parsed CLI command against the storage file.
///
/// Every command except `put` requires the storage file to exist already.
/// Failures are printed to stderr and terminate the process with exit code
/// `1`.
///
/// # References
/// - [`Commands`](crate::cli::Commands): Defines the available CLI commands.
/// - [`TimeSeriesStore`]: The namespace store driven by each command.
pub fn execute_command(cli: &Cli) {
    match &cli.command {
        Commands::Put { namespace, value } => {
            let store = TimeSeriesStore::new(or_exit(
                DataStore::open(&cli.storage),
                "Failed to open storage",
            ));

            let value = match value {
                Some(value) => value.clone().into_bytes(),
                None if !io::stdin().is_terminal() && std::env::var("FORCE_NO_TTY").is_err() => {
                    let mut buffer = Vec::new();
                    or_exit(
                        io::stdin().lock().read_to_end(&mut buffer),
                        "Failed to read stdin",
                    );
                    buffer
                }
                None => {
                    eprintln!("Error: No value provided and stdin is empty.");
                    std::process::exit(1);
                }
            };

            let entry = or_exit(store.put(namespace, &value), "Put failed");
            println!("Stored '{}' at {}", namespace, entry.timestamp);
        }

        Commands::Current { namespace } => {
            let store = open_existing_store(&cli.storage);

            match or_exit(store.get_current(namespace), "Read failed") {
                Some(entry) => print_entries(&[entry]),
                None => {
                    eprintln!("Error: Namespace '{}' has no entries", namespace);
                    std::process::exit(1);
                }
            }
        }

        Commands::Range {
            namespace,
            begin,
            end,
            limit,
            desc,
        } => {
            let store = open_existing_store(&cli.storage);
            let now = store.clock().now_millis();

            let begin = begin.as_deref().map_or(Ok(0), |b| parse_timestamp(b, now));
            let end = end
                .as_deref()
                .map_or(Ok(i64::MAX), |e| parse_timestamp(e, now));
            let (begin, end) = (or_exit(begin, "Invalid --begin"), or_exit(end, "Invalid --end"));

            let direction = if *desc {
                ScanDirection::Descending
            } else {
                ScanDirection::Ascending
            };

            let entries = or_exit(
                store.get_range(namespace, begin, end, *limit, direction),
                "Range query failed",
            );
            print_entries(&entries);
        }

        Commands::Trim {
            namespace,
            boundary,
        } => {
            let store = open_existing_store(&cli.storage);
            let boundary = or_exit(
                parse_timestamp(boundary, store.clock().now_millis()),
                "Invalid boundary",
            );

            let stats = or_exit(store.trim(namespace, boundary), "Trim failed");
            println!("Trimmed '{}' at {}: {}", namespace, boundary, stats);
        }

        Commands::TrimAll { boundary } => {
            let store = open_existing_store(&cli.storage);
            let boundary = or_exit(
                parse_timestamp(boundary, store.clock().now_millis()),
                "Invalid boundary",
            );

            let stats = or_exit(store.trim_all(boundary), "Trim failed");
            println!("Trimmed all namespaces at {}: {}", boundary, stats);
        }

        Commands::Namespaces => {
            let store = open_existing_store(&cli.storage);

            let stdout = io::stdout();
            let mut stdout_handle = stdout.lock();
            for namespace in or_exit(store.namespaces(), "Failed to list namespaces") {
                or_exit(
                    writeln!(stdout_handle, "{}", namespace),
                    "Failed to write output",
                );
            }
        }

        Commands::Compact => {
            let mut storage = or_exit(
                DataStore::open_existing(&cli.storage),
                "Failed to open storage",
            );
            println!("Starting compaction...");
            if let Err(e) = storage.compact() {
                eprintln!("Compaction failed: {}", e);
                std::process::exit(1);
            }
            println!("Compaction completed successfully.");
        }

        Commands::Info => {
            let store = open_existing_store(&cli.storage);
            let storage = store.engine();

            // Retrieve storage file size
            let storage_size = storage.storage_size().unwrap_or(0);

            // Get compaction savings estimate
            let savings_estimate = or_exit(
                storage.estimate_compaction_savings(),
                "Failed to estimate compaction savings",
            );

            let key_count = or_exit(storage.live_count(), "Failed to count keys");
            let namespaces = or_exit(store.namespaces(), "Failed to list namespaces");

            println!("\n{:=^50}", " STORAGE INFO ");
            println!("{:<25} {:?}", "STORAGE FILE:", cli.storage);
            println!("{:-<50}", ""); // Separator

            println!("{:<25} {}", "TOTAL SIZE:", format_bytes(storage_size));
            println!("{:<25} {}", "NAMESPACES:", namespaces.len());
            println!(
                "{:<25} {}",
                "LIVE ENTRIES:",
                key_count.saturating_sub(namespaces.len())
            );
            println!(
                "{:<25} {}",
                "COMPACTION SAVINGS:",
                format_bytes(savings_estimate)
            );

            println!("{:=<50}", ""); // Footer
        }
    }
}

fn open_existing_store(path: &Path) -> TimeSeriesStore<DataStore, SystemClock> {
    TimeSeriesStore::new(or_exit(
        DataStore::open_existing(path),
        "Failed to open storage",
    ))
}

/// Prints `timestamp<TAB>value` lines; values are shown as lossy UTF-8.
fn print_entries(entries: &[Entry]) {
    let stdout = io::stdout();
    let mut stdout_handle = stdout.lock();

    for entry in entries {
        or_exit(
            writeln!(
                stdout_handle,
                "{}\t{}",
                entry.timestamp,
                String::from_utf8_lossy(&entry.value)
            ),
            "Failed to write output",
        );
    }
}

fn or_exit<T, E: Display>(result: Result<T, E>, context: &str) -> T {
    result.unwrap_or_else(|err| {
        eprintln!("{}: {}", context, err);
        std::process::exit(1);
    })
}
