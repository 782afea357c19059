/// Separator between the namespace and the decimal timestamp in data keys,
/// and between the registry prefix and the namespace in registry keys.
pub const KEY_SEPARATOR: u8 = b'|';

/// Longest decimal rendering of an `i64` (`i64::MIN`, sign included).
pub const MAX_TIMESTAMP_DIGITS: usize = 20;

/// Value stored under every registry key.
pub const REGISTRY_MARKER: &[u8] = b"1";

/// Wraps `$name` in boundary bytes that can never occur in UTF-8 text.
macro_rules! reserved_prefix {
    ($name:expr) => {{
        const PREFIX: &[u8] = &{
            const LEN: usize = $name.len();
            let mut arr = [0u8; LEN + 2]; // Boundary + Name + Boundary

            arr[0] = 0xF7; // Start Boundary: invalid as a UTF-8 byte
            arr[LEN + 1] = 0xFD; // End Boundary: invalid as a UTF-8 byte

            let mut i = 0;
            while i < LEN {
                arr[i + 1] = $name[i];
                i += 1;
            }
            arr
        };
        PREFIX
    }};
}

/// Reserved keyspace holding one marker per registered namespace.
///
/// Namespaces are `String`s, so no data key can start with `0xF7`.
pub const REGISTRY_PREFIX: &[u8] = reserved_prefix!(b"namespaces");
