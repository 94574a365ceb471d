// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Query resources embedded in compiled binary units.

A *compiled unit* is a packaged binary artifact carrying named,
immutable data resources that were embedded at build time. This crate
lets callers enumerate those resources, filter them by name substring,
name list, or regular expression, and read each match as metadata, as
decoded text, or as a byte stream.

Units are abstracted behind the [CompiledUnit] trait so the query layer
stays independent of how resources were embedded. Three implementations
ship with the crate:

* [MemoryUnit] - resources registered in an in-memory table, e.g. by
  generated code.
* [PackedUnit] - resources parsed from packed resources data, typically
  a blob embedded via `include_bytes!`. See the `unit-packed-resources`
  crate for the data format.
* [ArchiveUnit] - resources read from a zip archive shipped next to the
  binary. Available via the `archive` crate feature, enabled by default.

Queries against a single unit go through [UnitResources]; the [query]
module holds the equivalent operations over multiple units, with results
concatenated in unit order. Filtering operations yield empty collections
when nothing matches; only the exact-name text lookup
([UnitResources::resource_string]) treats a missing resource as an
error.

Text projections decode with [DEFAULT_ENCODING] and are strict: content
that is not valid in that encoding is an error, never replacement
characters.
*/

pub mod memory;
pub use memory::MemoryUnit;
pub mod packed;
pub use packed::PackedUnit;
pub mod query;
pub use query::UnitResources;
pub mod selector;
pub use selector::{name_contains, Selector};
pub mod unit;
pub use unit::{CompiledUnit, ResourceDescriptor, ResourceRead};

#[cfg(feature = "archive")]
pub mod archive;
#[cfg(feature = "archive")]
pub use archive::ArchiveUnit;

/// The text encoding applied when projecting resource content to strings.
pub const DEFAULT_ENCODING: &encoding_rs::Encoding = encoding_rs::UTF_8;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("resource {name} not found in unit {unit}")]
    ResourceNotFound { unit: String, name: String },

    #[error("resource {name} in unit {unit} is not valid {encoding}")]
    ResourceDecode {
        unit: String,
        name: String,
        encoding: &'static str,
    },

    #[error("unit {unit} cannot be read: {reason}")]
    InvalidUnit { unit: String, reason: String },
}

/// Result type for this crate.
pub type ResourceResult<T> = std::result::Result<T, Error>;

/// Decode resource content bytes as text using [DEFAULT_ENCODING].
///
/// Decoding is strict: malformed input is an [Error::ResourceDecode],
/// never substituted with replacement characters. There is no special
/// handling of byte order marks.
pub(crate) fn decode_text(unit: &str, name: &str, data: &[u8]) -> ResourceResult<String> {
    DEFAULT_ENCODING
        .decode_without_bom_handling_and_without_replacement(data)
        .map(|text| text.into_owned())
        .ok_or_else(|| Error::ResourceDecode {
            unit: unit.to_string(),
            name: name.to_string(),
            encoding: DEFAULT_ENCODING.name(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_strict() {
        assert_eq!(
            decode_text("unit", "res", "caf\u{e9}".as_bytes()).unwrap(),
            "caf\u{e9}"
        );

        // 0xff is never valid UTF-8.
        let err = decode_text("unit", "res", b"\xffcontent").unwrap_err();
        assert!(matches!(err, Error::ResourceDecode { .. }));
        assert_eq!(
            err.to_string(),
            "resource res in unit unit is not valid UTF-8"
        );
    }

    #[test]
    fn test_decode_text_keeps_bom() {
        // A UTF-8 BOM is content, not metadata.
        let text = decode_text("unit", "res", b"\xef\xbb\xbfhi").unwrap();
        assert_eq!(text, "\u{feff}hi");
    }
}
