// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Unit Packed Resources

This crate defines and implements a data format for storing named data
resources inside a compiled binary unit. We call this data format
*packed unit resources*.

The idea is that a producer collects the data resources a program wants
available at run time, names each one, and serializes all of them out to
a single binary data structure, which is then embedded in a compiled
binary (e.g. via `include_bytes!`) or shipped next to it. Later, the
data structure is parsed back into its constituent resources without
copying their content bytes out of the blob.

# Data Format

A packed resources blob is, in order:

* An 8 byte header, `unitres` followed by a version byte (`\x01`).
* A global header consisting of a `u8` count of blob sections, a `u32`
  length of the blob index, a `u32` count of resources, and a `u32`
  length of the resources index. Multi-byte integers are little-endian
  throughout.
* The *blob index*: one entry per blob section, each a sequence of
  tagged fields (start of entry, resource field type, raw payload
  length, end of entry), terminated by an end of index marker.
* The *resources index*: one entry per resource, each a sequence of
  tagged fields declaring the length of that resource's name (`u16`)
  and, if non-empty, its data (`u64`), terminated by an end of index
  marker. The name field is required.
* The blob payloads, grouped by field in blob index order: every
  resource name back to back, then every resource's data back to back.

Lengths in the index are relied upon to locate a given resource's bytes
within the payload sections, so resources can be accessed as slices of
the original blob.
*/

mod parser;
mod resource;
mod serialization;
mod writer;

pub use crate::{
    parser::{load_resource_pack, ResourcePackIterator},
    resource::PackedResource,
    serialization::HEADER_V1,
    writer::write_resource_pack_v1,
};
