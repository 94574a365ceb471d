// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Parsing of packed resources data blobs. */

use {
    crate::{
        resource::PackedResource,
        serialization::{BlobSectionField, ResourceField, HEADER_V1},
    },
    byteorder::{LittleEndian, ReadBytesExt},
    std::{borrow::Cow, io::Cursor},
};

/// Represents a blob section in the blob index.
#[derive(Debug)]
struct BlobSection {
    resource_field: u8,
    raw_payload_length: usize,
}

/// Holds state used to read an individual blob section.
#[derive(Clone, Copy, Debug)]
struct BlobSectionReadState {
    offset: usize,
}

/// An iterator over an actively parsed packed resources data structure.
///
/// The iterator emits [PackedResource] instances borrowing from the
/// source data. The index data for a given resource is not read or
/// validated until the iterator attempts to deserialize it.
pub struct ResourcePackIterator<'a> {
    done: bool,
    data: &'a [u8],
    reader: Cursor<&'a [u8]>,
    blob_sections: [Option<BlobSectionReadState>; 256],
    claimed_resources_count: usize,
    read_resources_count: usize,
}

impl<'a> ResourcePackIterator<'a> {
    /// The expected number of resources we will emit.
    pub fn expected_resources_count(&self) -> usize {
        self.claimed_resources_count
    }

    /// Resolve a slice to an individual blob's data.
    ///
    /// Advances the read offset of the section belonging to the given
    /// resource field by the blob's length.
    fn resolve_blob_data(
        &mut self,
        resource_field: ResourceField,
        length: usize,
    ) -> Result<&'a [u8], &'static str> {
        let state = self.blob_sections[resource_field as usize]
            .as_mut()
            .ok_or("resource field has no blob section")?;

        let end = state
            .offset
            .checked_add(length)
            .ok_or("blob data extends beyond payload")?;

        if end > self.data.len() {
            return Err("blob data extends beyond payload");
        }

        let blob = &self.data[state.offset..end];

        state.offset = end;

        Ok(blob)
    }

    fn parse_next(&mut self) -> Result<Option<PackedResource<'a>>, &'static str> {
        let mut current_name = None;
        let mut current_data = None;

        loop {
            let field_type = self
                .reader
                .read_u8()
                .map_err(|_| "failed reading field type")?;

            let field_type = ResourceField::try_from(field_type)?;

            match field_type {
                ResourceField::EndOfIndex => {
                    self.done = true;

                    if self.read_resources_count != self.claimed_resources_count {
                        return Err("mismatch between advertised index count and actual");
                    }

                    return Ok(None);
                }
                ResourceField::StartOfEntry => {
                    self.read_resources_count += 1;
                    current_name = None;
                    current_data = None;
                }
                ResourceField::EndOfEntry => {
                    return if let Some(name) = current_name {
                        Ok(Some(PackedResource {
                            name: Cow::Borrowed(name),
                            data: Cow::Borrowed(current_data.unwrap_or(&[])),
                        }))
                    } else {
                        Err("resource name field is required")
                    };
                }
                ResourceField::Name => {
                    let l = self
                        .reader
                        .read_u16::<LittleEndian>()
                        .map_err(|_| "failed reading resource name length")?
                        as usize;

                    let name = std::str::from_utf8(self.resolve_blob_data(field_type, l)?)
                        .map_err(|_| "resource name is not valid UTF-8")?;

                    current_name = Some(name);
                }
                ResourceField::Data => {
                    let l = self
                        .reader
                        .read_u64::<LittleEndian>()
                        .map_err(|_| "failed reading resource data length")?
                        as usize;

                    current_data = Some(self.resolve_blob_data(field_type, l)?);
                }
            }
        }
    }
}

impl<'a> Iterator for ResourcePackIterator<'a> {
    type Item = Result<PackedResource<'a>, &'static str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.parse_next() {
            Ok(res) => res.map(Ok),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Parse a packed resources data structure.
///
/// The data structure is parsed lazily via an iterator that emits
/// reconstructed [PackedResource] instances.
///
/// Performance note: error handling in this code is intentionally
/// primitive, as richer error types measurably slow down the hot parse
/// path.
pub fn load_resource_pack(data: &[u8]) -> Result<ResourcePackIterator<'_>, &'static str> {
    if data.len() < HEADER_V1.len() {
        return Err("error reading 8 byte header");
    }

    let header = &data[0..8];

    if header == HEADER_V1 {
        load_resource_pack_v1(&data[8..])
    } else {
        Err("unrecognized file format")
    }
}

fn load_resource_pack_v1(data: &[u8]) -> Result<ResourcePackIterator<'_>, &'static str> {
    let mut reader = Cursor::new(data);

    let blob_section_count = reader
        .read_u8()
        .map_err(|_| "failed reading blob section count")?;
    let blob_index_length = reader
        .read_u32::<LittleEndian>()
        .map_err(|_| "failed reading blob index length")? as usize;
    let resources_count = reader
        .read_u32::<LittleEndian>()
        .map_err(|_| "failed reading resources count")? as usize;
    let resources_index_length = reader
        .read_u32::<LittleEndian>()
        .map_err(|_| "failed reading resources index length")?
        as usize;

    let mut current_field = None;
    let mut current_payload_length = None;
    let mut blob_entry_count = 0;
    let mut blob_sections = Vec::with_capacity(blob_section_count as usize);

    if blob_section_count != 0 || blob_index_length != 0 {
        loop {
            let field_type = reader
                .read_u8()
                .map_err(|_| "failed reading blob section field type")?;

            let field_type = BlobSectionField::try_from(field_type)?;

            match field_type {
                BlobSectionField::EndOfIndex => break,
                BlobSectionField::StartOfEntry => {
                    blob_entry_count += 1;
                    current_field = None;
                    current_payload_length = None;
                }
                BlobSectionField::EndOfEntry => {
                    match (current_field.take(), current_payload_length.take()) {
                        (Some(resource_field), Some(raw_payload_length)) => {
                            blob_sections.push(BlobSection {
                                resource_field,
                                raw_payload_length,
                            });
                        }
                        (None, _) => return Err("blob resource field is required"),
                        (_, None) => return Err("blob raw payload length is required"),
                    }
                }
                BlobSectionField::ResourceFieldType => {
                    let field = reader
                        .read_u8()
                        .map_err(|_| "failed reading blob resource field value")?;
                    current_field = Some(field);
                }
                BlobSectionField::RawPayloadLength => {
                    let l = reader
                        .read_u64::<LittleEndian>()
                        .map_err(|_| "failed reading raw payload length")?;
                    current_payload_length = Some(l as usize);
                }
            }
        }
    }

    if blob_entry_count != blob_section_count {
        return Err("mismatch between blob sections count");
    }

    // Array indexing resource field to current payload offset within that section.
    let mut blob_offsets: [Option<BlobSectionReadState>; 256] = [None; 256];

    // Global payload offset where blobs data starts. Declared lengths
    // can exceed what an address space holds, so the arithmetic is
    // checked.
    let blob_start_offset =
        // Global header.
        (1usize + 4 + 4 + 4)
            .checked_add(blob_index_length)
            .and_then(|offset| offset.checked_add(resources_index_length))
            .ok_or("blob data extends beyond payload")?;
    // Current offset from start of blobs data.
    let mut current_blob_offset = 0;

    for section in &blob_sections {
        let section_start_offset = blob_start_offset
            .checked_add(current_blob_offset)
            .ok_or("blob data extends beyond payload")?;
        blob_offsets[section.resource_field as usize] = Some(BlobSectionReadState {
            offset: section_start_offset,
        });
        current_blob_offset = current_blob_offset
            .checked_add(section.raw_payload_length)
            .ok_or("blob data extends beyond payload")?;
    }

    Ok(ResourcePackIterator {
        done: resources_index_length == 0 || resources_count == 0,
        data,
        reader,
        blob_sections: blob_offsets,
        claimed_resources_count: resources_count,
        read_resources_count: 0,
    })
}
