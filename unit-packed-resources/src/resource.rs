// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::borrow::Cow;

/// Represents an indexed resource inside a resource pack.
///
/// Fields are `Cow<T>` and can either hold a borrowed reference or owned
/// data. Instances produced by the parser borrow from the packed data
/// blob, enabling zero-copy reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedResource<'a> {
    /// The resource name.
    ///
    /// Names serve as the lookup key within a pack.
    pub name: Cow<'a, str>,

    /// The resource content bytes.
    pub data: Cow<'a, [u8]>,
}

impl<'a> Default for PackedResource<'a> {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed(""),
            data: Cow::Borrowed(&[]),
        }
    }
}

impl<'a> PackedResource<'a> {
    /// Convert the instance to a variant that owns all its data.
    pub fn to_owned(&self) -> PackedResource<'static> {
        PackedResource {
            name: Cow::Owned(self.name.clone().into_owned()),
            data: Cow::Owned(self.data.clone().into_owned()),
        }
    }
}
