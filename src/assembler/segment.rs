/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::ast::Segment;
use crate::errors::AssemblyError;

/// The four byte cursors and the active-segment tag a pass walks with. A
/// segment directive resets its segment's cursor to the explicit address, or
/// to the architectural base when none is written.
pub struct SegmentCursors {
    active: Segment,
    text: u32,
    data: u32,
    ktext: u32,
    kdata: u32,
}

impl SegmentCursors {
    pub fn new() -> Self {
        Self {
            active: Segment::Text,
            text: Segment::Text.base(),
            data: Segment::Data.base(),
            ktext: Segment::KText.base(),
            kdata: Segment::KData.base(),
        }
    }

    pub fn active(&self) -> Segment {
        self.active
    }

    pub fn cursor(&self) -> u32 {
        match self.active {
            Segment::Text => self.text,
            Segment::Data => self.data,
            Segment::KText => self.ktext,
            Segment::KData => self.kdata,
        }
    }

    fn cursor_mut(&mut self) -> &mut u32 {
        match self.active {
            Segment::Text => &mut self.text,
            Segment::Data => &mut self.data,
            Segment::KText => &mut self.ktext,
            Segment::KData => &mut self.kdata,
        }
    }

    pub fn switch(&mut self, segment: Segment, address: Option<u32>) {
        self.active = segment;
        *self.cursor_mut() = address.unwrap_or(segment.base());
    }

    pub fn advance(&mut self, bytes: u32) {
        *self.cursor_mut() += bytes;
    }

    // round the cursor up to a multiple of 2^power
    pub fn align(&mut self, power: u32) {
        let mask = (1u32 << power) - 1;
        let cursor = self.cursor_mut();
        *cursor = (*cursor + mask) & !mask;
    }
}

impl Default for SegmentCursors {
    fn default() -> Self {
        Self::new()
    }
}

/// Append-only byte image of one segment. The base is the first written
/// address; gaps the cursor skipped (alignment, .space holes, explicit
/// addresses) are zero filled, and writing below the high-water mark is a
/// segment-misuse error.
#[derive(Debug, PartialEq)]
pub struct SegmentImage {
    segment: Segment,
    base: Option<u32>,
    pub bytes: Vec<u8>,
}

impl SegmentImage {
    fn new(segment: Segment) -> Self {
        Self {
            segment,
            base: None,
            bytes: Vec::new(),
        }
    }

    /// Address of the first byte of this image.
    pub fn base(&self) -> u32 {
        self.base.unwrap_or_else(|| self.segment.base())
    }

    pub fn write(&mut self, address: u32, data: &[u8], line: usize) -> Result<(), AssemblyError> {
        if data.is_empty() {
            return Ok(());
        }

        let base = *self.base.get_or_insert(address);
        let end = base + self.bytes.len() as u32;
        if address < end {
            return Err(AssemblyError::SegmentMisuse {
                line,
                reason: format!(
                    "Write at 0x{:08x} overlaps bytes already emitted to the {} segment.",
                    address,
                    self.segment.name()
                ),
            });
        }

        let offset = (address - base) as usize;
        if offset > self.bytes.len() {
            self.bytes.resize(offset, 0x00);
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }
}

/// The four per-segment images emission appends into.
#[derive(Debug, PartialEq)]
pub struct SegmentSet {
    pub text: SegmentImage,
    pub data: SegmentImage,
    pub ktext: SegmentImage,
    pub kdata: SegmentImage,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self {
            text: SegmentImage::new(Segment::Text),
            data: SegmentImage::new(Segment::Data),
            ktext: SegmentImage::new(Segment::KText),
            kdata: SegmentImage::new(Segment::KData),
        }
    }

    pub fn get(&self, segment: Segment) -> &SegmentImage {
        match segment {
            Segment::Text => &self.text,
            Segment::Data => &self.data,
            Segment::KText => &self.ktext,
            Segment::KData => &self.kdata,
        }
    }

    pub fn get_mut(&mut self, segment: Segment) -> &mut SegmentImage {
        match segment {
            Segment::Text => &mut self.text,
            Segment::Data => &mut self.data,
            Segment::KText => &mut self.ktext,
            Segment::KData => &mut self.kdata,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Segment, &SegmentImage)> {
        [
            (Segment::Text, &self.text),
            (Segment::Data, &self.data),
            (Segment::KText, &self.ktext),
            (Segment::KData, &self.kdata),
        ]
        .into_iter()
    }
}

impl Default for SegmentSet {
    fn default() -> Self {
        Self::new()
    }
}
