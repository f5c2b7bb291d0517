//! Drawing bookkeeping records.
//!
//! - `Dg` (`0xF008`): per-drawing shape count and last shape id; the drawing
//!   group id lives in the instance field
//! - `Dgg` (`0xF006`): file-wide shape id bookkeeping with id clusters

use super::{record_body, require};
use crate::common::binary::{read_u32_le, write_slice, write_u32_le};
use crate::common::error::Result;
use crate::escher::header::{HEADER_SIZE, RecordHeader};
use crate::escher::types::record_id;
use bytes::Bytes;

/// Shape ids available per id cluster.
pub const SHAPES_PER_CLUSTER: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherDgRecord {
    pub(crate) header: RecordHeader,
    num_shapes: u32,
    last_shape_id: u32,
    remaining: Bytes,
}

impl Default for EscherDgRecord {
    fn default() -> Self {
        Self::with_header(RecordHeader::new(0x0000, record_id::DG))
    }
}

impl EscherDgRecord {
    pub fn new(drawing_group_id: u16) -> Self {
        let mut record = Self::default();
        record.set_drawing_group_id(drawing_group_id);
        record
    }

    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            num_shapes: 0,
            last_shape_id: 0,
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        require(body, 8, self.header.record_id(), offset)?;
        self.num_shapes = read_u32_le(body, 0)?;
        self.last_shape_id = read_u32_le(body, 4)?;
        self.remaining = Bytes::copy_from_slice(&body[8..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_u32_le(data, offset, self.num_shapes)?;
        write_u32_le(data, offset + 4, self.last_shape_id)?;
        write_slice(data, offset + 8, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        8 + self.remaining.len()
    }

    #[inline]
    pub fn num_shapes(&self) -> u32 {
        self.num_shapes
    }

    pub fn set_num_shapes(&mut self, num_shapes: u32) {
        self.num_shapes = num_shapes;
    }

    #[inline]
    pub fn last_shape_id(&self) -> u32 {
        self.last_shape_id
    }

    pub fn set_last_shape_id(&mut self, last_shape_id: u32) {
        self.last_shape_id = last_shape_id;
    }

    /// Drawing group id, stored in the instance field (`options >> 4`).
    #[inline]
    pub fn drawing_group_id(&self) -> u16 {
        self.header.instance()
    }

    pub fn set_drawing_group_id(&mut self, id: u16) {
        self.header.set_instance(id);
    }

    pub fn increment_shape_count(&mut self) {
        self.num_shapes += 1;
    }
}

/// Shape ids used by one drawing inside one 1024-id slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdCluster {
    pub drawing_group_id: u32,
    pub num_shape_ids_used: u32,
}

impl FileIdCluster {
    pub const fn new(drawing_group_id: u32, num_shape_ids_used: u32) -> Self {
        Self {
            drawing_group_id,
            num_shape_ids_used,
        }
    }
}

const DGG_FIXED_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherDggRecord {
    pub(crate) header: RecordHeader,
    shape_id_max: u32,
    num_shapes_saved: u32,
    drawings_saved: u32,
    clusters: Vec<FileIdCluster>,
    max_dg_id: u32,
    remaining: Bytes,
}

impl Default for EscherDggRecord {
    fn default() -> Self {
        Self::with_header(RecordHeader::new(0x0000, record_id::DGG))
    }
}

impl EscherDggRecord {
    pub(crate) fn with_header(header: RecordHeader) -> Self {
        Self {
            header,
            shape_id_max: 0,
            num_shapes_saved: 0,
            drawings_saved: 0,
            clusters: Vec::new(),
            max_dg_id: 0,
            remaining: Bytes::new(),
        }
    }

    pub(crate) fn fill(&mut self, data: &[u8], offset: usize) -> Result<usize> {
        let body = record_body(data, offset, self.header.record_id())?;
        require(body, DGG_FIXED_SIZE, self.header.record_id(), offset)?;
        self.shape_id_max = read_u32_le(body, 0)?;
        // The stored cluster count (offset 4) is not trusted; the body length decides.
        self.num_shapes_saved = read_u32_le(body, 8)?;
        self.drawings_saved = read_u32_le(body, 12)?;

        let count = (body.len() - DGG_FIXED_SIZE) / 8;
        self.clusters = (0..count)
            .map(|i| {
                let pos = DGG_FIXED_SIZE + i * 8;
                Ok(FileIdCluster::new(
                    read_u32_le(body, pos)?,
                    read_u32_le(body, pos + 4)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        self.max_dg_id = self
            .clusters
            .iter()
            .map(|c| c.drawing_group_id)
            .max()
            .unwrap_or(0);

        self.remaining = Bytes::copy_from_slice(&body[DGG_FIXED_SIZE + count * 8..]);
        Ok(HEADER_SIZE + body.len())
    }

    pub(crate) fn serialize_body(&self, data: &mut [u8], offset: usize) -> Result<usize> {
        write_u32_le(data, offset, self.shape_id_max)?;
        write_u32_le(data, offset + 4, self.num_id_clusters())?;
        write_u32_le(data, offset + 8, self.num_shapes_saved)?;
        write_u32_le(data, offset + 12, self.drawings_saved)?;
        let mut pos = offset + DGG_FIXED_SIZE;
        for cluster in &self.clusters {
            write_u32_le(data, pos, cluster.drawing_group_id)?;
            write_u32_le(data, pos + 4, cluster.num_shape_ids_used)?;
            pos += 8;
        }
        write_slice(data, pos, &self.remaining)?;
        Ok(self.body_size())
    }

    pub(crate) fn body_size(&self) -> usize {
        DGG_FIXED_SIZE + self.clusters.len() * 8 + self.remaining.len()
    }

    #[inline]
    pub fn shape_id_max(&self) -> u32 {
        self.shape_id_max
    }

    pub fn set_shape_id_max(&mut self, shape_id_max: u32) {
        self.shape_id_max = shape_id_max;
    }

    /// Number of id clusters plus one, as stored on disk.
    pub fn num_id_clusters(&self) -> u32 {
        self.clusters.len() as u32 + 1
    }

    #[inline]
    pub fn num_shapes_saved(&self) -> u32 {
        self.num_shapes_saved
    }

    pub fn set_num_shapes_saved(&mut self, value: u32) {
        self.num_shapes_saved = value;
    }

    #[inline]
    pub fn drawings_saved(&self) -> u32 {
        self.drawings_saved
    }

    pub fn set_drawings_saved(&mut self, value: u32) {
        self.drawings_saved = value;
    }

    /// Highest drawing group id seen in any cluster.
    #[inline]
    pub fn max_drawing_group_id(&self) -> u32 {
        self.max_dg_id
    }

    pub fn file_id_clusters(&self) -> &[FileIdCluster] {
        &self.clusters
    }

    pub fn set_file_id_clusters(&mut self, clusters: Vec<FileIdCluster>) {
        self.max_dg_id = clusters
            .iter()
            .map(|c| c.drawing_group_id)
            .max()
            .unwrap_or(0);
        self.clusters = clusters;
    }

    /// Append a cluster, optionally re-sorting by drawing group id.
    pub fn add_cluster(&mut self, drawing_group_id: u32, num_shape_ids_used: u32, sort: bool) -> FileIdCluster {
        let cluster = FileIdCluster::new(drawing_group_id, num_shape_ids_used);
        self.clusters.push(cluster);
        self.max_dg_id = self.max_dg_id.max(drawing_group_id);
        if sort {
            self.clusters.sort_by_key(|c| c.drawing_group_id);
        }
        cluster
    }

    /// Allocate the next shape id for `dg` and update both drawings' counters.
    ///
    /// Reuses the first cluster of the drawing group with free ids, else
    /// appends a new one. Ids are `cluster_index * 1024 + used`, with the
    /// cluster index counted from 1.
    pub fn allocate_shape_id(&mut self, dg: &mut EscherDgRecord) -> u32 {
        let drawing_group_id = dg.drawing_group_id() as u32;
        self.num_shapes_saved += 1;

        let index = match self.clusters.iter().position(|c| {
            c.drawing_group_id == drawing_group_id && c.num_shape_ids_used < SHAPES_PER_CLUSTER
        }) {
            Some(index) => index,
            None => {
                self.add_cluster(drawing_group_id, 0, false);
                self.clusters.len() - 1
            },
        };

        let cluster = &mut self.clusters[index];
        let shape_id = (index as u32 + 1) * SHAPES_PER_CLUSTER + cluster.num_shape_ids_used;
        cluster.num_shape_ids_used += 1;

        dg.increment_shape_count();
        dg.set_last_shape_id(shape_id);
        self.shape_id_max = self.shape_id_max.max(shape_id + 1);
        tracing::debug!(drawing_group_id, shape_id, cluster = index + 1, "allocated shape id");
        shape_id
    }
}
