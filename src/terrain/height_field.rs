//! Height fields: elevation and surface normal per grid intersection

use glam::{DVec3, Vec3};

use super::sampler::NoiseSampler;
use crate::core::{Error, Result};

/// Elevation and normal at integer grid coordinates.
///
/// Both methods are pure functions of `(column, row)`.
pub trait HeightField {
    fn height(&self, column: u32, row: u32) -> f64;
    fn normal(&self, column: u32, row: u32) -> Vec3;
}

/// Flat terrain: zero height, normal straight up
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatHeightField;

impl HeightField for FlatHeightField {
    fn height(&self, _column: u32, _row: u32) -> f64 {
        0.0
    }

    fn normal(&self, _column: u32, _row: u32) -> Vec3 {
        Vec3::Y
    }
}

/// Number of grid intersections for a `columns x rows` grid.
///
/// Fails if either dimension is zero, or if the vertex count or the index
/// count (six per cell) does not fit the `u32` index buffer.
pub(crate) fn intersection_count(columns: u32, rows: u32) -> Result<usize> {
    if columns == 0 || rows == 0 {
        return Err(Error::InvalidGrid { columns, rows, reason: "dimensions must be at least 1" });
    }
    let count = (columns as u64 + 1) * (rows as u64 + 1);
    if count > u32::MAX as u64 {
        return Err(Error::InvalidGrid { columns, rows, reason: "vertex count exceeds u32 index range" });
    }
    if 6 * columns as u64 * rows as u64 > u32::MAX as u64 {
        return Err(Error::InvalidGrid { columns, rows, reason: "index count exceeds u32 range" });
    }
    Ok(count as usize)
}

/// Heights sampled on a `(columns + 1) x (rows + 1)` grid, with normals
/// estimated from neighbouring samples.
#[derive(Clone, Debug)]
pub struct ComputedHeightField {
    columns: u32,
    rows: u32,
    /// Column-major: `column * (rows + 1) + row`
    heights: Vec<f64>,
}

impl ComputedHeightField {
    /// Sample `height(column, row)` at every grid intersection
    pub fn from_fn<F>(columns: u32, rows: u32, height: F) -> Result<Self>
    where
        F: Fn(u32, u32) -> f64,
    {
        let count = intersection_count(columns, rows)?;
        let mut heights = Vec::with_capacity(count);
        for column in 0..=columns {
            for row in 0..=rows {
                heights.push(height(column, row));
            }
        }
        Ok(Self { columns, rows, heights })
    }

    /// Sample noise over the unit square, one sample per grid intersection
    pub fn from_noise<N: NoiseSampler + ?Sized>(columns: u32, rows: u32, noise: &N) -> Result<Self> {
        Self::from_fn(columns, rows, |column, row| {
            noise.sample(column as f64 / columns as f64, row as f64 / rows as f64)
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Lowest and highest sample
    pub fn height_range(&self) -> (f64, f64) {
        self.heights.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &h| {
            (lo.min(h), hi.max(h))
        })
    }

    fn at(&self, column: u32, row: u32) -> f64 {
        let column = column.min(self.columns) as usize;
        let row = row.min(self.rows) as usize;
        self.heights[column * (self.rows as usize + 1) + row]
    }
}

impl HeightField for ComputedHeightField {
    fn height(&self, column: u32, row: u32) -> f64 {
        self.at(column, row)
    }

    /// Central differences in mesh space, one-sided at the borders
    fn normal(&self, column: u32, row: u32) -> Vec3 {
        let column = column.min(self.columns);
        let row = row.min(self.rows);

        let (c0, c1) = (column.saturating_sub(1), (column + 1).min(self.columns));
        let (r0, r1) = (row.saturating_sub(1), (row + 1).min(self.rows));

        let dx = (c1 - c0) as f64 / self.columns as f64;
        let dz = (r1 - r0) as f64 / self.rows as f64;

        let dh_dx = (self.at(c1, row) - self.at(c0, row)) / dx;
        let dh_dz = (self.at(column, r1) - self.at(column, r0)) / dz;

        DVec3::new(-dh_dx, 1.0, -dh_dz).normalize().as_vec3()
    }
}
