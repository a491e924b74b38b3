//! Flat little-endian float32 point buffers (`.f32` files)
//!
//! The format is nothing but `x y z` triples of little-endian `f32`, with no
//! header. A buffer whose byte length is not a multiple of 4, or whose float
//! count is not a multiple of 3, is rejected.

use crate::error::IoError;
use starfield_core::{Point3f, PointDataset, Result};
use std::path::Path;

/// Decode a little-endian float buffer
pub fn decode_f32_le(bytes: &[u8]) -> std::result::Result<Vec<f32>, IoError> {
    if bytes.len() % 4 != 0 {
        return Err(IoError::TruncatedFloat { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Decode a point buffer into packed points
pub fn decode_points(bytes: &[u8]) -> std::result::Result<Vec<Point3f>, IoError> {
    let floats = decode_f32_le(bytes)?;
    if floats.len() % 3 != 0 {
        return Err(IoError::PartialPoint { floats: floats.len() });
    }

    Ok(floats
        .chunks_exact(3)
        .map(|c| Point3f::new(c[0], c[1], c[2]))
        .collect())
}

/// Decode a point buffer into a named dataset
pub fn decode_dataset(title: &str, bytes: &[u8]) -> Result<PointDataset> {
    let points = decode_points(bytes).map_err(|e| e.for_dataset(title))?;
    Ok(PointDataset::new(title, points))
}

/// Encode points as a little-endian float buffer
pub fn encode_points(points: &[Point3f]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(points.len() * 12);
    for p in points {
        bytes.extend_from_slice(&p.x.to_le_bytes());
        bytes.extend_from_slice(&p.y.to_le_bytes());
        bytes.extend_from_slice(&p.z.to_le_bytes());
    }
    bytes
}

/// Read a dataset from a `.f32` file
pub fn read_dataset<P: AsRef<Path>>(title: &str, path: P) -> Result<PointDataset> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_dataset(title, &bytes)
}

/// Write points to a `.f32` file
pub fn write_points<P: AsRef<Path>>(points: &[Point3f], path: P) -> Result<()> {
    std::fs::write(path.as_ref(), encode_points(points))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfield_core::Error;
    use std::fs;

    #[test]
    fn test_decode_little_endian() {
        let mut bytes = Vec::new();
        for v in [1.0f32, -2.5, 3.25] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let points = decode_points(&bytes).unwrap();
        assert_eq!(points, vec![Point3f::new(1.0, -2.5, 3.25)]);
    }

    #[test]
    fn test_empty_buffer_is_empty_dataset() {
        let dataset = decode_dataset("empty", &[]).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_truncated_float_rejected() {
        let result = decode_points(&[0, 0, 128]);
        assert!(matches!(result, Err(IoError::TruncatedFloat { len: 3 })));
    }

    #[test]
    fn test_partial_point_rejected() {
        let bytes = encode_points(&[Point3f::new(1.0, 2.0, 3.0)]);
        let result = decode_dataset("2MRS", &bytes[..8]);
        match result {
            Err(Error::MalformedBuffer { title, .. }) => assert_eq!(title, "2MRS"),
            other => panic!("expected malformed buffer, got {:?}", other),
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let temp_file = std::env::temp_dir().join(format!("starfield_roundtrip_{}.f32", std::process::id()));
        let points = vec![Point3f::new(0.0, 0.0, -5.0), Point3f::new(5.0, 5.0, -5.0)];

        write_points(&points, &temp_file).unwrap();
        let dataset = read_dataset("6dF GS", &temp_file).unwrap();
        assert_eq!(dataset.points(), points.as_slice());

        let _ = fs::remove_file(&temp_file);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_dataset("missing", "does_not_exist.f32");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
