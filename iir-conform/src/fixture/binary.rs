//! Packed binary fixture layout.
//!
//! | field      | type            | count     |
//! |------------|-----------------|-----------|
//! | `n_coefs`  | `i32`           | 1         |
//! | `n_inputs` | `i32`           | 1         |
//! | tag        | `u8` (`f`/`d`)  | 1         |
//! | `a_coefs`  | sample          | `n_coefs` |
//! | `b_coefs`  | sample          | `n_coefs` |
//! | `inputs`   | sample          | `n_inputs`|
//! | `outputs`  | sample          | `n_inputs`|
//!
//! No padding. All integers and samples are little-endian.

use std::path::Path;

use iir_conform_core::{Error, Result, Sample, SampleType};
use tracing::debug;

use super::{TestVector, VectorData};

const HEADER_LEN: usize = 4 + 4 + 1;

/// Serialize a vector to bytes.
pub fn encode(vector: &TestVector) -> Result<Vec<u8>> {
    match vector {
        TestVector::Float32(v) => encode_data(v),
        TestVector::Float64(v) => encode_data(v),
    }
}

/// Deserialize a vector from bytes.
pub fn decode(bytes: &[u8]) -> Result<TestVector> {
    let mut cursor = Cursor { bytes, pos: 0 };
    let header = cursor.take(HEADER_LEN, "header")?;
    let n_coefs = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let n_inputs = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let sample_type = SampleType::from_tag(header[8])?;

    if n_coefs < 1 {
        return Err(Error::validation(
            "n_coefs",
            format!("declared {n_coefs}, at least 1 required"),
        ));
    }
    if n_inputs < 0 {
        return Err(Error::validation(
            "n_inputs",
            format!("declared {n_inputs}, must not be negative"),
        ));
    }
    // Both checked non-negative above.
    let (n_coefs, n_inputs) = (n_coefs as usize, n_inputs as usize);
    debug!(n_coefs, n_inputs, %sample_type, "decoding binary fixture");

    let vector = match sample_type {
        SampleType::Float32 => decode_data::<f32>(&mut cursor, n_coefs, n_inputs)?.into(),
        SampleType::Float64 => decode_data::<f64>(&mut cursor, n_coefs, n_inputs)?.into(),
    };

    let trailing = bytes.len() - cursor.pos;
    if trailing != 0 {
        return Err(Error::validation(
            "outputs",
            format!("{trailing} unexpected trailing bytes after declared payload"),
        ));
    }
    Ok(vector)
}

/// Write a binary fixture to `path`.
pub fn write(path: impl AsRef<Path>, vector: &TestVector) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode(vector)?;
    std::fs::write(path, &bytes).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote binary fixture");
    Ok(())
}

/// Read a binary fixture from `path`.
pub fn read(path: impl AsRef<Path>) -> Result<TestVector> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    decode(&bytes)
}

fn encode_data<S: Sample>(v: &VectorData<S>) -> Result<Vec<u8>> {
    let n_coefs = declared_count("n_coefs", v.coefficient_count())?;
    let n_inputs = declared_count("n_inputs", v.sample_count())?;

    let width = S::TYPE.width();
    let payload = 2 * (v.coefficient_count() + v.sample_count()) * width;
    let mut out = Vec::with_capacity(HEADER_LEN + payload);
    out.extend_from_slice(&n_coefs.to_le_bytes());
    out.extend_from_slice(&n_inputs.to_le_bytes());
    out.push(S::TYPE.tag());
    for section in [v.a(), v.b(), v.inputs(), v.outputs()] {
        section.iter().for_each(|&s| s.extend_le(&mut out));
    }
    debug!(n_coefs, n_inputs, sample_type = %S::TYPE, "encoded binary fixture");
    Ok(out)
}

fn decode_data<S: Sample>(
    cursor: &mut Cursor<'_>,
    n_coefs: usize,
    n_inputs: usize,
) -> Result<VectorData<S>> {
    let a = cursor.samples::<S>(n_coefs, "a_coefs")?;
    let b = cursor.samples::<S>(n_coefs, "b_coefs")?;
    let inputs = cursor.samples::<S>(n_inputs, "inputs")?;
    let outputs = cursor.samples::<S>(n_inputs, "outputs")?;
    VectorData::new(a, b, inputs, outputs)
}

fn declared_count(field: &'static str, len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| {
        Error::validation(field, format!("{len} does not fit the 32-bit header field"))
    })
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize, section: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| Error::Format {
                reason: format!(
                    "stream truncated reading {section}: need {len} bytes at offset {}, {} available",
                    self.pos,
                    self.bytes.len() - self.pos
                ),
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn samples<S: Sample>(&mut self, count: usize, section: &str) -> Result<Vec<S>> {
        let width = S::TYPE.width();
        let len = count.checked_mul(width).ok_or_else(|| Error::Format {
            reason: format!("{section} length overflows"),
        })?;
        let raw = self.take(len, section)?;
        Ok(raw.chunks_exact(width).map(S::from_le_slice).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> TestVector {
        VectorData::new(
            vec![1.0f32, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
        )
        .expect("valid")
        .into()
    }

    #[test]
    fn header_layout() {
        let bytes = encode(&identity()).expect("encode");
        assert_eq!(&bytes[..4], &2i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &3i32.to_le_bytes());
        assert_eq!(bytes[8], b'f');
        assert_eq!(bytes.len(), 9 + 4 * (2 + 2 + 3 + 3));
        assert_eq!(&bytes[9..13], &1.0f32.to_le_bytes());
    }

    #[test]
    fn binary_is_lossless() {
        let awkward = [
            f64::MIN_POSITIVE,
            -0.0,
            1.0 / 3.0,
            f64::MAX,
            f64::EPSILON,
            f64::INFINITY,
        ];
        let v: TestVector =
            VectorData::new(vec![1.0, 0.1], vec![0.2, 0.3], awkward.to_vec(), awkward.to_vec())
                .expect("valid")
                .into();
        let back = decode(&encode(&v).expect("encode")).expect("decode");
        let TestVector::Float64(back) = back else {
            panic!("precision changed")
        };
        let bits = |s: &[f64]| s.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(back.inputs()), bits(&awkward));
        assert_eq!(bits(back.outputs()), bits(&awkward));
        assert_eq!(back.a(), &[1.0, 0.1]);
    }

    #[test]
    fn truncated_stream_is_format_error() {
        let bytes = encode(&identity()).expect("encode");
        for cut in [0, 5, 9, 20, bytes.len() - 1] {
            let err = decode(&bytes[..cut]).unwrap_err();
            assert!(matches!(err, Error::Format { .. }), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn truncation_names_the_section() {
        let bytes = encode(&identity()).expect("encode");
        let err = decode(&bytes[..bytes.len() - 4]).unwrap_err();
        assert!(err.to_string().contains("outputs"), "{err}");
    }

    #[test]
    fn bad_tag_is_format_error() {
        let mut bytes = encode(&identity()).expect("encode");
        bytes[8] = b'i';
        assert!(matches!(decode(&bytes).unwrap_err(), Error::Format { .. }));
    }

    #[test]
    fn bad_counts_are_validation_errors() {
        let mut bytes = encode(&identity()).expect("encode");
        bytes[..4].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            Error::Validation { field: "n_coefs", .. }
        ));

        let mut bytes = encode(&identity()).expect("encode");
        bytes[4..8].copy_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            Error::Validation { field: "n_inputs", .. }
        ));
    }

    #[test]
    fn trailing_bytes_are_validation_errors() {
        let mut bytes = encode(&identity()).expect("encode");
        bytes.push(0);
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            Error::Validation { .. }
        ));
    }

    #[test]
    fn empty_signal_round_trips() {
        let v: TestVector = VectorData::new(vec![2.0f32], vec![1.0], vec![], vec![])
            .expect("valid")
            .into();
        let bytes = encode(&v).expect("encode");
        assert_eq!(bytes.len(), 9 + 8);
        assert_eq!(decode(&bytes).expect("decode"), v);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("identity.bin");
        write(&path, &identity()).expect("write");
        assert_eq!(read(&path).expect("read"), identity());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read(dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
