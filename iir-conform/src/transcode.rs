//! Regeneration of reference fixtures with fresh oracle outputs.
//!
//! Only ever used to rebuild references after an oracle change; it never
//! validates the outputs it replaces.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use iir_conform_core::{Error, Result, SampleType};
use tracing::info;

use crate::fixture::{self, FixtureFormat};

/// Suffix appended to the stem of a refreshed binary fixture.
pub const REFRESHED_SUFFIX: &str = "_oracle";

/// Refresh a binary fixture, writing `<stem>_oracle.bin` beside it.
pub fn refresh(path: impl AsRef<Path>) -> Result<PathBuf> {
    refresh_as(path, SampleType::Float32)
}

/// Refresh a fixture of either format.
///
/// Binary input keeps its own precision and lands in `<stem>_oracle.bin`;
/// text input is read as `text_type` and lands in `<stem>_<float|double>.bin`.
pub fn refresh_as(path: impl AsRef<Path>, text_type: SampleType) -> Result<PathBuf> {
    let path = path.as_ref();
    let format = FixtureFormat::from_path(path);
    let vector = match format {
        FixtureFormat::Binary => fixture::read(path)?,
        FixtureFormat::Text => fixture::read_text(path, text_type)?,
    };
    let refreshed = vector.refreshed()?;
    let target = derived_path(path, format, refreshed.sample_type())?;
    fixture::write(&target, &refreshed)?;
    info!(
        source = %path.display(),
        target = %target.display(),
        n_coefs = refreshed.coefficient_count(),
        n_inputs = refreshed.sample_count(),
        "refreshed fixture outputs"
    );
    Ok(target)
}

/// Name of the refreshed fixture for `source`.
///
/// The stem is kept as raw OS text, so non-UTF-8 names are fine.
pub fn derived_path(source: &Path, format: FixtureFormat, sample_type: SampleType) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::validation(
                "path",
                format!("cannot derive a file name from {}", source.display()),
            )
        })?;
    let mut name = OsString::from(stem);
    match format {
        FixtureFormat::Binary => name.push(REFRESHED_SUFFIX),
        FixtureFormat::Text => {
            name.push("_");
            name.push(sample_type.name());
        }
    }
    name.push(".bin");
    Ok(source.with_file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{TestVector, VectorData};

    #[test]
    fn derived_names() {
        let p = |s: &str, f, t| derived_path(Path::new(s), f, t).unwrap();
        assert_eq!(
            p("refs/case.bin", FixtureFormat::Binary, SampleType::Float64),
            PathBuf::from("refs/case_oracle.bin")
        );
        assert_eq!(
            p("./t1_norm_coefs.txt", FixtureFormat::Text, SampleType::Float32),
            PathBuf::from("./t1_norm_coefs_float.bin")
        );
        assert_eq!(
            p("case.v2.bin", FixtureFormat::Binary, SampleType::Float32),
            PathBuf::from("case.v2_oracle.bin")
        );
        assert!(derived_path(Path::new(".."), FixtureFormat::Binary, SampleType::Float32).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn derived_names_keep_non_utf8_stems() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = Path::new("refs").join(OsStr::from_bytes(b"case\xff.bin"));
        let target = derived_path(&source, FixtureFormat::Binary, SampleType::Float32)
            .expect("non-utf-8 stem");
        assert_eq!(
            target.file_name().expect("file name").as_bytes(),
            b"case\xff_oracle.bin"
        );
        assert_eq!(target.parent(), Some(Path::new("refs")));

        let text = Path::new("refs").join(OsStr::from_bytes(b"t\xfe.txt"));
        let target = derived_path(&text, FixtureFormat::Text, SampleType::Float64).expect("stem");
        assert_eq!(target.file_name().expect("file name").as_bytes(), b"t\xfe_double.bin");
    }

    #[test]
    fn refresh_rewrites_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("stale.bin");
        let stale: TestVector =
            VectorData::new(vec![2.0f64, -1.0], vec![2.0, 0.0], vec![1.0, 0.0, 0.0], vec![0.0; 3])
                .expect("valid")
                .into();
        fixture::write(&source, &stale).expect("write");

        let target = refresh(&source).expect("refresh");
        assert_eq!(target, dir.path().join("stale_oracle.bin"));
        let TestVector::Float64(fresh) = fixture::read(&target).expect("read") else {
            panic!("precision changed")
        };
        assert_eq!(fresh.outputs(), &[1.0, 0.5, 0.25]);
        assert_eq!(fresh.a(), &[2.0, -1.0]);
        // Source untouched.
        assert_eq!(fixture::read(&source).expect("read"), stale);
    }

    #[test]
    fn text_source_becomes_binary() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("seed.txt");
        std::fs::write(&source, "2, 3\n1.0, 0.0\n1.0, 0.0\n1.0, 0.0, 0.0\n0.0, 0.0, 0.0\n")
            .expect("write");

        let target = refresh_as(&source, SampleType::Float64).expect("refresh");
        assert_eq!(target, dir.path().join("seed_double.bin"));
        let refreshed = fixture::read(&target).expect("read");
        assert_eq!(refreshed.sample_type(), SampleType::Float64);
        let TestVector::Float64(v) = refreshed else {
            unreachable!()
        };
        assert_eq!(v.outputs(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn refresh_propagates_format_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("short.bin");
        std::fs::write(&source, [1u8, 0, 0]).expect("write");
        assert!(matches!(refresh(&source).unwrap_err(), Error::Format { .. }));
    }
}
