use super::ConfigError;

use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// A run of samples that can be lent out as one contiguous slice.
///
/// Strided `ndarray` views are refused with [`ConfigError::NonContiguous`]
/// instead of being copied.
pub trait Read1D<T> {
    /// Borrow the samples.
    fn read_slice(&self) -> Result<&[T], ConfigError>;
}

/// Writable counterpart of [`Read1D`].
pub trait Write1D<T> {
    /// Borrow the samples mutably.
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError>;
}

// Buffers that always deref to a slice.
macro_rules! contiguous_buffer {
    ($([$($generics:tt)*] $buffer:ty),* $(,)?) => {$(
        impl<$($generics)*> Read1D<T> for $buffer {
            fn read_slice(&self) -> Result<&[T], ConfigError> {
                Ok(&self[..])
            }
        }

        impl<$($generics)*> Write1D<T> for $buffer {
            fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
                Ok(&mut self[..])
            }
        }
    )*};
}

contiguous_buffer!(
    [T] [T],
    [T, const N: usize] [T; N],
    [T] Vec<T>,
);

impl<T> Read1D<T> for Array1<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "samples" })
    }
}

impl<T> Write1D<T> for Array1<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut()
            .ok_or(ConfigError::NonContiguous { arg: "samples" })
    }
}

impl<T> Read1D<T> for ArrayView1<'_, T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "samples_view" })
    }
}

impl<T> Write1D<T> for ArrayViewMut1<'_, T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut()
            .ok_or(ConfigError::NonContiguous { arg: "samples_view" })
    }
}
