//! Compute-resource selection for the bulk image loops.
//!
//! `Cpu` walks rows serially. `Parallel` splits output rows across the rayon
//! thread pool when the `parallel` feature is enabled and silently degrades to
//! the serial path otherwise. Both produce bit-identical results because every
//! output row is computed independently.
use crate::image::ImageF32;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Parallel,
}

impl Device {
    /// Fill every row of `out` with `f(y, row)`.
    pub fn fill_rows<F>(self, out: &mut ImageF32, f: F)
    where
        F: Fn(usize, &mut [f32]) + Send + Sync,
    {
        let w = out.w;
        if w == 0 || out.h == 0 {
            return;
        }
        let rows = &mut out.data[..w * out.h];
        match self {
            #[cfg(feature = "parallel")]
            Device::Parallel => {
                use rayon::prelude::*;
                rows.par_chunks_mut(w)
                    .enumerate()
                    .for_each(|(y, row)| f(y, row));
            }
            _ => rows
                .chunks_mut(w)
                .enumerate()
                .for_each(|(y, row)| f(y, row)),
        }
    }

    /// Apply `f` to every plane index in `0..n` and collect the results in order.
    pub fn map_planes<T, F>(self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Send + Sync,
    {
        match self {
            #[cfg(feature = "parallel")]
            Device::Parallel => {
                use rayon::prelude::*;
                (0..n).into_par_iter().map(f).collect()
            }
            _ => (0..n).map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rows_matches_between_devices() {
        let mut serial = ImageF32::new(7, 5);
        let mut parallel = ImageF32::new(7, 5);
        let f = |y: usize, row: &mut [f32]| {
            for (x, px) in row.iter_mut().enumerate() {
                *px = (x * 10 + y) as f32;
            }
        };
        Device::Cpu.fill_rows(&mut serial, f);
        Device::Parallel.fill_rows(&mut parallel, f);
        assert_eq!(serial, parallel);
        assert_eq!(serial.get(3, 4), 34.0);
    }

    #[test]
    fn fill_rows_tolerates_empty_images() {
        let mut empty = ImageF32::new(0, 3);
        Device::Parallel.fill_rows(&mut empty, |_, _| panic!("no rows expected"));
    }

    #[test]
    fn device_deserializes_from_lowercase() {
        let d: Device = serde_json::from_str("\"parallel\"").unwrap();
        assert_eq!(d, Device::Parallel);
    }
}
