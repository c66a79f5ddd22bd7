//! Whole-group kernels and backend selection.
//!
//! A backend turns runs of 32-element groups into `4 * W` bytes each (and
//! back). Partial groups and unaligned starts never reach this module; the
//! dispatcher routes them through the scalar kernels.

mod portable;
#[cfg(target_arch = "x86_64")]
mod x86_64;

use crate::element::Element;
use crate::tables::GROUP;

/// Implementation used for the vector bulk of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// No vector pass; every element goes through the scalar kernels.
    Scalar,
    /// Table-driven word kernels in plain Rust.
    Portable,
    /// Gather and variable-shift kernels using AVX2.
    #[cfg(target_arch = "x86_64")]
    Avx2,
}

#[cfg(target_arch = "x86_64")]
const ALL: [Backend; 3] = [Backend::Scalar, Backend::Portable, Backend::Avx2];
#[cfg(not(target_arch = "x86_64"))]
const ALL: [Backend; 2] = [Backend::Scalar, Backend::Portable];

/// Environment variable overriding [`Backend::active`].
#[cfg(feature = "std")]
pub const BACKEND_ENV: &str = "BIT_PACK_BACKEND";

impl Backend {
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::Portable => "portable",
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2 => "avx2",
        }
    }

    /// Parses a backend name as accepted by [`BACKEND_ENV`].
    ///
    /// `auto` is not a backend and yields `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("scalar") {
            return Some(Backend::Scalar);
        }
        if name.eq_ignore_ascii_case("portable") {
            return Some(Backend::Portable);
        }
        #[cfg(target_arch = "x86_64")]
        if name.eq_ignore_ascii_case("avx2") {
            return Some(Backend::Avx2);
        }
        None
    }

    /// Whether this CPU can run the backend.
    pub fn is_supported(self) -> bool {
        match self {
            Backend::Scalar | Backend::Portable => true,
            #[cfg(target_arch = "x86_64")]
            Backend::Avx2 => avx2_available(),
        }
    }

    /// Fastest backend this CPU supports.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        if avx2_available() {
            return Backend::Avx2;
        }
        Backend::Portable
    }

    /// Every backend this CPU supports, slowest first.
    pub fn available() -> impl Iterator<Item = Backend> {
        ALL.into_iter().filter(|backend| backend.is_supported())
    }

    /// Backend used by [`crate::pack`] and [`crate::unpack`].
    ///
    /// Chosen on first use and cached. With `std`, [`BACKEND_ENV`] can force
    /// a specific backend.
    #[cfg(feature = "std")]
    pub fn active() -> Self {
        use std::sync::OnceLock;

        static ACTIVE: OnceLock<Backend> = OnceLock::new();
        *ACTIVE.get_or_init(|| {
            let backend = match std::env::var(BACKEND_ENV) {
                Ok(value) if !value.trim().is_empty() && !value.trim().eq_ignore_ascii_case("auto") => {
                    match Backend::from_name(&value) {
                        Some(forced) => forced.supported_or_portable(),
                        None => {
                            log::warn!("ignoring unknown {}={:?}", BACKEND_ENV, value);
                            Backend::detect()
                        }
                    }
                }
                _ => Backend::detect(),
            };
            log::debug!("bit_pack backend: {}", backend.name());
            backend
        })
    }

    /// Backend used by [`crate::pack`] and [`crate::unpack`].
    #[cfg(not(feature = "std"))]
    pub fn active() -> Self {
        Backend::detect()
    }

    pub(crate) fn supported_or_portable(self) -> Self {
        if self.is_supported() {
            self
        } else {
            log::warn!("{} backend unsupported on this CPU, using portable", self.name());
            Backend::Portable
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn avx2_available() -> bool {
    #[cfg(feature = "std")]
    {
        std::is_x86_feature_detected!("avx2")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(target_feature = "avx2")
    }
}

/// Packs `src.len() / 32` whole groups into exactly `4 * W` bytes each.
///
/// `backend` must be supported, see [`Backend::supported_or_portable`].
pub(crate) fn pack_groups<T: Element, const W: usize, const BIG: bool>(
    backend: Backend,
    src: &[T],
    dst: &mut [u8],
) {
    debug_assert_eq!(src.len() % GROUP, 0);
    debug_assert_eq!(dst.len(), src.len() / GROUP * 4 * W);
    match backend {
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => {
            // SAFETY: callers only pass Avx2 after the CPU reported support.
            unsafe { x86_64::pack_groups::<T, W, BIG>(src, dst) }
        }
        _ => portable::pack_groups::<T, W, BIG>(src, dst),
    }
}

/// Unpacks `dst.len() / 32` whole groups from exactly `4 * W` bytes each.
pub(crate) fn unpack_groups<T: Element, const W: usize, const BIG: bool>(
    backend: Backend,
    src: &[u8],
    dst: &mut [T],
) {
    debug_assert_eq!(dst.len() % GROUP, 0);
    debug_assert_eq!(src.len(), dst.len() / GROUP * 4 * W);
    match backend {
        #[cfg(target_arch = "x86_64")]
        Backend::Avx2 => {
            // SAFETY: callers only pass Avx2 after the CPU reported support.
            unsafe { x86_64::unpack_groups::<T, W, BIG>(src, dst) }
        }
        _ => portable::unpack_groups::<T, W, BIG>(src, dst),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::BitOrder;
    use crate::scalar;

    fn sample(n: usize, bit_width: u32) -> Vec<u32> {
        let mask = crate::element::low_mask(bit_width);
        (0..n as u32)
            .map(|i| i.wrapping_mul(0x9e37_79b9).rotate_left(i % 29) & mask)
            .collect()
    }

    fn check_width<const W: usize, const BIG: bool>(backend: Backend) {
        let order = BitOrder::from_big(BIG);
        let values = sample(GROUP * 5, W as u32);
        let mut expected = vec![0u8; 4 * W * 5];
        scalar::pack_nu(&values, W as u32, &mut expected, 0, order);

        let mut packed = vec![0u8; 4 * W * 5];
        pack_groups::<u32, W, BIG>(backend, &values, &mut packed);
        assert_eq!(packed, expected, "{} pack w={W} {order:?}", backend.name());

        let mut unpacked = vec![0u32; values.len()];
        unpack_groups::<u32, W, BIG>(backend, &packed, &mut unpacked);
        assert_eq!(unpacked, values, "{} unpack w={W} {order:?}", backend.name());
    }

    macro_rules! check_all {
        ($backend:expr; $($w:literal)*) => {
            $(
                check_width::<$w, false>($backend);
                check_width::<$w, true>($backend);
            )*
        };
    }

    #[test]
    fn groups_match_scalar() {
        for backend in Backend::available() {
            check_all!(backend; 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16
                17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32);
        }
    }

    #[test]
    fn narrow_elements() {
        for backend in Backend::available() {
            let values: Vec<u8> = (0..GROUP as u32 * 2).map(|i| (i * 7 % 32) as u8).collect();
            let mut expected = vec![0u8; 4 * 5 * 2];
            scalar::pack_nu(&values, 5, &mut expected, 0, BitOrder::Big);
            let mut packed = vec![0u8; expected.len()];
            pack_groups::<u8, 5, true>(backend, &values, &mut packed);
            assert_eq!(packed, expected);

            let mut out = vec![0u8; values.len()];
            unpack_groups::<u8, 5, true>(backend, &packed, &mut out);
            assert_eq!(out, values);
        }
    }

    #[test]
    fn names_roundtrip() {
        for backend in Backend::available() {
            assert_eq!(Backend::from_name(backend.name()), Some(backend));
        }
        assert_eq!(Backend::from_name(" Portable "), Some(Backend::Portable));
        assert_eq!(Backend::from_name("auto"), None);
    }
}
