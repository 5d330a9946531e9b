//! Pluggable arbitrary-precision numbers.
//!
//! A backend is a small, fixed set of operations over an opaque number type:
//! copy, delete, compare, render to decimal, parse from decimal, and build
//! from a native number. The decoder never looks inside a backend number; it
//! only moves [`BigInteger`] and [`BigReal`] handles around, and those
//! handles call back into the backend that created them.
//!
//! Every operation also receives the [`Memory`] bundle of the decode that
//! created the number, so a backend can wipe transient copies of a value
//! before the memory goes back to the allocator.

use core::{
    any::Any,
    cmp::Ordering,
    fmt,
    ops::{Deref, DerefMut},
    sync::atomic::{Ordering as AtomicOrdering, compiler_fence},
};
use std::sync::Arc;

/// Secure-overwrite hook: must clear every byte of the slice.
pub type OverwriteFn = fn(&mut [u8]);

fn overwrite_volatile(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        // SAFETY: `byte` comes from a live, exclusive `&mut [u8]`, so it is
        // valid for writes and properly aligned.
        unsafe { core::ptr::write_volatile(byte, 0) };
    }
    compiler_fence(AtomicOrdering::SeqCst);
}

/// Memory functions handed to every backend operation.
///
/// Allocation itself goes through the global allocator; the bundle carries
/// the replaceable secure-overwrite function and hands out scratch buffers
/// that are wiped when they go out of scope.
#[derive(Clone, Copy)]
pub struct Memory {
    overwrite: OverwriteFn,
}

impl Memory {
    /// Bundle with the default overwrite, volatile zeroing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            overwrite: overwrite_volatile,
        }
    }

    /// Bundle with a custom overwrite function.
    #[must_use]
    pub const fn with_overwrite(overwrite: OverwriteFn) -> Self {
        Self { overwrite }
    }

    /// Wipe `buf` with the configured overwrite function.
    pub fn overwrite(&self, buf: &mut [u8]) {
        (self.overwrite)(buf);
    }

    /// A zero-filled scratch buffer of `len` bytes, wiped on drop.
    #[must_use]
    pub fn scratch(&self, len: usize) -> Scrubbed {
        self.scrubbed(vec![0; len])
    }

    /// Take ownership of `bytes` so they are wiped on drop.
    #[must_use]
    pub fn scrubbed(&self, bytes: Vec<u8>) -> Scrubbed {
        Scrubbed {
            buf: bytes,
            memory: *self,
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memory").finish_non_exhaustive()
    }
}

/// A short-lived byte buffer that is overwritten, spare capacity included,
/// on every exit path.
pub struct Scrubbed {
    buf: Vec<u8>,
    memory: Memory,
}

impl Deref for Scrubbed {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for Scrubbed {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for Scrubbed {
    fn drop(&mut self) {
        let cap = self.buf.capacity();
        self.buf.resize(cap, 0);
        self.memory.overwrite(&mut self.buf);
    }
}

/// Copy `text` into `buf` with `snprintf` semantics.
///
/// At most `buf.len() - 1` bytes are copied and a NUL terminator follows
/// them. The return value is always the full length of `text`, so a result
/// `>= buf.len()` tells the caller to retry with a larger buffer.
pub fn write_truncated(text: &[u8], buf: &mut [u8]) -> usize {
    if let Some(room) = buf.len().checked_sub(1) {
        let n = text.len().min(room);
        buf[..n].copy_from_slice(&text[..n]);
        buf[n] = 0;
    }
    text.len()
}

/// Operations shared by integer and real backends.
///
/// Implementations must not keep state shared between calls: several
/// decodes may run on different threads against the same backend.
pub trait BigNumberBackend: Send + Sync + 'static {
    /// The backend's number representation.
    type Num: Send + Sync + 'static;

    /// A fully independent copy of `num`, or `None` on failure.
    fn copy(&self, num: &Self::Num, memory: &Memory) -> Option<Self::Num>;

    /// Release `num`. Backends holding sensitive digits should wipe them
    /// here; the default just drops the value.
    fn delete(&self, num: Self::Num, memory: &Memory) {
        let _ = memory;
        drop(num);
    }

    /// Three-way comparison.
    fn compare(&self, a: &Self::Num, b: &Self::Num, memory: &Memory) -> Ordering;

    /// Render `num` in decimal into `buf`; see [`write_truncated`] for the
    /// contract on short buffers.
    fn to_decimal(&self, num: &Self::Num, buf: &mut [u8], memory: &Memory) -> usize;

    /// Parse a decimal numeral. `None` means the text is not a valid
    /// numeral for this backend; it is never a stand-in for zero.
    fn from_decimal(&self, text: &str, memory: &Memory) -> Option<Self::Num>;
}

/// Backend for integers beyond `i64`.
pub trait BigIntegerBackend: BigNumberBackend {
    /// Build a number from a native integer.
    fn from_int(&self, value: i64, memory: &Memory) -> Option<Self::Num>;
}

/// Backend for reals beyond what `f64` holds exactly.
pub trait BigRealBackend: BigNumberBackend {
    /// Build a number from a native double.
    fn from_real(&self, value: f64, memory: &Memory) -> Option<Self::Num>;
}

/// Type-erased view of a number plus the backend that owns it.
pub(crate) trait Handle: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn memory(&self) -> Memory;
    fn duplicate(&self) -> Option<Box<dyn Handle>>;
    fn compare(&self, other: &dyn Handle) -> Option<Ordering>;
    fn to_decimal(&self, buf: &mut [u8]) -> usize;
}

struct Held<B: BigNumberBackend> {
    backend: Arc<B>,
    memory: Memory,
    // Only `None` while dropping.
    num: Option<B::Num>,
}

impl<B: BigNumberBackend> Held<B> {
    fn boxed(backend: &Arc<B>, memory: Memory, num: B::Num) -> Box<dyn Handle> {
        Box::new(Self {
            backend: Arc::clone(backend),
            memory,
            num: Some(num),
        })
    }
}

impl<B: BigNumberBackend> Handle for Held<B> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn memory(&self) -> Memory {
        self.memory
    }

    fn duplicate(&self) -> Option<Box<dyn Handle>> {
        let num = self.backend.copy(self.num.as_ref()?, &self.memory)?;
        Some(Self::boxed(&self.backend, self.memory, num))
    }

    fn compare(&self, other: &dyn Handle) -> Option<Ordering> {
        let other = other.as_any().downcast_ref::<Self>()?;
        let (a, b) = (self.num.as_ref()?, other.num.as_ref()?);
        Some(self.backend.compare(a, b, &self.memory))
    }

    fn to_decimal(&self, buf: &mut [u8]) -> usize {
        match &self.num {
            Some(num) => self.backend.to_decimal(num, buf, &self.memory),
            None => write_truncated(b"", buf),
        }
    }
}

impl<B: BigNumberBackend> Drop for Held<B> {
    fn drop(&mut self) {
        if let Some(num) = self.num.take() {
            self.backend.delete(num, &self.memory);
        }
    }
}

/// Render a handle through the report-and-retry `to_decimal` protocol.
fn decimal_string(handle: &dyn Handle) -> String {
    let memory = handle.memory();
    let mut cap = 32;
    loop {
        let mut buf = memory.scratch(cap);
        let needed = handle.to_decimal(&mut buf);
        if needed < cap {
            return String::from_utf8_lossy(&buf[..needed]).into_owned();
        }
        cap = needed + 1;
    }
}

macro_rules! big_number {
    ($(#[$meta:meta])* $name:ident, $backend:ident) => {
        $(#[$meta])*
        pub struct $name(Box<dyn Handle>);

        impl $name {
            pub(crate) fn adopt<B: $backend>(backend: &Arc<B>, memory: Memory, num: B::Num) -> Self {
                Self(Held::boxed(backend, memory, num))
            }

            /// Independent copy made by the owning backend's `copy`.
            #[must_use]
            pub fn try_clone(&self) -> Option<Self> {
                self.0.duplicate().map(Self)
            }

            /// Compare through the backend. `None` when the two numbers come
            /// from different backends.
            #[must_use]
            pub fn compare(&self, other: &Self) -> Option<Ordering> {
                self.0.compare(&*other.0)
            }

            /// Write the decimal text into `buf`; see [`write_truncated`].
            pub fn to_decimal(&self, buf: &mut [u8]) -> usize {
                self.0.to_decimal(buf)
            }

            /// The decimal text as an owned string.
            #[must_use]
            pub fn to_decimal_string(&self) -> String {
                decimal_string(&*self.0)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                match self.compare(other) {
                    Some(ord) => ord == Ordering::Equal,
                    None => self.to_decimal_string() == other.to_decimal_string(),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name))
                    .field(&format_args!("{}", self.to_decimal_string()))
                    .finish()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_decimal_string())
            }
        }
    };
}

big_number!(
    /// An integer owned by a [`BigIntegerBackend`]; dropping it calls the
    /// backend's `delete`.
    BigInteger,
    BigIntegerBackend
);

big_number!(
    /// A real owned by a [`BigRealBackend`]; dropping it calls the backend's
    /// `delete`.
    BigReal,
    BigRealBackend
);
