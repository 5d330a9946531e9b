//! Backend registry shared by decodes.
//!
//! A [`DecodeContext`] bundles the optional integer and real backends with
//! the [`Memory`] functions they run with. Contexts are cheap to clone and
//! can be passed explicitly to a [`crate::Decoder`]; the process-wide one
//! behind [`install_biginteger_backend`] and friends is what the free
//! `load*` functions use.

use core::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::backend::{
    BigInteger, BigIntegerBackend, BigReal, BigRealBackend, Memory, OverwriteFn,
};

trait IntegerFactory: Send + Sync {
    fn from_decimal(&self, text: &str, memory: Memory) -> Option<BigInteger>;
    fn from_int(&self, value: i64, memory: Memory) -> Option<BigInteger>;
}

trait RealFactory: Send + Sync {
    fn from_decimal(&self, text: &str, memory: Memory) -> Option<BigReal>;
    fn from_real(&self, value: f64, memory: Memory) -> Option<BigReal>;
}

struct Installed<B>(Arc<B>);

impl<B: BigIntegerBackend> IntegerFactory for Installed<B> {
    fn from_decimal(&self, text: &str, memory: Memory) -> Option<BigInteger> {
        let num = self.0.from_decimal(text, &memory)?;
        Some(BigInteger::adopt(&self.0, memory, num))
    }

    fn from_int(&self, value: i64, memory: Memory) -> Option<BigInteger> {
        let num = self.0.from_int(value, &memory)?;
        Some(BigInteger::adopt(&self.0, memory, num))
    }
}

impl<B: BigRealBackend> RealFactory for Installed<B> {
    fn from_decimal(&self, text: &str, memory: Memory) -> Option<BigReal> {
        let num = self.0.from_decimal(text, &memory)?;
        Some(BigReal::adopt(&self.0, memory, num))
    }

    fn from_real(&self, value: f64, memory: Memory) -> Option<BigReal> {
        let num = self.0.from_real(value, &memory)?;
        Some(BigReal::adopt(&self.0, memory, num))
    }
}

/// The backends and memory functions a decode runs with.
#[derive(Clone, Default)]
pub struct DecodeContext {
    integers: Option<Arc<dyn IntegerFactory>>,
    reals: Option<Arc<dyn RealFactory>>,
    memory: Memory,
}

impl DecodeContext {
    /// A context with no backends and the default memory functions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            integers: None,
            reals: None,
            memory: Memory::new(),
        }
    }

    /// Snapshot of the process-wide context.
    ///
    /// Numbers decoded under the snapshot keep their backend alive, so a
    /// later install does not affect them.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replace the big-integer backend.
    #[must_use]
    pub fn with_big_integers<B: BigIntegerBackend>(mut self, backend: B) -> Self {
        self.integers = Some(Arc::new(Installed(Arc::new(backend))));
        self
    }

    /// Replace the big-real backend.
    #[must_use]
    pub fn with_big_reals<B: BigRealBackend>(mut self, backend: B) -> Self {
        self.reals = Some(Arc::new(Installed(Arc::new(backend))));
        self
    }

    /// Replace the memory functions.
    #[must_use]
    pub fn with_memory(mut self, memory: Memory) -> Self {
        self.memory = memory;
        self
    }

    /// The memory functions handed to backends.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Whether a big-integer backend is installed.
    #[must_use]
    pub fn has_big_integers(&self) -> bool {
        self.integers.is_some()
    }

    /// Whether a big-real backend is installed.
    #[must_use]
    pub fn has_big_reals(&self) -> bool {
        self.reals.is_some()
    }

    /// Parse `text` with the big-integer backend.
    #[must_use]
    pub fn big_integer_from_decimal(&self, text: &str) -> Option<BigInteger> {
        self.integers.as_ref()?.from_decimal(text, self.memory)
    }

    /// Convert `value` with the big-integer backend.
    #[must_use]
    pub fn big_integer_from_int(&self, value: i64) -> Option<BigInteger> {
        self.integers.as_ref()?.from_int(value, self.memory)
    }

    /// Parse `text` with the big-real backend.
    #[must_use]
    pub fn big_real_from_decimal(&self, text: &str) -> Option<BigReal> {
        self.reals.as_ref()?.from_decimal(text, self.memory)
    }

    /// Convert `value` with the big-real backend.
    #[must_use]
    pub fn big_real_from_real(&self, value: f64) -> Option<BigReal> {
        self.reals.as_ref()?.from_real(value, self.memory)
    }
}

impl fmt::Debug for DecodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeContext")
            .field("big_integers", &self.has_big_integers())
            .field("big_reals", &self.has_big_reals())
            .field("memory", &self.memory)
            .finish()
    }
}

static GLOBAL: RwLock<DecodeContext> = RwLock::new(DecodeContext::new());

/// Install the process-wide big-integer backend, replacing any previous one.
pub fn install_biginteger_backend<B: BigIntegerBackend>(backend: B) {
    let mut global = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    global.integers = Some(Arc::new(Installed(Arc::new(backend))));
}

/// Install the process-wide big-real backend, replacing any previous one.
pub fn install_bigreal_backend<B: BigRealBackend>(backend: B) {
    let mut global = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    global.reals = Some(Arc::new(Installed(Arc::new(backend))));
}

/// Install the process-wide secure-overwrite function.
pub fn install_overwrite_fn(overwrite: OverwriteFn) {
    let mut global = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    global.memory = Memory::with_overwrite(overwrite);
}
